//! Runtime configuration for the agency site.
//!
//! Every knob has a default matching the production site and can be
//! overridden through an `AGENCY_*` environment variable. Unparseable values
//! fall back to the default with a warning.

use anyhow::{Error, bail};
use core::str::FromStr;
use core::time::Duration;
use page_loader::gate::DEFAULT_READY_FALLBACK;
use page_loader::observer::DEFAULT_THRESHOLD;
use page_loader::scheduler::DEFAULT_FRAME_BUDGET;
use page_loader::{GateOptions, ObserverOptions, RootMargin, Viewport};
use serde::Serialize;
use std::env;

/// Which build the site was produced by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildMode {
    /// Local development; enables link integrity warnings
    #[default]
    Development,
    /// Deployed site
    Production,
}

impl BuildMode {
    #[inline]
    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

impl FromStr for BuildMode {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => bail!("unknown build mode {other:?}"),
        }
    }
}

/// Site configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteConfig {
    /// Animation frame interval in milliseconds
    pub frame_budget_ms: u64,
    /// How long the ready gate waits for the load event
    pub ready_fallback_ms: u64,
    /// Proximity margin around the viewport
    pub root_margin: RootMargin,
    /// Fraction of a placeholder that must be inside the margin
    pub threshold: f32,
    /// Viewport width in pixels
    pub viewport_width: f32,
    /// Viewport height in pixels
    pub viewport_height: f32,
    /// Simulated latency of a code-split section chunk
    pub chunk_latency_ms: u64,
    /// Simulated latency of a contact form submission
    pub submit_delay_ms: u64,
    pub build_mode: BuildMode,
    /// Whether page events are logged as JSON lines
    pub telemetry_enabled: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            frame_budget_ms: DEFAULT_FRAME_BUDGET.as_millis() as u64,
            ready_fallback_ms: DEFAULT_READY_FALLBACK.as_millis() as u64,
            root_margin: RootMargin::default(),
            threshold: DEFAULT_THRESHOLD,
            viewport_width: 1280.0,
            viewport_height: 800.0,
            chunk_latency_ms: 120,
            submit_delay_ms: 1500,
            build_mode: BuildMode::default(),
            telemetry_enabled: false,
        }
    }
}

fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    let value = raw.trim().parse::<T>().ok();
    if value.is_none() {
        log::warn!("{key}={raw:?} is not valid; using the default");
    }
    value
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `AGENCY_FRAME_BUDGET_MS`, `AGENCY_READY_FALLBACK_MS`,
    /// `AGENCY_ROOT_MARGIN`, `AGENCY_THRESHOLD`, `AGENCY_VIEWPORT_WIDTH`,
    /// `AGENCY_VIEWPORT_HEIGHT`, `AGENCY_CHUNK_LATENCY_MS`,
    /// `AGENCY_SUBMIT_DELAY_MS`, `AGENCY_MODE` (`development` or
    /// `production`) and `AGENCY_TELEMETRY` (`1` to enable).
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`SiteConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            frame_budget_ms: parsed(&lookup, "AGENCY_FRAME_BUDGET_MS")
                .unwrap_or(defaults.frame_budget_ms)
                .max(1),
            ready_fallback_ms: parsed(&lookup, "AGENCY_READY_FALLBACK_MS")
                .unwrap_or(defaults.ready_fallback_ms),
            root_margin: parsed(&lookup, "AGENCY_ROOT_MARGIN").unwrap_or(defaults.root_margin),
            threshold: parsed(&lookup, "AGENCY_THRESHOLD").unwrap_or(defaults.threshold),
            viewport_width: parsed(&lookup, "AGENCY_VIEWPORT_WIDTH")
                .unwrap_or(defaults.viewport_width),
            viewport_height: parsed(&lookup, "AGENCY_VIEWPORT_HEIGHT")
                .unwrap_or(defaults.viewport_height),
            chunk_latency_ms: parsed(&lookup, "AGENCY_CHUNK_LATENCY_MS")
                .unwrap_or(defaults.chunk_latency_ms),
            submit_delay_ms: parsed(&lookup, "AGENCY_SUBMIT_DELAY_MS")
                .unwrap_or(defaults.submit_delay_ms),
            build_mode: parsed(&lookup, "AGENCY_MODE").unwrap_or(defaults.build_mode),
            telemetry_enabled: lookup("AGENCY_TELEMETRY").as_deref() == Some("1"),
        }
    }

    #[inline]
    pub const fn frame_budget(&self) -> Duration {
        Duration::from_millis(self.frame_budget_ms)
    }

    #[inline]
    pub const fn chunk_latency(&self) -> Duration {
        Duration::from_millis(self.chunk_latency_ms)
    }

    #[inline]
    pub const fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions {
            root_margin: self.root_margin,
            threshold: self.threshold,
        }
    }

    pub fn gate_options(&self) -> GateOptions {
        GateOptions {
            fallback: Duration::from_millis(self.ready_fallback_ms),
        }
    }

    /// Unscrolled viewport of the configured size.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }

    /// One-line JSON summary for startup logs.
    pub fn summary_json(&self) -> String {
        serde_json::json!({
            "frame_budget_ms": self.frame_budget_ms,
            "ready_fallback_ms": self.ready_fallback_ms,
            "root_margin": self.root_margin.to_string(),
            "threshold": self.threshold,
            "viewport": [self.viewport_width, self.viewport_height],
            "chunk_latency_ms": self.chunk_latency_ms,
            "submit_delay_ms": self.submit_delay_ms,
            "build_mode": self.build_mode,
            "telemetry": self.telemetry_enabled,
        })
        .to_string()
    }
}
