//! Headless page rendering.
//!
//! Mounts a route the way a browser would: the document parses, critical
//! resources trickle in, the ready gate opens, and the visitor scrolls to the
//! bottom so every deferred section gets the chance to load. The final
//! markup is what the page shows at the end of that session.

use crate::config::SiteConfig;
use crate::home::HomePage;
use crate::links::{LinkIssue, warn_on_broken_links};
use crate::pages::{document, static_body};
use crate::routes::Route;
use crate::sections::SectionCatalog;
use anyhow::{Context as _, Result};
use core::time::Duration;
use markup::Html;
use page_loader::{DocumentLifecycle, PageCounters, ResourceKind, ScopedTask};
use tokio::time;

/// Upper bound on how long the scroll-through may take.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Smallest scroll increment, so a collapsed viewport still makes progress.
const MIN_SCROLL_STEP: f32 = 100.0;

/// Critical resources the home page waits on before its load event.
const HOME_RESOURCES: &[(ResourceKind, &str)] = &[
    (ResourceKind::Stylesheet, "/assets/site.css"),
    (ResourceKind::Font, "/fonts/inter-var.woff2"),
    (ResourceKind::Image, "/images/hero.webp"),
];

/// Output of one headless render.
#[derive(Debug)]
pub struct RenderReport {
    pub route: Route,
    /// Full HTML document
    pub html: Html,
    /// Broken links found in development builds
    pub issues: Vec<LinkIssue>,
    /// Page event totals; home page only
    pub counters: Option<PageCounters>,
}

/// Track `HOME_RESOURCES` on `document`, finishing one every `latency`.
fn simulate_resources(document: &DocumentLifecycle, latency: Duration) -> Vec<ScopedTask> {
    HOME_RESOURCES
        .iter()
        .zip(1_u32..)
        .map(|(&(kind, url), step)| {
            let load = document.track(kind, url);
            ScopedTask::spawn_local(async move {
                time::sleep(latency * step).await;
                load.complete();
            })
        })
        .collect()
}

/// Distance scrolled per step: half a viewport, never less than
/// [`MIN_SCROLL_STEP`].
fn scroll_step(viewport_height: f32) -> f32 {
    (viewport_height / 2.0).max(MIN_SCROLL_STEP)
}

async fn scroll_through(page: &HomePage, frame: Duration) -> Result<()> {
    time::timeout(SETTLE_TIMEOUT, async {
        while !page.is_mounted() {
            time::sleep(frame).await;
        }
        let step = scroll_step(page.viewport().height);
        let mut scroll_y = 0.0;
        while !page.is_settled() {
            scroll_y += step;
            page.scroll_to(scroll_y);
            time::sleep(frame * 2).await;
        }
    })
    .await
    .context("home page did not settle")
}

async fn render_home(config: &SiteConfig) -> Result<(Html, PageCounters)> {
    let lifecycle = DocumentLifecycle::new();
    let _resources = simulate_resources(&lifecycle, config.chunk_latency());
    let page = HomePage::mount(
        config,
        SectionCatalog::new(config.chunk_latency()),
        lifecycle.load_event(),
    );
    lifecycle.finish_parsing();

    let trigger = page.gate().ready().await;
    log::info!("home page ready via {trigger:?}");
    scroll_through(&page, config.frame_budget()).await?;
    // One more frame so deferred initializers have run.
    time::sleep(config.frame_budget()).await;
    page.scroll_to(0.0);
    Ok((page.render(), page.counters()))
}

/// Render `route` to a complete document.
///
/// Must be called inside a `LocalSet`.
///
/// # Errors
/// Returns an error if the home page fails to settle in time
pub async fn render_route(route: &Route, config: &SiteConfig) -> Result<RenderReport> {
    let (body, counters) = if let Some(body) = static_body(route) {
        (body, None)
    } else {
        let (body, counters) = render_home(config).await?;
        (body, Some(counters))
    };
    let html = document(route, body);
    let issues = warn_on_broken_links(config.build_mode, route, &html);
    Ok(RenderReport {
        route: route.clone(),
        html,
        issues,
        counters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::task::LocalSet;

    #[test]
    fn scroll_step_never_stalls() {
        assert!((scroll_step(900.0) - 450.0).abs() < f32::EPSILON);
        assert!((scroll_step(0.0) - MIN_SCROLL_STEP).abs() < f32::EPSILON);
        assert!(scroll_step(-10.0) >= MIN_SCROLL_STEP);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn zero_height_viewport_still_settles() -> Result<()> {
        LocalSet::new()
            .run_until(async {
                let config = SiteConfig {
                    viewport_height: 0.0,
                    telemetry_enabled: false,
                    ..SiteConfig::default()
                };
                let started = time::Instant::now();
                let report = render_route(&Route::Home, &config).await?;
                assert!(started.elapsed() < SETTLE_TIMEOUT);
                assert_eq!(report.counters.map(|counters| counters.sections_loaded), Some(6));
                Ok(())
            })
            .await
    }
}
