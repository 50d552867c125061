use anyhow::{Context as _, Result};
use log::info;
use page_loader::telemetry::{counters_json, maybe_emit};
use site::{Route, SiteConfig, render_route};
use std::env;
use std::io::{self, Write as _};
use tokio::runtime::Builder;
use tokio::task::LocalSet;

fn main() -> Result<()> {
    env_logger::init();

    let config = SiteConfig::from_env();
    info!("configuration: {}", config.summary_json());
    let path = env::args().nth(1).unwrap_or_else(|| "/".to_owned());
    let route = Route::from_path(&path);
    info!("rendering {route}");

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    let report = LocalSet::new().block_on(&runtime, render_route(&route, &config))?;

    if let Some(counters) = &report.counters {
        maybe_emit(config.telemetry_enabled, &counters_json(counters));
    }
    if !report.issues.is_empty() {
        info!("{} broken link(s) on {route}", report.issues.len());
    }

    let mut stdout = io::stdout().lock();
    stdout.write_all(report.html.as_str().as_bytes())?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}
