#![allow(dead_code, reason = "each test binary uses a different subset")]
use core::time::Duration;
use page_loader::{DocumentLifecycle, ResourceKind};
use site::{BuildMode, SiteConfig};
use tokio::task;
use tokio::time;

pub fn init_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Default configuration in development mode with telemetry off.
pub fn test_config() -> SiteConfig {
    SiteConfig {
        build_mode: BuildMode::Development,
        telemetry_enabled: false,
        ..SiteConfig::default()
    }
}

/// Document whose load event fires `after` from now.
pub fn document_loading_for(after: Duration) -> DocumentLifecycle {
    let document = DocumentLifecycle::new();
    let hero = document.track(ResourceKind::Image, "/images/hero.webp");
    document.finish_parsing();
    drop(task::spawn_local(async move {
        time::sleep(after).await;
        hero.complete();
    }));
    document
}

pub async fn advance(millis: u64) {
    time::sleep(Duration::from_millis(millis)).await;
}
