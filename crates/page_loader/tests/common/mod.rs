#![allow(dead_code, reason = "each test binary uses a different subset")]
use core::time::Duration;
use markup::Html;
use page_loader::{
    FrameClock, ObserverOptions, PageContext, PageEvents, Rect, SectionId, SectionResolver,
    Skeleton, SkeletonShape, Viewport,
};
use tokio::sync::watch;
use tokio::time;

pub const VIEWPORT_WIDTH: f32 = 1280.0;
pub const VIEWPORT_HEIGHT: f32 = 800.0;

/// Simulated network latency for code-split chunks.
pub const CHUNK_LATENCY: Duration = Duration::from_millis(120);

pub fn init_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Page context plus the handle used to scroll it.
pub struct TestPage {
    pub ctx: PageContext,
    pub viewport: watch::Sender<Viewport>,
}

impl TestPage {
    pub fn scroll_to(&self, scroll_y: f32) {
        self.viewport
            .send_modify(|viewport| *viewport = viewport.scrolled_to(scroll_y));
    }
}

pub fn test_page() -> TestPage {
    test_page_with(ObserverOptions::default())
}

pub fn test_page_with(observer: ObserverOptions) -> TestPage {
    let (viewport, receiver) = watch::channel(Viewport::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT));
    TestPage {
        ctx: PageContext {
            frames: FrameClock::start(Duration::from_millis(16)),
            events: PageEvents::new(),
            viewport: receiver,
            observer,
        },
        viewport,
    }
}

/// Placeholder region with a fixed document position.
pub fn region(top: f32, height: f32) -> (watch::Sender<Rect>, watch::Receiver<Rect>) {
    watch::channel(Rect::new(0.0, top, VIEWPORT_WIDTH, height))
}

pub fn skeleton(id: &'static str, height: f32) -> Skeleton {
    Skeleton::new(
        SectionId::from_static(id),
        SkeletonShape::Cards { count: 3 },
        height,
    )
}

/// Resolver that takes `CHUNK_LATENCY` and returns a marked `<section>`.
pub fn chunk_resolver(id: &'static str) -> SectionResolver {
    SectionResolver::new(move || async move {
        time::sleep(CHUNK_LATENCY).await;
        Ok::<_, anyhow::Error>(Html::from(format!(
            "<section id=\"{id}\" data-loaded=\"true\"></section>"
        )))
    })
}

/// Let frames and timers run for `millis` of virtual time.
pub async fn advance(millis: u64) {
    time::sleep(Duration::from_millis(millis)).await;
}
