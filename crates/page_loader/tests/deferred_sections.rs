mod common;

#[cfg(test)]
mod tests {
    use super::common::{
        self, CHUNK_LATENCY, TestPage, advance, chunk_resolver, init_logging, region, skeleton,
    };
    use page_loader::events::drain;
    use page_loader::{
        DeferredSection, LoadPhase, ObserverOptions, PageEvent, SectionSlot, Telemetry,
    };
    use tokio::task::LocalSet;

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn section_far_below_loads_only_after_scrolling_near() {
        init_logging();
        LocalSet::new()
            .run_until(async {
                let page = common::test_page();
                let telemetry = Telemetry::attach(&page.ctx.events, false);
                // 1000px below the bottom of an 800px viewport.
                let (_region, rect) = region(1800.0, 600.0);
                let resolver = chunk_resolver("pricing");
                let section = DeferredSection::mount(
                    skeleton("pricing", 600.0),
                    rect,
                    resolver.clone(),
                    &page.ctx,
                );

                advance(100).await;
                assert!(!section.is_visible());
                assert_eq!(resolver.invocations(), 0);
                assert!(matches!(section.slot(), SectionSlot::Fallback(_)));

                // Root bottom at 1820: touching, but only 20px of 600.
                page.scroll_to(700.0);
                advance(50).await;
                assert!(!section.is_visible());
                assert_eq!(resolver.invocations(), 0);

                // Root bottom at 1920: 120px of 600 is past the threshold.
                page.scroll_to(800.0);
                advance(20).await;
                assert!(section.is_visible());
                assert_eq!(section.phase(), LoadPhase::Pending);
                assert_eq!(resolver.invocations(), 1);
                assert!(section.render().contains("data-skeleton=\"pricing\""));

                advance(CHUNK_LATENCY.as_millis() as u64 + 20).await;
                assert_eq!(section.phase(), LoadPhase::Ready);
                assert!(section.render().contains("data-loaded=\"true\""));
                assert_eq!(resolver.invocations(), 1);

                let counters = telemetry.snapshot();
                assert_eq!(counters.sections_visible, 1);
                assert_eq!(counters.sections_loaded, 1);
                assert_eq!(counters.sections_failed, 0);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn section_already_in_view_is_visible_within_one_frame() {
        init_logging();
        LocalSet::new()
            .run_until(async {
                let page = common::test_page();
                let (_region, rect) = region(200.0, 400.0);
                let section = DeferredSection::mount(
                    skeleton("about", 400.0),
                    rect,
                    chunk_resolver("about"),
                    &page.ctx,
                );
                advance(20).await;
                assert!(section.is_visible());
                assert_eq!(section.phase(), LoadPhase::Pending);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn visibility_fires_once_and_disconnects() {
        init_logging();
        LocalSet::new()
            .run_until(async {
                let page = common::test_page();
                let mut bus = page.ctx.events.subscribe();
                let (_region, rect) = region(1800.0, 600.0);
                let section = DeferredSection::mount(
                    skeleton("services", 600.0),
                    rect,
                    chunk_resolver("services"),
                    &page.ctx,
                );

                advance(50).await;
                assert!(section.observer().is_observing());
                page.scroll_to(1500.0);
                advance(50).await;
                assert!(section.is_visible());
                assert!(!section.observer().is_observing());
                let callbacks = section.observer().callback_count();

                for scroll in [0.0, 1500.0, 0.0, 2000.0] {
                    page.scroll_to(scroll);
                    advance(50).await;
                }
                assert!(section.is_visible());
                assert_eq!(section.observer().callback_count(), callbacks);

                let visible = drain(&mut bus)
                    .into_iter()
                    .filter(|event| matches!(event, PageEvent::SectionVisible { .. }))
                    .count();
                assert_eq!(visible, 1);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn never_visible_section_never_retrieves() {
        init_logging();
        LocalSet::new()
            .run_until(async {
                let page = common::test_page();
                let (_region, rect) = region(5000.0, 600.0);
                let resolver = chunk_resolver("contact");
                let section = DeferredSection::mount(
                    skeleton("contact", 600.0),
                    rect,
                    resolver.clone(),
                    &page.ctx,
                );
                advance(5_000).await;
                assert!(!section.is_visible());
                assert!(section.observer().is_observing());
                assert_eq!(resolver.invocations(), 0);
                assert_eq!(section.phase(), LoadPhase::Idle);
                assert!(matches!(section.slot(), SectionSlot::Fallback(_)));
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn slot_shows_exactly_one_of_skeleton_or_content() {
        init_logging();
        LocalSet::new()
            .run_until(async {
                let page = common::test_page();
                let (_region, rect) = region(100.0, 500.0);
                let section = DeferredSection::mount(
                    skeleton("portfolio", 500.0),
                    rect,
                    chunk_resolver("portfolio"),
                    &page.ctx,
                );
                for _ in 0..30 {
                    let html = section.render();
                    let skeleton = html.contains("data-skeleton=\"portfolio\"");
                    let content = html.contains("data-loaded=\"true\"");
                    assert!(skeleton ^ content, "slot markup: {html}");
                    advance(10).await;
                }
                assert_eq!(section.phase(), LoadPhase::Ready);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn closed_viewport_source_renders_immediately() {
        init_logging();
        LocalSet::new()
            .run_until(async {
                let TestPage { ctx, viewport } = common::test_page();
                drop(viewport);
                let (_region, rect) = region(5000.0, 600.0);
                let resolver = chunk_resolver("testimonials");
                let section = DeferredSection::mount(
                    skeleton("testimonials", 600.0),
                    rect,
                    resolver.clone(),
                    &ctx,
                );
                assert!(section.observer().is_degraded());
                assert!(section.is_visible());
                assert_eq!(section.phase(), LoadPhase::Pending);

                advance(CHUNK_LATENCY.as_millis() as u64 + 10).await;
                assert_eq!(section.phase(), LoadPhase::Ready);
                assert_eq!(resolver.invocations(), 1);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn invalid_threshold_degrades_to_immediate_render() {
        init_logging();
        LocalSet::new()
            .run_until(async {
                let page = common::test_page_with(ObserverOptions {
                    threshold: 2.0,
                    ..ObserverOptions::default()
                });
                let (_region, rect) = region(5000.0, 600.0);
                let section = DeferredSection::mount(
                    skeleton("pricing", 600.0),
                    rect,
                    chunk_resolver("pricing"),
                    &page.ctx,
                );
                assert!(section.observer().is_degraded());
                assert!(section.is_visible());
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn remount_reuses_resolved_content() {
        init_logging();
        LocalSet::new()
            .run_until(async {
                let page = common::test_page();
                let resolver = chunk_resolver("about");

                let (_first_region, rect) = region(100.0, 400.0);
                let first =
                    DeferredSection::mount(skeleton("about", 400.0), rect, resolver.clone(), &page.ctx);
                advance(200).await;
                assert_eq!(first.phase(), LoadPhase::Ready);
                drop(first);

                let (_second_region, rect) = region(100.0, 400.0);
                let second =
                    DeferredSection::mount(skeleton("about", 400.0), rect, resolver.clone(), &page.ctx);
                advance(20).await;
                assert_eq!(second.phase(), LoadPhase::Ready);
                assert!(second.render().contains("data-loaded=\"true\""));
                assert_eq!(resolver.invocations(), 1);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn unmount_during_retrieval_ignores_the_result() {
        init_logging();
        LocalSet::new()
            .run_until(async {
                let page = common::test_page();
                let mut bus = page.ctx.events.subscribe();
                let resolver = chunk_resolver("team");
                let (_region, rect) = region(100.0, 400.0);
                let section =
                    DeferredSection::mount(skeleton("team", 400.0), rect, resolver.clone(), &page.ctx);
                advance(20).await;
                assert_eq!(section.phase(), LoadPhase::Pending);
                drop(section);

                advance(CHUNK_LATENCY.as_millis() as u64 + 50).await;
                assert_eq!(resolver.invocations(), 1);
                let loaded = drain(&mut bus)
                    .into_iter()
                    .any(|event| matches!(event, PageEvent::SectionLoaded { .. }));
                assert!(!loaded);
            })
            .await;
    }
}
