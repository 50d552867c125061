mod common;

#[cfg(test)]
mod tests {
    use super::common::{init_logging, test_config};
    use anyhow::Result;
    use site::{Route, SectionKind, render_route};
    use tokio::task::LocalSet;

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn home_renders_every_section_with_intact_links() -> Result<()> {
        init_logging();
        let config = test_config();
        let report = LocalSet::new()
            .run_until(render_route(&Route::Home, &config))
            .await?;

        assert!(report.issues.is_empty(), "broken links: {:?}", report.issues);
        for kind in SectionKind::HOME {
            assert!(
                report.html.contains(&format!("id=\"{}\"", kind.slug())),
                "{kind:?} missing from output"
            );
        }
        assert!(!report.html.contains("data-skeleton"));
        assert!(report.html.contains("reveal-ready"));

        let counters = report.counters.unwrap_or_default();
        assert_eq!(counters.sections_loaded, 6);
        assert_eq!(counters.sections_failed, 0);
        assert_eq!(counters.initializers_run, 2);
        assert!(counters.ready_at_ms.is_some_and(|at| at < 2_000));
        Ok(())
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn static_routes_render_without_broken_links() -> Result<()> {
        init_logging();
        let config = test_config();
        let local = LocalSet::new();
        for route in Route::KNOWN.into_iter().filter(|route| *route != Route::Home) {
            let report = local.run_until(render_route(&route, &config)).await?;
            assert!(report.issues.is_empty(), "{route}: {:?}", report.issues);
            assert!(report.html.contains(route.title()), "{route}");
            assert!(report.counters.is_none());
        }

        let missing = Route::from_path("/careers/");
        let report = local.run_until(render_route(&missing, &config)).await?;
        assert!(report.html.contains("Page Not Found"));
        Ok(())
    }
}
