use criterion::{Criterion, criterion_group, criterion_main};
use page_loader::{IntersectionEntry, ObserverOptions, Rect, RootMargin, Viewport};
use std::hint::black_box;

/// Placeholder regions stacked the way the home page lays out its sections.
fn stacked_regions() -> Vec<Rect> {
    let heights = [720.0, 640.0, 760.0, 900.0, 560.0, 820.0, 700.0];
    let mut top = 64.0;
    heights
        .iter()
        .map(|height| {
            let rect = Rect::new(0.0, top, 1280.0, *height);
            top += height;
            rect
        })
        .collect()
}

fn bench_scroll_sweep(criterion: &mut Criterion) {
    let regions = stacked_regions();
    let options = ObserverOptions::default();
    let viewport = Viewport::new(1280.0, 800.0);
    // One full scroll of the page in 20px steps, every region evaluated per step.
    criterion.bench_function("intersection_scroll_sweep", |bencher| {
        bencher.iter(|| {
            let mut visible = 0_usize;
            for (frame, step) in (0_u64..).zip(0..250_u16) {
                let view = viewport.scrolled_to(f32::from(step) * 20.0);
                for region in &regions {
                    let entry = IntersectionEntry::compute(*region, &view, &options, frame);
                    visible += usize::from(entry.is_visible);
                }
            }
            black_box(visible);
        });
    });
}

fn bench_margin_parse(criterion: &mut Criterion) {
    criterion.bench_function("root_margin_parse", |bencher| {
        bencher.iter(|| black_box("0px 0px 320px 0px").parse::<RootMargin>());
    });
}

criterion_group!(intersection_benches, bench_scroll_sweep, bench_margin_parse);
criterion_main!(intersection_benches);
