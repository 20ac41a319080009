//! Benchmarks for column layout and viewport virtualization.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vgrid::layout::{compute_metrics, horizontal_range, vertical_range, RowHeights, WidthOverrides};
use vgrid::{Column, GridConfig, NoopHost, ViewportController};

fn columns(count: usize) -> Vec<Column> {
    (0..count)
        .map(|i| {
            let column = Column::new(format!("col{i}"));
            match i % 3 {
                0 => column.with_width(120.0),
                1 => column.with_min_width(60.0),
                _ => column,
            }
        })
        .collect()
}

/// Column metrics for growing column counts
fn bench_compute_metrics(c: &mut Criterion) {
    let overrides = WidthOverrides::new();
    let mut group = c.benchmark_group("compute_metrics");
    for count in [10usize, 100, 1_000, 10_000] {
        let cols = columns(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &cols, |b, cols| {
            b.iter(|| compute_metrics(black_box(cols), 80.0, 1_280.0, &overrides));
        });
    }
    group.finish();
}

/// Binary search for the visible ranges at scattered scroll offsets
fn bench_ranges(c: &mut Criterion) {
    let metrics = compute_metrics(&columns(1_000), 80.0, 1_280.0, &WidthOverrides::new())
        .expect("viewport is measured");
    let heights = RowHeights::Fixed(35.0);

    c.bench_function("horizontal_range_1000_columns", |b| {
        b.iter(|| {
            for step in 0..100 {
                let scroll_left = step as f32 * 997.0;
                black_box(horizontal_range(&metrics, black_box(scroll_left), 1));
            }
        });
    });

    c.bench_function("vertical_range_1m_rows", |b| {
        b.iter(|| {
            for step in 0..100 {
                let scroll_top = step as f32 * 350_003.0;
                black_box(vertical_range(&heights, 1_000_000, scroll_top, 700.0, 2));
            }
        });
    });
}

/// Full render plan while scrolling, memoized metrics included
fn bench_scroll_render_plan(c: &mut Criterion) {
    let mut grid = ViewportController::new(GridConfig::default(), NoopHost);
    grid.set_columns(columns(200));
    grid.set_row_count(100_000);
    grid.resize(1_280.0, 720.0);

    c.bench_function("scroll_render_plan", |b| {
        let mut step = 0u32;
        b.iter(|| {
            step = step.wrapping_add(1);
            let offset = (step % 1_000) as f32;
            grid.handle_scroll(offset * 17.0, offset * 113.0);
            black_box(grid.render_plan())
        });
    });
}

criterion_group!(
    benches,
    bench_compute_metrics,
    bench_ranges,
    bench_scroll_render_plan
);
criterion_main!(benches);
