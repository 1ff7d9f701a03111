//! Benchmarks for canvas compositing.
//!
//! Run with: cargo bench -p tessel-render --bench canvas_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use tessel_render::present::present_frame;
use tessel_render::{Canvas, Line, StyledText};
use tessel_style::Style;

// =============================================================================
// Overlay: full-size and quarter-size patches
// =============================================================================

fn bench_overlay(c: &mut Criterion) {
    let mut group = c.benchmark_group("canvas/overlay");

    for (w, h) in [(80u16, 24u16), (120, 40), (200, 60)] {
        group.throughput(Throughput::Elements(u64::from(w) * u64::from(h)));
        let base = Canvas::empty(w, h).unwrap();
        let full = Canvas::empty(w, h).unwrap();
        let quarter = Canvas::empty(w / 2, h / 2).unwrap();

        group.bench_with_input(
            BenchmarkId::new("full", format!("{w}x{h}")),
            &(&base, &full),
            |b, (base, patch)| b.iter(|| black_box(base.overlay(patch, 0, 0).unwrap())),
        );
        group.bench_with_input(
            BenchmarkId::new("quarter_anchored", format!("{w}x{h}")),
            &(&base, &quarter),
            |b, (base, patch)| b.iter(|| black_box(base.overlay(patch, -1, -1).unwrap())),
        );
    }

    group.finish();
}

// =============================================================================
// Presenter: styled rows
// =============================================================================

fn bench_present(c: &mut Criterion) {
    let mut group = c.benchmark_group("canvas/present");

    for h in [24u16, 60] {
        let lines: Vec<Line> = (0..h)
            .map(|i| {
                Line::from(vec![
                    StyledText::styled(format!("{i:>4} "), Style::BOLD),
                    StyledText::raw("x".repeat(70)),
                ])
            })
            .collect();
        let canvas = Canvas::from_lines(&lines).unwrap();
        group.bench_with_input(BenchmarkId::new("frame", h), &canvas, |b, canvas| {
            b.iter(|| black_box(present_frame(canvas)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_overlay, bench_present);
criterion_main!(benches);
