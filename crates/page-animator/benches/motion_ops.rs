//! Motion Operations Benchmarks
//!
//! Benchmarks for easing evaluation, scroll trigger updates and full page
//! frames against the mock document.
//!
//! Run with: `cargo bench --bench motion_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use page_animator::motion::sample_ease;
use page_animator::prelude::*;
use page_animator::scroll::TriggerRegistry;

fn bench_ease_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("ease_evaluate");

    for name in ["none", "power4.out", "power3.inOut", "sine.inOut", "bounce.out"] {
        let ease: Ease = name.parse().unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), &ease, |bench, ease| {
            bench.iter(|| {
                let mut sum = 0.0;
                for i in 0..=100 {
                    sum += ease.evaluate(black_box(f64::from(i) / 100.0));
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

fn bench_sample_ease(c: &mut Criterion) {
    let ease: Ease = "cubic-bezier(0.25, 0.1, 0.25, 1)".parse().unwrap();
    c.bench_function("sample_cubic_bezier_60", |bench| {
        bench.iter(|| black_box(sample_ease(black_box(&ease), 60)));
    });
}

fn page(triggers: usize) -> MockDom {
    let mut dom = MockDom::new(Viewport::new(1280.0, 800.0));
    dom.set_document_height(200.0 * triggers as f64 + 1000.0);
    for i in 0..triggers {
        dom.insert(
            MockNode::new("h2")
                .with_class("section__title")
                .with_layout(Rect::new(0.0, 200.0 * i as f64, 1280.0, 80.0)),
        );
    }
    dom
}

fn bench_trigger_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("trigger_update");

    for count in [10_usize, 100, 1000] {
        let mut dom = page(count);
        let mut registry = TriggerRegistry::new();
        for node in dom.query_all(".section__title") {
            let _ = registry.create(&dom, TriggerConfig::new(node, "top 85%".parse().unwrap()), 0.0);
        }
        let max = 200.0 * count as f64;
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |bench, _| {
            let mut scroll = 0.0;
            bench.iter(|| {
                scroll = (scroll + 37.0) % max;
                black_box(registry.update_page(black_box(scroll)))
            });
        });
    }

    group.finish();
}

fn bench_page_frame(c: &mut Criterion) {
    let mut animator = PageAnimator::new(page(50), AnimatorConfig::default()).unwrap();
    animator.start(0);
    let mut now = 0;
    c.bench_function("page_frame_50_reveals", |bench| {
        bench.iter(|| {
            now += 16;
            let scroll = (now % 10_000) as f64;
            animator.dom_mut().set_scroll_y(scroll);
            animator.frame(black_box(now));
        });
    });
}

criterion_group!(
    benches,
    bench_ease_evaluate,
    bench_sample_ease,
    bench_trigger_update,
    bench_page_frame
);
criterion_main!(benches);
