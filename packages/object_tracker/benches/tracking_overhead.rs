//! Benchmarks to measure the compute overhead of the tracking registry
//! itself.
//!
//! The registry sits on every interop call path, so a track/untrack pair
//! must stay cheap. These benchmarks exercise the registry with trivial
//! wrappers to isolate the cost of the tracking infrastructure.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use object_tracker::{Handle, NativeObject, Registry};

struct BenchWrapper {
    handle: Handle,
}

impl NativeObject for BenchWrapper {
    fn handle(&self) -> Handle {
        self.handle
    }
}

criterion_group!(benches, entrypoint);
criterion_main!(benches);

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("object_tracker_overhead");

    // Baseline measurement - wrapper allocation without any tracking.
    group.bench_function("baseline_wrapper_only", |b| {
        b.iter(|| {
            let wrapper = Arc::new(BenchWrapper {
                handle: Handle::new(0x1000),
            });
            black_box(wrapper);
        });
    });

    {
        let registry = Registry::new();

        group.bench_function("track_untrack_pair", |b| {
            b.iter(|| {
                let wrapper = Arc::new(BenchWrapper {
                    handle: Handle::new(0x1000),
                });
                registry.track(&wrapper);
                registry.untrack(&wrapper);
                black_box(wrapper);
            });
        });
    }

    {
        let registry = Registry::new();
        let resident = Arc::new(BenchWrapper {
            handle: Handle::new(0x2000),
        });
        registry.track(&resident);

        group.bench_function("find_by_handle_hit", |b| {
            b.iter(|| {
                black_box(registry.find_by_handle(Handle::new(0x2000)));
            });
        });

        group.bench_function("find_by_handle_miss", |b| {
            b.iter(|| {
                black_box(registry.find_by_handle(Handle::new(0x3000)));
            });
        });
    }

    {
        // Track/untrack cost with an observer registered on each event.
        let registry = Registry::new();
        registry.on_tracked(|wrapper| {
            black_box(wrapper.handle());
        });
        registry.on_untracked(|wrapper| {
            black_box(wrapper.handle());
        });

        group.bench_function("track_untrack_pair_with_observers", |b| {
            b.iter(|| {
                let wrapper = Arc::new(BenchWrapper {
                    handle: Handle::new(0x1000),
                });
                registry.track(&wrapper);
                registry.untrack(&wrapper);
                black_box(wrapper);
            });
        });
    }

    group.finish();
}
