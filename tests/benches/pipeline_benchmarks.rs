//! # Threat-Map Pipeline Benchmarks
//!
//! | Area | Operation | Target |
//! |------|-----------|--------|
//! | tm-02 Event Store | push + evict at capacity | < 1µs |
//! | tm-03 Synthesis | one tick into the store | < 10µs |
//! | tm-03 Identity | synthetic IP derivation | < 1µs |
//! | tm-04 Dispatch | tick fan-out to N listeners | < 50µs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared_types::{Direction, ManualTimeSource};
use std::sync::Arc;
use tm_01_region_catalog::{CategoryTable, RegionCatalog};
use tm_02_event_store::{BoundedEventStore, StoreConfig};
use tm_03_event_synthesis::{derive_synthetic_ip, EventSynthesizer};
use tm_04_local_dispatch::{DispatchConfig, DispatchEvent, DispatcherContext, ListenerResult};

fn synthesizer() -> EventSynthesizer<StdRng> {
    EventSynthesizer::new(
        Arc::new(RegionCatalog::builtin()),
        Arc::new(CategoryTable::builtin()),
        StdRng::seed_from_u64(1),
    )
}

// ============================================================================
// TM-02: Event Store
// ============================================================================

fn bench_store_push_at_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("tm-02-event-store");
    group.throughput(Throughput::Elements(1));

    let mut source = synthesizer();
    let events: Vec<_> = (0..1_000u64)
        .filter_map(|i| source.synthesize(i, 8_000))
        .collect();

    let mut store = BoundedEventStore::new(StoreConfig::default()).expect("default config");
    for event in &events {
        store.push_feature(event.source.clone());
        store.push_flow(event.flow.clone());
    }

    let mut cursor = 0usize;
    group.bench_function("push_feature_and_flow", |b| {
        b.iter(|| {
            let event = &events[cursor % events.len()];
            cursor += 1;
            store.push_feature(black_box(event.source.clone()));
            store.push_flow(black_box(event.flow.clone()));
        })
    });

    group.bench_function("snapshot", |b| b.iter(|| black_box(store.snapshot(500))));
    group.finish();
}

// ============================================================================
// TM-03: Synthesis
// ============================================================================

fn bench_synthesis_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tm-03-synthesis");
    group.throughput(Throughput::Elements(1));

    let mut synthesizer = synthesizer();
    let mut store = BoundedEventStore::with_defaults();
    let mut now = 0u64;
    group.bench_function("tick_into_store", |b| {
        b.iter(|| {
            now += 1_500;
            black_box(synthesizer.tick_into(&mut store, now))
        })
    });

    group.bench_function("derive_synthetic_ip", |b| {
        let mut ts = 1_700_000_000_000u64;
        b.iter(|| {
            ts += 1;
            black_box(derive_synthetic_ip(
                black_box("Germany"),
                Direction::Source,
                ts,
            ))
        })
    });
    group.finish();
}

// ============================================================================
// TM-04: Dispatch fan-out
// ============================================================================

fn bench_dispatch_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("tm-04-dispatch");
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let _guard = runtime.enter();

    for listeners in [1usize, 10, 100] {
        let dispatcher = DispatcherContext::with_rng(
            DispatchConfig {
                broadcast_interval_ms: 3_600_000,
                ..Default::default()
            },
            Arc::new(RegionCatalog::builtin()),
            Arc::new(CategoryTable::builtin()),
            Arc::new(ManualTimeSource::new(0)),
            StdRng::seed_from_u64(3),
        )
        .expect("valid dispatch config");

        let subscriptions: Vec<_> = (0..listeners)
            .map(|_| {
                dispatcher
                    .subscribe(|event: &DispatchEvent| -> ListenerResult {
                        black_box(event);
                        Ok(())
                    })
                    .expect("subscribe")
            })
            .collect();

        group.throughput(Throughput::Elements(listeners as u64));
        group.bench_with_input(BenchmarkId::new("tick", listeners), &listeners, |b, _| {
            b.iter(|| black_box(dispatcher.tick()))
        });

        drop(subscriptions);
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_store_push_at_capacity,
    bench_synthesis_tick,
    bench_dispatch_fanout
);
criterion_main!(benches);
