//! # Pipeline Integration Tests
//!
//! Catalog → Synthesizer → Store → Dispatcher, without any transport.
//!
//! ```text
//! RegionCatalog ──▶ EventSynthesizer ──tick_into──▶ BoundedEventStore
//!                                                        │
//!                         DispatcherContext ◀────────────┘
//!                              │ Snapshot, Tick, Tick, ...
//!                              ▼
//!                          listeners
//! ```

#[cfg(test)]
mod tests {
    use crate::fixtures::{dispatcher_over, seeded_rng, two_region_catalog};
    use parking_lot::Mutex;
    use shared_types::{Direction, ManualTimeSource, TimeSource};
    use std::collections::HashSet;
    use std::sync::Arc;
    use tm_01_region_catalog::{CategoryTable, RegionCatalog};
    use tm_02_event_store::{BoundedEventStore, StoreConfig};
    use tm_03_event_synthesis::EventSynthesizer;
    use tm_04_local_dispatch::{DispatchConfig, DispatchEvent, ListenerResult};

    const FLOW_TTL: u64 = 8_000;

    fn store() -> BoundedEventStore {
        BoundedEventStore::new(StoreConfig {
            feature_limit: 120,
            flow_limit: 60,
            flow_ttl_ms: FLOW_TTL,
        })
        .expect("valid store config")
    }

    fn synthesizer(catalog: Arc<RegionCatalog>) -> EventSynthesizer<rand::rngs::StdRng> {
        EventSynthesizer::new(catalog, Arc::new(CategoryTable::builtin()), seeded_rng(11))
    }

    /// Dispatcher whose own timer never fires during a test.
    fn manual_config() -> DispatchConfig {
        DispatchConfig {
            broadcast_interval_ms: 3_600_000,
            ..Default::default()
        }
    }

    // =========================================================================
    // SYNTHESIS INTO THE STORE
    // =========================================================================

    #[test]
    fn test_two_region_tick_produces_pair_and_flow() {
        let mut synthesizer = synthesizer(two_region_catalog());
        let mut store = store();
        let now = 1_700_000_000_000;

        let event = synthesizer
            .tick_into(&mut store, now)
            .expect("two regions are enough to synthesize");

        let snapshot = store.snapshot(now);
        assert_eq!(snapshot.features.len(), 2);
        assert_eq!(snapshot.flows.len(), 1);

        let directions: HashSet<Direction> =
            snapshot.features.iter().map(|f| f.direction).collect();
        assert_eq!(
            directions,
            HashSet::from([Direction::Source, Direction::Destination])
        );

        let flow = &snapshot.flows[0];
        let mut names = [flow.src.name.as_str(), flow.dst.name.as_str()];
        names.sort_unstable();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(flow.expires_at, flow.created_at + FLOW_TTL);
        assert_eq!(flow, &event.flow);
        assert_eq!(flow.src.feature_id, event.source.id);
        assert_eq!(flow.dst.feature_id, event.destination.id);
    }

    #[test]
    fn test_single_region_catalog_leaves_store_untouched() {
        let catalog = Arc::new(RegionCatalog::from_regions(vec![shared_types::Region::new(
            "Only", "", "", 1.0, 1.0,
        )]));
        let mut synthesizer = synthesizer(catalog);
        let mut store = store();

        assert!(synthesizer.tick_into(&mut store, 1_000).is_none());
        assert!(store.snapshot(1_000).is_empty());
    }

    #[test]
    fn test_snapshot_is_idempotent_without_ticks() {
        let mut synthesizer = synthesizer(two_region_catalog());
        let mut store = store();
        for i in 0..5 {
            synthesizer.tick_into(&mut store, 10_000 + i * 100);
        }

        let first = store.snapshot(11_000);
        let second = store.snapshot(11_000);
        assert_eq!(first, second);
        assert_eq!(first.features.len(), 10);
        assert_eq!(first.flows.len(), 5);
    }

    #[test]
    fn test_flows_expire_on_the_clock() {
        let clock = ManualTimeSource::new(50_000);
        let mut synthesizer = synthesizer(two_region_catalog());
        let mut store = store();

        synthesizer.tick_into(&mut store, clock.now());
        clock.advance(FLOW_TTL - 1);
        assert_eq!(store.current_flows(clock.now()).len(), 1);

        clock.advance(1);
        assert!(store.current_flows(clock.now()).is_empty());
        // Features outlive their flows.
        assert_eq!(store.features().len(), 2);
    }

    // =========================================================================
    // DISPATCHER FAN-OUT
    // =========================================================================

    type Seen = Arc<Mutex<Vec<DispatchEvent>>>;

    fn recorder(seen: &Seen) -> impl Fn(&DispatchEvent) -> ListenerResult + Send + Sync {
        let seen = Arc::clone(seen);
        move |event: &DispatchEvent| -> ListenerResult {
            seen.lock().push(event.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_subscriber_sees_snapshot_then_ticks() {
        let clock = ManualTimeSource::new(1_000);
        let dispatcher = dispatcher_over(
            two_region_catalog(),
            manual_config(),
            Arc::new(clock.clone()),
        );
        dispatcher.tick();

        let seen: Seen = Arc::default();
        let subscription = dispatcher.subscribe(recorder(&seen)).expect("subscribe");
        clock.advance(100);
        assert!(dispatcher.tick());

        let events = seen.lock().clone();
        assert_eq!(events.len(), 2);
        match &events[0] {
            DispatchEvent::Snapshot(snapshot) => {
                assert_eq!(snapshot.flows.len(), 1);
                assert_eq!(snapshot.features.len(), 2);
            }
            other => panic!("expected snapshot first, got {other:?}"),
        }
        match &events[1] {
            DispatchEvent::Tick { flow, features } => {
                assert_eq!(flow.created_at, 1_100);
                assert_eq!(features.len(), 4);
                // Newest first.
                assert_eq!(features[0].timestamp, 1_100);
            }
            other => panic!("expected tick, got {other:?}"),
        }

        subscription.unsubscribe();
        assert!(!dispatcher.is_running());
    }

    #[tokio::test]
    async fn test_failing_listener_does_not_starve_others() {
        let dispatcher = dispatcher_over(
            two_region_catalog(),
            manual_config(),
            Arc::new(ManualTimeSource::new(5_000)),
        );

        let _failing = dispatcher
            .subscribe(|event: &DispatchEvent| -> ListenerResult {
                match event {
                    DispatchEvent::Tick { .. } => Err("listener refused tick".into()),
                    DispatchEvent::Snapshot(_) => Ok(()),
                }
            })
            .expect("subscribe failing");
        let seen: Seen = Arc::default();
        let _healthy = dispatcher.subscribe(recorder(&seen)).expect("subscribe healthy");

        assert!(dispatcher.tick());
        assert!(dispatcher.tick());

        let ticks = seen
            .lock()
            .iter()
            .filter(|e| matches!(e, DispatchEvent::Tick { .. }))
            .count();
        assert_eq!(ticks, 2);
        assert_eq!(dispatcher.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_expired_flows_leave_dispatcher_snapshot() {
        let clock = ManualTimeSource::new(0);
        let dispatcher = dispatcher_over(
            two_region_catalog(),
            DispatchConfig {
                flow_ttl_ms: 500,
                ..manual_config()
            },
            Arc::new(clock.clone()),
        );

        dispatcher.tick();
        assert_eq!(dispatcher.snapshot().flows.len(), 1);

        clock.advance(500);
        let snapshot = dispatcher.snapshot();
        assert!(snapshot.flows.is_empty());
        assert_eq!(snapshot.features.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shared_timer_drives_ticks() {
        let dispatcher = dispatcher_over(
            two_region_catalog(),
            DispatchConfig {
                broadcast_interval_ms: 100,
                ..Default::default()
            },
            Arc::new(ManualTimeSource::new(0)),
        );
        let seen: Seen = Arc::default();
        let _subscription = dispatcher.subscribe(recorder(&seen)).expect("subscribe");

        tokio::time::sleep(std::time::Duration::from_millis(350)).await;

        let ticks = seen
            .lock()
            .iter()
            .filter(|e| matches!(e, DispatchEvent::Tick { .. }))
            .count();
        assert_eq!(ticks, 3);
    }
}
