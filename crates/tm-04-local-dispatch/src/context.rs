//! The dispatcher context: store, synthesizer, listeners and timer.

use parking_lot::{Mutex, ReentrantMutex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared_types::{TimeSource, Timestamp};
use std::any::Any;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use threat_telemetry::{EVENTS_SYNTHESIZED, FLOWS_EXPIRED, LISTENER_FAILURES};
use tm_01_region_catalog::{CategoryTable, RegionCatalog};
use tm_02_event_store::{BoundedEventStore, StoreSnapshot};
use tm_03_event_synthesis::EventSynthesizer;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::config::DispatchConfig;
use crate::error::DispatchError;
use crate::listener::{DispatchEvent, Listener, ListenerId};

/// Shared handle to one dispatcher. Clones refer to the same state.
#[derive(Clone)]
pub struct DispatcherContext {
    inner: Arc<Inner>,
}

struct Inner {
    config: DispatchConfig,
    clock: Arc<dyn TimeSource>,
    /// Serializes fan-out so a new listener's snapshot always precedes its
    /// first tick. Re-entrant so a listener may call back into the context.
    outbox: ReentrantMutex<RefCell<Outbox>>,
    state: Mutex<State>,
    next_id: AtomicU64,
}

struct State {
    store: BoundedEventStore,
    synthesizer: EventSynthesizer<StdRng>,
    listeners: Vec<(ListenerId, Arc<dyn Listener>)>,
    timer: Option<JoinHandle<()>>,
}

/// Pending fan-out, drained in FIFO order by the outermost caller on the
/// thread holding `outbox`.
#[derive(Default)]
struct Outbox {
    draining: bool,
    jobs: VecDeque<Delivery>,
}

enum Delivery {
    Snapshot {
        id: ListenerId,
        listener: Arc<dyn Listener>,
        event: DispatchEvent,
    },
    Tick {
        event: DispatchEvent,
        listeners: Vec<(ListenerId, Arc<dyn Listener>)>,
    },
}

impl Delivery {
    fn run(self) {
        match self {
            Delivery::Snapshot {
                id,
                listener,
                event,
            } => deliver(id, listener.as_ref(), &event),
            Delivery::Tick { event, listeners } => {
                trace!(listeners = listeners.len(), "Dispatching tick");
                for (id, listener) in &listeners {
                    deliver(*id, listener.as_ref(), &event);
                }
            }
        }
    }
}

impl State {
    fn prune(&mut self, now: Timestamp) {
        let expired = self.store.prune_expired_flows(now);
        if expired > 0 {
            FLOWS_EXPIRED.inc_by(expired as u64);
        }
    }
}

impl DispatcherContext {
    pub fn new(
        config: DispatchConfig,
        catalog: Arc<RegionCatalog>,
        categories: Arc<CategoryTable>,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, DispatchError> {
        Self::with_rng(config, catalog, categories, clock, StdRng::from_entropy())
    }

    /// Same as `new` with a caller-supplied RNG, for reproducible runs.
    pub fn with_rng(
        config: DispatchConfig,
        catalog: Arc<RegionCatalog>,
        categories: Arc<CategoryTable>,
        clock: Arc<dyn TimeSource>,
        rng: StdRng,
    ) -> Result<Self, DispatchError> {
        config.validate()?;
        let store = BoundedEventStore::new(config.store_config())?;
        let synthesizer = EventSynthesizer::new(catalog, categories, rng);

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                clock,
                outbox: ReentrantMutex::new(RefCell::new(Outbox::default())),
                state: Mutex::new(State {
                    store,
                    synthesizer,
                    listeners: Vec::new(),
                    timer: None,
                }),
                next_id: AtomicU64::new(1),
            }),
        })
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.inner.config
    }

    /// Register `listener`, start the shared timer if it is the first one,
    /// and deliver the current snapshot to it before returning.
    ///
    /// Called from inside a listener, the snapshot is delivered once the
    /// current fan-out finishes, still ahead of any later tick.
    ///
    /// Must be called from inside a Tokio runtime.
    pub fn subscribe<L>(&self, listener: L) -> Result<Subscription, DispatchError>
    where
        L: Listener + 'static,
    {
        let handle = Handle::try_current().map_err(|_| DispatchError::NoRuntime)?;
        let listener: Arc<dyn Listener> = Arc::new(listener);
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        let outbox = self.inner.outbox.lock();
        let snapshot = {
            let mut state = self.inner.state.lock();
            state.listeners.push((id, Arc::clone(&listener)));

            if state.timer.is_none() {
                let period = self.inner.config.broadcast_interval();
                state.timer = Some(spawn_timer(&handle, Arc::downgrade(&self.inner), period));
                info!(interval_ms = period.as_millis() as u64, "Dispatcher timer started");
            }

            let now = self.inner.clock.now();
            state.prune(now);
            state.store.snapshot(now)
        };

        debug!(listener_id = id, "Listener subscribed");
        drain(
            &outbox,
            Delivery::Snapshot {
                id,
                listener,
                event: DispatchEvent::Snapshot(snapshot),
            },
        );
        drop(outbox);

        Ok(Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
            active: true,
        })
    }

    /// Current buffers with expired flows removed.
    pub fn snapshot(&self) -> StoreSnapshot {
        let mut state = self.inner.state.lock();
        let now = self.inner.clock.now();
        state.prune(now);
        state.store.snapshot(now)
    }

    /// Run one synthesis + fan-out cycle immediately. Returns `false` when
    /// synthesis is unavailable.
    pub fn tick(&self) -> bool {
        self.inner.tick()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.state.lock().listeners.len()
    }

    /// Whether the shared timer is currently scheduled.
    pub fn is_running(&self) -> bool {
        self.inner.state.lock().timer.is_some()
    }

    pub fn is_synthesis_enabled(&self) -> bool {
        self.inner.state.lock().synthesizer.is_enabled()
    }
}

impl fmt::Debug for DispatcherContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatcherContext")
            .field("config", &self.inner.config)
            .field("subscribers", &self.subscriber_count())
            .field("running", &self.is_running())
            .finish()
    }
}

impl Inner {
    fn tick(&self) -> bool {
        let outbox = self.outbox.lock();

        let (event, listeners) = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            let now = self.clock.now();

            let Some(synthesized) = state.synthesizer.tick_into(&mut state.store, now) else {
                trace!("Tick skipped: synthesis unavailable");
                return false;
            };
            EVENTS_SYNTHESIZED.inc();
            state.prune(now);

            let event = DispatchEvent::Tick {
                flow: synthesized.flow,
                features: state.store.features(),
            };
            let listeners: Vec<_> = state
                .listeners
                .iter()
                .map(|(id, listener)| (*id, Arc::clone(listener)))
                .collect();
            (event, listeners)
        };

        drain(&outbox, Delivery::Tick { event, listeners });
        true
    }

    fn remove(&self, id: ListenerId) {
        let timer = {
            let mut state = self.state.lock();
            state.listeners.retain(|(listener_id, _)| *listener_id != id);
            if state.listeners.is_empty() {
                state.timer.take()
            } else {
                None
            }
        };

        debug!(listener_id = id, "Listener unsubscribed");
        if let Some(timer) = timer {
            timer.abort();
            info!("Dispatcher timer stopped");
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(timer) = self.state.get_mut().timer.take() {
            timer.abort();
        }
    }
}

fn spawn_timer(handle: &Handle, inner: Weak<Inner>, period: Duration) -> JoinHandle<()> {
    handle.spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let Some(inner) = inner.upgrade() else {
                break;
            };
            inner.tick();
        }
        debug!("Dispatcher timer exited");
    })
}

/// Queue `job` and, unless an outer call on this thread is already draining,
/// run every queued job. No `RefCell` borrow is held while a listener runs.
fn drain(outbox: &RefCell<Outbox>, job: Delivery) {
    {
        let mut pending = outbox.borrow_mut();
        pending.jobs.push_back(job);
        if pending.draining {
            return;
        }
        pending.draining = true;
    }

    loop {
        let next = {
            let mut pending = outbox.borrow_mut();
            let next = pending.jobs.pop_front();
            if next.is_none() {
                pending.draining = false;
            }
            next
        };
        match next {
            Some(job) => job.run(),
            None => break,
        }
    }
}

fn deliver(id: ListenerId, listener: &dyn Listener, event: &DispatchEvent) {
    match panic::catch_unwind(AssertUnwindSafe(|| listener.on_event(event))) {
        Ok(Ok(())) => {}
        Ok(Err(error)) => {
            LISTENER_FAILURES.inc();
            warn!(listener_id = id, error = %error, "Listener failed");
        }
        Err(payload) => {
            LISTENER_FAILURES.inc();
            warn!(listener_id = id, panic = panic_message(payload.as_ref()), "Listener panicked");
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Handle returned by `subscribe`. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: ListenerId,
    inner: Weak<Inner>,
    active: bool,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !std::mem::take(&mut self.active) {
            return;
        }
        if let Some(inner) = self.inner.upgrade() {
            inner.remove(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}
