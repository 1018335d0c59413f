//! Listener contract.

use shared_types::{Feature, Flow};
use std::error::Error;
use tm_02_event_store::StoreSnapshot;

pub type ListenerId = u64;

pub type ListenerResult = Result<(), Box<dyn Error + Send + Sync>>;

/// What a listener receives.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchEvent {
    /// Current buffers, delivered once on subscribe.
    Snapshot(StoreSnapshot),
    /// One synthesized flow plus the feature buffer after insertion
    /// (newest first).
    Tick { flow: Flow, features: Vec<Feature> },
}

/// A registered callback.
///
/// Closures of the shape `Fn(&DispatchEvent) -> ListenerResult` implement
/// this automatically.
pub trait Listener: Send + Sync {
    fn on_event(&self, event: &DispatchEvent) -> ListenerResult;
}

impl<F> Listener for F
where
    F: Fn(&DispatchEvent) -> ListenerResult + Send + Sync,
{
    fn on_event(&self, event: &DispatchEvent) -> ListenerResult {
        self(event)
    }
}
