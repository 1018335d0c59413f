//! Listeners keyed by message type.

use parking_lot::RwLock;
use shared_types::{MessageKind, WireMessage};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::warn;

pub type MessageListenerId = u64;

pub type MessageListener = Arc<dyn Fn(&WireMessage) + Send + Sync>;

/// Routes inbound frames to listeners by their literal `type` string, so
/// unknown kinds reach listeners the same way known ones do.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: AtomicU64,
    by_kind: RwLock<HashMap<String, Vec<(MessageListenerId, MessageListener)>>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&self, kind: impl Into<MessageKind>, listener: F) -> MessageListenerId
    where
        F: Fn(&WireMessage) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let kind = kind.into().as_str().to_string();
        self.by_kind
            .write()
            .entry(kind)
            .or_default()
            .push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn off(&self, id: MessageListenerId) -> bool {
        let mut by_kind = self.by_kind.write();
        let mut removed = false;
        by_kind.retain(|_, listeners| {
            let before = listeners.len();
            listeners.retain(|(lid, _)| *lid != id);
            removed |= listeners.len() != before;
            !listeners.is_empty()
        });
        removed
    }

    pub fn count(&self, kind: &MessageKind) -> usize {
        self.by_kind.read().get(kind.as_str()).map_or(0, Vec::len)
    }

    /// Invoke every listener for `message.kind`, in registration order.
    /// A panicking listener is logged and skipped.
    pub fn dispatch(&self, message: &WireMessage) -> usize {
        let listeners: Vec<(MessageListenerId, MessageListener)> = match self
            .by_kind
            .read()
            .get(message.kind.as_str())
        {
            Some(listeners) => listeners.clone(),
            None => return 0,
        };

        for (id, listener) in &listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(message))).is_err() {
                warn!(listener_id = id, kind = %message.kind, "Message listener panicked");
            }
        }
        listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::json;

    #[test]
    fn test_routes_by_literal_type() {
        let registry = ListenerRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let s = Arc::clone(&seen);
        registry.on("threat-intel", move |m| s.lock().push(m.data["n"].clone()));
        let s = Arc::clone(&seen);
        registry.on(MessageKind::Update, move |_| s.lock().push(json!("update")));

        let delivered = registry.dispatch(&WireMessage::new("threat-intel", json!({"n": 1})));
        assert_eq!(delivered, 1);
        registry.dispatch(&WireMessage::new("stats", json!({})));
        assert_eq!(*seen.lock(), vec![json!(1)]);
    }

    #[test]
    fn test_off_removes_only_that_listener() {
        let registry = ListenerRegistry::new();
        let a = registry.on("update", |_| {});
        let _b = registry.on("update", |_| {});
        assert!(registry.off(a));
        assert!(!registry.off(a));
        assert_eq!(registry.count(&MessageKind::Update), 1);
    }

    #[test]
    fn test_panicking_listener_does_not_block_others() {
        let registry = ListenerRegistry::new();
        let hits = Arc::new(Mutex::new(0));
        registry.on("log", |_| panic!("boom"));
        let h = Arc::clone(&hits);
        registry.on("log", move |_| *h.lock() += 1);

        registry.dispatch(&WireMessage::new("log", json!({})));
        assert_eq!(*hits.lock(), 1);
    }
}
