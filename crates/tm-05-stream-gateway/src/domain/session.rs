//! Open-session bookkeeping.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use threat_telemetry::ACTIVE_STREAM_SESSIONS;
use tracing::debug;
use uuid::Uuid;

/// Unique per-connection identifier used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    /// `/ws`
    Stream,
    /// `/sse`
    Sse,
    /// `/ws/live`
    Live,
}

/// Set of currently open sessions. Clones share the same set.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<SessionId, SessionKind>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session. It stays registered until the guard drops.
    pub fn open(&self, kind: SessionKind) -> SessionGuard {
        let id = SessionId::new();
        self.sessions.lock().insert(id, kind);
        ACTIVE_STREAM_SESSIONS.inc();
        debug!(connection_id = %id, ?kind, "Session registered");
        SessionGuard {
            id,
            kind,
            registry: self.clone(),
        }
    }

    pub fn count(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn count_of(&self, kind: SessionKind) -> usize {
        self.sessions.lock().values().filter(|k| **k == kind).count()
    }

    fn close(&self, id: SessionId) {
        if self.sessions.lock().remove(&id).is_some() {
            ACTIVE_STREAM_SESSIONS.dec();
            debug!(connection_id = %id, "Session released");
        }
    }
}

/// Membership of one session in the registry.
#[must_use]
#[derive(Debug)]
pub struct SessionGuard {
    id: SessionId,
    kind: SessionKind,
    registry: SessionRegistry,
}

impl SessionGuard {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn kind(&self) -> SessionKind {
        self.kind
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.registry.close(self.id);
    }
}
