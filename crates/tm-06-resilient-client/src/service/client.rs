//! Public handle.

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use shared_types::{
    ConnectionInfo, ConnectionStatus, MessageKind, SystemTimeSource, TimeSource, Timestamp,
    WireMessage,
};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc};

use super::actor::{Actor, Command};
use crate::adapters::tungstenite::TungsteniteConnector;
use crate::domain::config::ClientConfig;
use crate::domain::events::{ClientEvent, Visibility};
use crate::domain::listeners::{ListenerRegistry, MessageListenerId};
use crate::error::ClientError;
use crate::ports::transport::Connector;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// State the actor publishes and the handle reads without a round trip.
pub(super) struct Shared {
    pub(super) info: RwLock<ConnectionInfo>,
    pub(super) last_pong: Mutex<Option<Timestamp>>,
    pub(super) listeners: ListenerRegistry,
}

/// Handle to one resilient connection.
///
/// Every method is non-blocking: commands are queued to the actor in call
/// order.
pub struct ResilientClient {
    commands: mpsc::UnboundedSender<Command>,
    events: broadcast::Sender<ClientEvent>,
    shared: Arc<Shared>,
    clock: Arc<dyn TimeSource>,
}

impl ResilientClient {
    /// WebSocket client with the system clock.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Self::with_connector(
            config,
            Arc::new(TungsteniteConnector),
            Arc::new(SystemTimeSource),
        )
    }

    pub fn with_connector(
        config: ClientConfig,
        connector: Arc<dyn Connector>,
        clock: Arc<dyn TimeSource>,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| ClientError::NoRuntime)?;

        let (commands, command_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let shared = Arc::new(Shared {
            info: RwLock::new(ConnectionInfo::default()),
            last_pong: Mutex::new(None),
            listeners: ListenerRegistry::new(),
        });

        let actor = Actor::new(
            config,
            connector,
            Arc::clone(&clock),
            command_rx,
            events.clone(),
            Arc::clone(&shared),
        );
        runtime.spawn(actor.run());

        Ok(Self {
            commands,
            events,
            shared,
            clock,
        })
    }

    /// Start connecting. A no-op while already connected or connecting.
    /// After `GaveUp`, starts a fresh attempt cycle.
    pub fn connect(&self) -> Result<(), ClientError> {
        self.command(Command::Connect)
    }

    /// Close with code 1000. No reconnect is scheduled.
    pub fn disconnect(&self) -> Result<(), ClientError> {
        self.command(Command::Disconnect)
    }

    /// Send `data` as a frame of type `kind`; queued while not connected.
    pub fn send(
        &self,
        kind: impl Into<MessageKind>,
        data: serde_json::Value,
    ) -> Result<(), ClientError> {
        let message = WireMessage::new(kind, data).with_timestamp(self.clock.now());
        self.command(Command::Send(message))
    }

    pub fn send_payload<T: Serialize>(
        &self,
        kind: impl Into<MessageKind>,
        payload: &T,
    ) -> Result<(), ClientError> {
        self.send(kind, serde_json::to_value(payload)?)
    }

    pub fn set_visibility(&self, visibility: Visibility) -> Result<(), ClientError> {
        self.command(Command::SetVisibility(visibility))
    }

    /// Register a listener for frames of type `kind`.
    pub fn on<F>(&self, kind: impl Into<MessageKind>, listener: F) -> MessageListenerId
    where
        F: Fn(&WireMessage) + Send + Sync + 'static,
    {
        self.shared.listeners.on(kind, listener)
    }

    pub fn off(&self, id: MessageListenerId) -> bool {
        self.shared.listeners.off(id)
    }

    /// Lifecycle and message events from now on.
    pub fn events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub fn connection_info(&self) -> ConnectionInfo {
        self.shared.info.read().clone()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.shared.info.read().status
    }

    pub fn is_connected(&self) -> bool {
        self.shared.info.read().is_connected
    }

    /// Time the last `pong` arrived.
    pub fn last_pong(&self) -> Option<Timestamp> {
        *self.shared.last_pong.lock()
    }

    fn command(&self, command: Command) -> Result<(), ClientError> {
        self.commands
            .send(command)
            .map_err(|_| ClientError::Stopped)
    }
}
