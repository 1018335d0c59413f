//! Connection actor. Owns the transport session, the queue and every timer.

use shared_types::{ConnectionInfo, ConnectionStatus, MessageKind, TimeSource, WireMessage};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use super::client::Shared;
use crate::domain::backoff::BackoffPolicy;
use crate::domain::config::{ClientConfig, NORMAL_CLOSURE};
use crate::domain::events::{ClientEvent, Visibility};
use crate::domain::queue::OutboundQueue;
use crate::error::TransportError;
use crate::ports::transport::{Connector, Inbound, TransportSession};

pub(super) enum Command {
    Connect,
    Disconnect,
    Send(WireMessage),
    SetVisibility(Visibility),
}

enum Phase {
    /// Nothing open, nothing scheduled.
    Idle,
    Backoff(Instant),
    Connecting,
    Connected(Box<dyn TransportSession>),
    Stopped,
}

/// Where an offline command arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Offline {
    Idle,
    Backoff,
    Connecting,
}

pub(super) struct Actor {
    config: Arc<ClientConfig>,
    backoff: BackoffPolicy,
    connector: Arc<dyn Connector>,
    clock: Arc<dyn TimeSource>,
    commands: mpsc::UnboundedReceiver<Command>,
    events: broadcast::Sender<ClientEvent>,
    shared: Arc<Shared>,
    queue: OutboundQueue,
    status: ConnectionStatus,
    attempts: u32,
    visibility: Visibility,
    /// Set by `connect()`, cleared by `disconnect()`.
    wanted: bool,
}

impl Actor {
    pub(super) fn new(
        config: ClientConfig,
        connector: Arc<dyn Connector>,
        clock: Arc<dyn TimeSource>,
        commands: mpsc::UnboundedReceiver<Command>,
        events: broadcast::Sender<ClientEvent>,
        shared: Arc<Shared>,
    ) -> Self {
        Self {
            backoff: BackoffPolicy::from_config(&config),
            queue: OutboundQueue::new(config.max_queue_size),
            config: Arc::new(config),
            connector,
            clock,
            commands,
            events,
            shared,
            status: ConnectionStatus::Disconnected,
            attempts: 0,
            visibility: Visibility::Visible,
            wanted: false,
        }
    }

    pub(super) async fn run(mut self) {
        let mut phase = Phase::Idle;
        loop {
            phase = match phase {
                Phase::Idle => self.idle().await,
                Phase::Backoff(deadline) => self.wait_backoff(deadline).await,
                Phase::Connecting => self.connect().await,
                Phase::Connected(session) => self.connected(session).await,
                Phase::Stopped => break,
            };
        }
        debug!(url = %self.config.url, "Client stopped");
    }

    async fn idle(&mut self) -> Phase {
        loop {
            let command = self.commands.recv().await;
            if let Some(next) = self.offline_command(command, Offline::Idle) {
                return next;
            }
        }
    }

    async fn wait_backoff(&mut self, deadline: Instant) -> Phase {
        let sleep = tokio::time::sleep_until(deadline);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => return Phase::Connecting,
                command = self.commands.recv() => {
                    if let Some(next) = self.offline_command(command, Offline::Backoff) {
                        return next;
                    }
                }
            }
        }
    }

    async fn connect(&mut self) -> Phase {
        self.set_status(ConnectionStatus::Connecting);
        debug!(url = %self.config.url, attempt = self.attempts, "Connecting");

        let connector = Arc::clone(&self.connector);
        let config = Arc::clone(&self.config);
        let attempt = async move { connector.connect(&config).await };
        tokio::pin!(attempt);

        loop {
            tokio::select! {
                result = &mut attempt => {
                    return match result {
                        Ok(session) => {
                            self.attempts = 0;
                            self.set_status(ConnectionStatus::Connected);
                            self.emit(ClientEvent::Connected);
                            Phase::Connected(session)
                        }
                        Err(error) => self.on_failure(error),
                    };
                }
                command = self.commands.recv() => {
                    if let Some(next) = self.offline_command(command, Offline::Connecting) {
                        return next;
                    }
                }
            }
        }
    }

    async fn connected(&mut self, mut session: Box<dyn TransportSession>) -> Phase {
        if let Err(error) = self.flush(session.as_mut()).await {
            return self.on_failure(error);
        }

        let mut heartbeat = self.config.heartbeat().map(|period| {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        loop {
            let beating = heartbeat.is_some() && self.visibility == Visibility::Visible;
            tokio::select! {
                inbound = session.recv() => match inbound {
                    Ok(Inbound::Text(text)) => self.on_text(&text),
                    Ok(Inbound::Closed { code, reason }) => return self.on_closed(code, reason),
                    Err(error) => return self.on_failure(error),
                },
                _ = next_beat(&mut heartbeat), if beating => {
                    let ping = WireMessage::ping(self.clock.now());
                    if let Err(error) = self.write(session.as_mut(), &ping).await {
                        return self.on_failure(error);
                    }
                    trace!("Heartbeat ping sent");
                }
                command = self.commands.recv() => match command {
                    None => {
                        close(session.as_mut(), "client dropped").await;
                        return Phase::Stopped;
                    }
                    Some(Command::Send(message)) => {
                        if let Err(error) = self.write(session.as_mut(), &message).await {
                            self.enqueue(message);
                            return self.on_failure(error);
                        }
                    }
                    Some(Command::Disconnect) => {
                        self.wanted = false;
                        close(session.as_mut(), "client disconnect").await;
                        self.set_status(ConnectionStatus::Disconnected);
                        self.emit(ClientEvent::Disconnected {
                            code: Some(NORMAL_CLOSURE),
                            reason: "client disconnect".to_string(),
                        });
                        return Phase::Idle;
                    }
                    Some(Command::Connect) => {}
                    Some(Command::SetVisibility(visibility)) => {
                        debug!(?visibility, "Visibility changed");
                        self.visibility = visibility;
                        if visibility == Visibility::Visible {
                            if let Some(interval) = heartbeat.as_mut() {
                                interval.reset();
                            }
                        }
                    }
                },
            }
        }
    }

    /// Commands that arrive while no session is open. `Some` means leave the
    /// current phase.
    fn offline_command(&mut self, command: Option<Command>, at: Offline) -> Option<Phase> {
        let command = match command {
            Some(command) => command,
            None => return Some(Phase::Stopped),
        };

        match command {
            Command::Send(message) => {
                self.enqueue(message);
                None
            }
            Command::Connect => {
                self.wanted = true;
                self.restart(at)
            }
            Command::Disconnect => {
                self.wanted = false;
                if at != Offline::Idle {
                    info!("Pending connection abandoned");
                }
                self.set_status(ConnectionStatus::Disconnected);
                Some(Phase::Idle)
            }
            Command::SetVisibility(visibility) => {
                debug!(?visibility, "Visibility changed");
                self.visibility = visibility;
                if visibility == Visibility::Visible && self.wanted {
                    self.restart(at)
                } else {
                    None
                }
            }
        }
    }

    /// Connect now. From `Idle` this starts a fresh attempt budget.
    fn restart(&mut self, at: Offline) -> Option<Phase> {
        match at {
            Offline::Idle => {
                self.attempts = 0;
                Some(Phase::Connecting)
            }
            Offline::Backoff => Some(Phase::Connecting),
            Offline::Connecting => None,
        }
    }

    fn on_text(&mut self, text: &str) {
        let message = match WireMessage::parse(text) {
            Ok(message) => message,
            Err(error) => {
                warn!(error = %error, "Dropping malformed frame");
                return;
            }
        };

        match message.kind {
            MessageKind::Pong => {
                *self.shared.last_pong.lock() = Some(self.clock.now());
                trace!("Heartbeat pong received");
            }
            MessageKind::Welcome | MessageKind::Connected => {
                debug!(kind = %message.kind, "Server greeting received");
            }
            _ => trace!(kind = %message.kind, "Frame received"),
        }

        self.shared.listeners.dispatch(&message);
        self.emit(ClientEvent::Message(message));
    }

    fn on_closed(&mut self, code: Option<u16>, reason: String) -> Phase {
        info!(?code, reason = %reason, "Connection closed by peer");
        self.set_status(ConnectionStatus::Disconnected);
        self.emit(ClientEvent::Disconnected { code, reason });

        if code == Some(NORMAL_CLOSURE) {
            Phase::Idle
        } else {
            self.schedule_reconnect()
        }
    }

    fn on_failure(&mut self, error: TransportError) -> Phase {
        warn!(error = %error, "Transport error");
        self.set_status(ConnectionStatus::Error);
        self.emit(ClientEvent::Error(error));
        self.schedule_reconnect()
    }

    fn schedule_reconnect(&mut self) -> Phase {
        let attempt = self.attempts.saturating_add(1);
        if !self.backoff.allows(attempt) {
            warn!(attempts = self.attempts, "Reconnect attempts exhausted; giving up");
            self.emit(ClientEvent::GaveUp {
                attempts: self.attempts,
            });
            return Phase::Idle;
        }

        self.attempts = attempt;
        let delay = self.backoff.delay_for(attempt);
        info!(attempt, delay_ms = delay.as_millis() as u64, "Scheduling reconnect");
        self.publish_info();
        self.emit(ClientEvent::Reconnecting { attempt, delay });
        Phase::Backoff(Instant::now() + delay)
    }

    /// Send queued frames oldest first. A frame that fails is not re-queued.
    async fn flush(&mut self, session: &mut dyn TransportSession) -> Result<(), TransportError> {
        let pending = self.queue.len();
        while let Some(message) = self.queue.pop() {
            self.publish_info();
            self.write(session, &message).await?;
        }
        if pending > 0 {
            debug!(flushed = pending, "Outbound queue flushed");
        }
        Ok(())
    }

    async fn write(
        &self,
        session: &mut dyn TransportSession,
        message: &WireMessage,
    ) -> Result<(), TransportError> {
        match message.to_json() {
            Ok(text) => session.send(text).await,
            Err(error) => {
                warn!(kind = %message.kind, error = %error, "Dropping unencodable frame");
                Ok(())
            }
        }
    }

    fn enqueue(&mut self, message: WireMessage) {
        if let Some(dropped) = self.queue.push(message) {
            debug!(
                kind = %dropped.kind,
                queued = self.queue.len(),
                "Outbound queue full; dropped oldest"
            );
        }
        self.publish_info();
    }

    fn set_status(&mut self, status: ConnectionStatus) {
        if self.status != status {
            info!(from = %self.status, to = %status, "Connection status changed");
            self.status = status;
        }
        self.publish_info();
    }

    fn publish_info(&self) {
        *self.shared.info.write() = ConnectionInfo {
            is_connected: self.status.is_connected(),
            status: self.status,
            reconnect_attempts: self.attempts,
            queued_messages: self.queue.len(),
            dropped_messages: self.queue.dropped(),
        };
    }

    fn emit(&self, event: ClientEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

async fn next_beat(heartbeat: &mut Option<Interval>) {
    match heartbeat {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn close(session: &mut dyn TransportSession, reason: &str) {
    if let Err(error) = session.close(NORMAL_CLOSURE, reason).await {
        debug!(error = %error, "Close handshake failed");
    }
}
