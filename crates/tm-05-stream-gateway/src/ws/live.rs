//! `/ws/live`: frames from the shared dispatcher.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use shared_types::{AttackEvent, DecodeError, MessageKind, Timestamp, WireMessage};
use std::sync::Arc;
use tm_04_local_dispatch::{DispatchEvent, ListenerResult};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use super::{classify, send_frame, Incoming};
use crate::domain::session::SessionKind;
use crate::service::AppState;

pub async fn live_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| run_live_session(socket, state))
}

/// Render a dispatcher event as a wire frame.
pub fn live_frame(event: &DispatchEvent, now: Timestamp) -> Result<WireMessage, DecodeError> {
    let frame = match event {
        DispatchEvent::Snapshot(snapshot) => {
            WireMessage::from_payload(MessageKind::Snapshot, snapshot)?
        }
        DispatchEvent::Tick { flow, .. } => {
            WireMessage::from_payload(MessageKind::Update, &AttackEvent::from_flow(flow))?
        }
    };
    Ok(frame.with_timestamp(now))
}

/// Forward dispatcher output to one socket through a bounded channel.
///
/// The channel is a single-receiver `broadcast`, so a slow peer loses the
/// oldest frames instead of stalling the dispatcher.
pub async fn run_live_session(mut socket: WebSocket, state: AppState) {
    let guard = state.sessions.open(SessionKind::Live);
    let id = guard.id();

    let (tx, mut rx) = broadcast::channel::<WireMessage>(state.config.live_channel_capacity);
    let clock = Arc::clone(&state.clock);
    let subscription = state
        .dispatcher
        .subscribe(move |event: &DispatchEvent| -> ListenerResult {
            let frame = live_frame(event, clock.now())?;
            // Fails only after the session dropped its receiver.
            let _ = tx.send(frame);
            Ok(())
        });
    let subscription = match subscription {
        Ok(subscription) => subscription,
        Err(error) => {
            warn!(connection_id = %id, error = %error, "Live session could not subscribe");
            return;
        }
    };
    info!(connection_id = %id, listener_id = subscription.id(), "Live session opened");

    let mut shutdown = state.shutdown.subscribe();
    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Ok(frame) => {
                    if !send_frame(&mut socket, id, &frame).await {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!(connection_id = %id, skipped, "Live session lagging; oldest frames dropped");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => {
                match classify(id, incoming, state.config.max_message_size, state.clock.now()) {
                    Incoming::Continue => {}
                    Incoming::Reply(frame) => {
                        if !send_frame(&mut socket, id, &frame).await {
                            break;
                        }
                    }
                    Incoming::Close => break,
                }
            }
            _ = async { let _ = shutdown.wait_for(|stop| *stop).await; } => {
                let _ = socket.send(Message::Close(None)).await;
                break;
            }
        }
    }

    subscription.unsubscribe();
    info!(connection_id = %id, "Live session closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Category, Direction, Feature, Flow, Region, Severity};
    use std::net::Ipv4Addr;
    use tm_02_event_store::StoreSnapshot;

    fn feature(name: &str) -> Feature {
        Feature {
            id: format!("f-{name}"),
            synthetic_ip: Ipv4Addr::new(1, 2, 3, 4),
            region: Region::new(name, "", "", 1.0, 2.0),
            severity: Severity::High,
            category: Category::new("XSS", "#ec4899"),
            timestamp: 0,
            direction: Direction::Source,
        }
    }

    #[test]
    fn test_tick_becomes_update_with_attack_payload() {
        let flow = Flow::new("flow-1", &feature("A"), &feature("B"), 1_000, 8_000);
        let event = DispatchEvent::Tick {
            flow,
            features: vec![],
        };

        let frame = live_frame(&event, 5).unwrap();
        assert_eq!(frame.kind, MessageKind::Update);
        assert_eq!(frame.timestamp, Some(5));
        let attack: AttackEvent = frame.payload().unwrap();
        assert_eq!(attack.id, "flow-1");
        assert_eq!(attack.source.name, "A");
        assert_eq!(attack.attack_type.name, "XSS");
    }

    #[test]
    fn test_snapshot_frame() {
        let frame = live_frame(&DispatchEvent::Snapshot(StoreSnapshot::default()), 0).unwrap();
        assert_eq!(frame.kind, MessageKind::Snapshot);
        assert_eq!(frame.data["features"], serde_json::json!([]));
    }
}
