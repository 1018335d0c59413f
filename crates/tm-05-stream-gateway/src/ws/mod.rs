//! WebSocket sessions.

pub mod live;
pub mod stream;

use axum::extract::ws::{Message, WebSocket};
use serde::Serialize;
use shared_types::{MessageKind, Timestamp, WireMessage};
use threat_telemetry::{FRAMES_SENT, MALFORMED_FRAMES};
use tracing::{debug, warn};

use crate::domain::inbound::handle_inbound;
use crate::domain::session::SessionId;

/// What the session loop should do after one `recv()`.
pub(crate) enum Incoming {
    Continue,
    Reply(WireMessage),
    Close,
}

pub(crate) fn classify(
    connection_id: SessionId,
    incoming: Option<Result<Message, axum::Error>>,
    max_message_size: usize,
    now: Timestamp,
) -> Incoming {
    let reply = |text: &str| {
        handle_inbound(connection_id, text, max_message_size, now)
            .map_or(Incoming::Continue, Incoming::Reply)
    };

    match incoming {
        Some(Ok(Message::Text(text))) => reply(&text),
        Some(Ok(Message::Binary(data))) => match std::str::from_utf8(&data) {
            Ok(text) => reply(text),
            Err(_) => {
                MALFORMED_FRAMES.inc();
                warn!(connection_id = %connection_id, "Dropping non-UTF-8 binary frame");
                Incoming::Continue
            }
        },
        Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => Incoming::Continue,
        Some(Ok(Message::Close(frame))) => {
            debug!(connection_id = %connection_id, ?frame, "Client sent close");
            Incoming::Close
        }
        Some(Err(error)) => {
            warn!(connection_id = %connection_id, error = %error, "WebSocket error");
            Incoming::Close
        }
        None => Incoming::Close,
    }
}

/// Write one frame. Returns `false` once the socket is unusable.
pub(crate) async fn send_frame(
    socket: &mut WebSocket,
    connection_id: SessionId,
    frame: &WireMessage,
) -> bool {
    let text = match frame.to_json() {
        Ok(text) => text,
        Err(error) => {
            warn!(connection_id = %connection_id, kind = %frame.kind, error = %error, "Failed to encode frame");
            return true;
        }
    };

    match socket.send(Message::Text(text)).await {
        Ok(()) => {
            FRAMES_SENT.inc();
            true
        }
        Err(error) => {
            debug!(connection_id = %connection_id, error = %error, "Send failed; closing session");
            false
        }
    }
}

/// Wrap `payload` in an envelope and write it.
pub(crate) async fn send_payload<T: Serialize>(
    socket: &mut WebSocket,
    connection_id: SessionId,
    kind: MessageKind,
    payload: &T,
    now: Timestamp,
) -> bool {
    match WireMessage::from_payload(kind, payload) {
        Ok(frame) => send_frame(socket, connection_id, &frame.with_timestamp(now)).await,
        Err(error) => {
            warn!(connection_id = %connection_id, error = %error, "Failed to encode payload");
            true
        }
    }
}
