//! Handling of client-to-server frames.

use shared_types::{MessageKind, Timestamp, WireMessage};
use threat_telemetry::MALFORMED_FRAMES;
use tracing::{debug, warn};

use super::session::SessionId;

/// Decide the reply, if any, to one inbound text frame.
///
/// Never fails: malformed and oversized frames are logged, counted and
/// dropped.
pub fn handle_inbound(
    connection_id: SessionId,
    text: &str,
    max_message_size: usize,
    now: Timestamp,
) -> Option<WireMessage> {
    if text.len() > max_message_size {
        MALFORMED_FRAMES.inc();
        warn!(
            connection_id = %connection_id,
            size = text.len(),
            max = max_message_size,
            "Message exceeds size limit"
        );
        return None;
    }

    match WireMessage::parse(text) {
        Ok(message) if message.kind == MessageKind::Ping => Some(WireMessage::pong(now)),
        Ok(message) => {
            debug!(connection_id = %connection_id, kind = %message.kind, "Ignoring client frame");
            None
        }
        Err(error) => {
            MALFORMED_FRAMES.inc();
            warn!(connection_id = %connection_id, error = %error, "Dropping malformed frame");
            None
        }
    }
}
