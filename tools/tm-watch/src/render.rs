//! Line rendering for frames and lifecycle events.

use shared_types::{AttackEvent, MessageKind, WireMessage};
use tm_06_resilient_client::ClientEvent;

/// One output line per frame; `None` for frames not worth printing.
pub fn render_message(message: &WireMessage, raw: bool) -> Option<String> {
    if raw {
        return message.to_json().ok();
    }

    match &message.kind {
        MessageKind::Pong => None,
        MessageKind::Welcome | MessageKind::Update => {
            let attack: AttackEvent = message.payload().ok()?;
            Some(render_attack(&attack))
        }
        MessageKind::Snapshot => {
            let count = |key: &str| message.data[key].as_array().map_or(0, Vec::len);
            Some(format!(
                "snapshot: {} features, {} flows",
                count("features"),
                count("flows")
            ))
        }
        kind => Some(format!("{kind}: {}", message.data)),
    }
}

fn render_attack(attack: &AttackEvent) -> String {
    format!(
        "[{}] {:<14} {} → {}",
        attack.timestamp.format("%H:%M:%S"),
        attack.attack_type.name,
        attack.source.name,
        attack.destination.name
    )
}

/// Status line for lifecycle events, printed to stderr.
pub fn render_lifecycle(event: &ClientEvent) -> Option<String> {
    let line = match event {
        ClientEvent::Connected => "connected".to_string(),
        ClientEvent::Disconnected { code, reason } => match code {
            Some(code) => format!("disconnected ({code}) {reason}"),
            None => "disconnected".to_string(),
        },
        ClientEvent::Error(error) => format!("error: {error}"),
        ClientEvent::Reconnecting { attempt, delay } => {
            format!("reconnecting in {} ms (attempt {attempt})", delay.as_millis())
        }
        ClientEvent::GaveUp { attempts } => format!("gave up after {attempts} attempts"),
        ClientEvent::Message(_) => return None,
    };
    Some(line)
}
