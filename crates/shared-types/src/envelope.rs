//! # Wire Envelope
//!
//! Every transport frame is a JSON object:
//!
//! ```json
//! { "type": "update", "data": { ... }, "timestamp": 1700000000000 }
//! ```
//!
//! `type` is parsed into [`MessageKind`]. Kinds the client layer reacts to
//! have their own variant; everything else lands in [`MessageKind::Other`]
//! and is routed to listeners by its literal string.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::Flow;
use crate::errors::DecodeError;
use crate::time::Timestamp;

/// Message type carried in the `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageKind {
    Welcome,
    Ping,
    Pong,
    Update,
    Connected,
    Log,
    Stats,
    Snapshot,
    /// Any type string not listed above.
    Other(String),
}

impl MessageKind {
    pub fn as_str(&self) -> &str {
        match self {
            MessageKind::Welcome => "welcome",
            MessageKind::Ping => "ping",
            MessageKind::Pong => "pong",
            MessageKind::Update => "update",
            MessageKind::Connected => "connected",
            MessageKind::Log => "log",
            MessageKind::Stats => "stats",
            MessageKind::Snapshot => "snapshot",
            MessageKind::Other(s) => s,
        }
    }
}

impl From<String> for MessageKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "welcome" => MessageKind::Welcome,
            "ping" => MessageKind::Ping,
            "pong" => MessageKind::Pong,
            "update" => MessageKind::Update,
            "connected" => MessageKind::Connected,
            "log" => MessageKind::Log,
            "stats" => MessageKind::Stats,
            "snapshot" => MessageKind::Snapshot,
            _ => MessageKind::Other(s),
        }
    }
}

impl From<&str> for MessageKind {
    fn from(s: &str) -> Self {
        MessageKind::from(s.to_string())
    }
}

impl From<MessageKind> for String {
    fn from(kind: MessageKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// A single transport frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default = "empty_object")]
    pub data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
}

impl WireMessage {
    pub fn new(kind: impl Into<MessageKind>, data: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            data,
            timestamp: None,
        }
    }

    /// Build a frame from any serializable payload.
    pub fn from_payload<T: Serialize>(
        kind: impl Into<MessageKind>,
        payload: &T,
    ) -> Result<Self, DecodeError> {
        Ok(Self::new(kind, serde_json::to_value(payload)?))
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn ping(now: Timestamp) -> Self {
        Self::new(MessageKind::Ping, empty_object()).with_timestamp(now)
    }

    pub fn pong(now: Timestamp) -> Self {
        Self::new(MessageKind::Pong, empty_object()).with_timestamp(now)
    }

    /// Parse a text frame. The top level must be an object with a string
    /// `type`; `data` defaults to `{}` when absent.
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(DecodeError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<String, DecodeError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode `data` into a typed payload.
    pub fn payload<T: serde::de::DeserializeOwned>(&self) -> Result<T, DecodeError> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

// =============================================================================
// ATTACK PAYLOAD
// =============================================================================

/// A named point in an attack payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }
}

/// Attack type as rendered in the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackType {
    pub name: String,
    pub color: String,
}

/// The payload pushed to remote subscribers for one synthesized attack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackEvent {
    pub id: String,
    pub source: GeoPoint,
    pub destination: GeoPoint,
    #[serde(rename = "type")]
    pub attack_type: AttackType,
    pub timestamp: DateTime<Utc>,
}

impl AttackEvent {
    /// Render a stored flow as an attack payload.
    pub fn from_flow(flow: &Flow) -> Self {
        Self {
            id: flow.id.clone(),
            source: GeoPoint::new(flow.src.name.clone(), flow.src.lat, flow.src.lon),
            destination: GeoPoint::new(flow.dst.name.clone(), flow.dst.lat, flow.dst.lon),
            attack_type: AttackType {
                name: flow.category.label.clone(),
                color: flow.category.color_token.clone(),
            },
            timestamp: millis_to_datetime(flow.created_at),
        }
    }
}

/// Convert epoch milliseconds into a UTC datetime, clamping values chrono
/// cannot represent to the epoch.
pub fn millis_to_datetime(ms: Timestamp) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
        .unwrap_or_default()
}
