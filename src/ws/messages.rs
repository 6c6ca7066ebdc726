//! WebSocket message types: envelope and commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    #[serde(default)]
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Builds a server message stamped now.
    #[must_use]
    pub fn new(id: String, msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id,
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Builds an error message with a numeric code.
    #[must_use]
    pub fn error(id: String, code: u32, message: &str) -> Self {
        Self::new(
            id,
            WsMessageType::Error,
            serde_json::json!({ "code": code, "message": message }),
        )
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client broadcast event.
    Event,
    /// Server → Client error.
    Error,
}

/// Commands carried in the payload of a `command` message.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Subscribe to events for specific schedules.
    Subscribe {
        /// Schedule IDs to subscribe to. Use `["*"]` for every schedule
        /// and for membership events.
        schedule_ids: Vec<String>,
    },
    /// Unsubscribe from events for specific schedules.
    Unsubscribe {
        /// Schedule IDs to unsubscribe from.
        schedule_ids: Vec<String>,
    },
    /// Fetch the current occupancy of one schedule.
    GetSchedule {
        /// Target schedule ID.
        schedule_id: String,
    },
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parses_subscribe_command() {
        let json = serde_json::json!({
            "command": "subscribe",
            "schedule_ids": ["*"]
        });
        let Ok(WsCommand::Subscribe { schedule_ids }) = serde_json::from_value(json) else {
            panic!("expected subscribe");
        };
        assert_eq!(schedule_ids, vec!["*".to_string()]);
    }

    #[test]
    fn envelope_defaults_id_and_timestamp() {
        let text = r#"{"type":"command","payload":{"command":"get_schedule","schedule_id":"x"}}"#;
        let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
            panic!("envelope should parse");
        };
        assert!(msg.id.is_empty());
        assert_eq!(msg.msg_type, WsMessageType::Command);
    }
}
