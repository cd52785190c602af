//! Chat events carried over the broadcast topic.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::protocol::key_event::LABEL_PUBLIC_KEY;
use crate::types::{Timestamp, Username};

// ----------------------------------------------------------------------------
// Event kind
// ----------------------------------------------------------------------------

/// Kind tag on a [`ChatEvent`], SCREAMING_CASE on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Join,
    Chat,
    Leave,
    KeyExchange,
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            EventKind::Join => "JOIN",
            EventKind::Chat => "CHAT",
            EventKind::Leave => "LEAVE",
            EventKind::KeyExchange => "KEY_EXCHANGE",
        };
        write!(f, "{name}")
    }
}

// ----------------------------------------------------------------------------
// Chat event
// ----------------------------------------------------------------------------

/// One event on the shared broadcast topic.
///
/// Outbound events carry a client-generated id and timestamp; the relay may
/// omit either on fan-out (it stamps no timestamp on plain chat echoes), so
/// both are optional on the inbound side. The router stamps arrival time on
/// timestamp-less events before they reach the conversation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    pub sender: String,

    /// Empty on join and leave announcements.
    #[serde(default)]
    pub content: String,

    #[serde(rename = "type")]
    pub kind: EventKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
}

impl ChatEvent {
    /// Join announcement, sent once immediately after connect.
    pub fn join(sender: &Username) -> Self {
        Self {
            id: Some(Uuid::new_v4()),
            sender: sender.as_str().to_string(),
            content: String::new(),
            kind: EventKind::Join,
            timestamp: Some(Timestamp::now()),
        }
    }

    /// Broadcast chat message. The caller validates the content first.
    pub fn chat(sender: &Username, content: impl Into<String>) -> Self {
        Self {
            id: Some(Uuid::new_v4()),
            sender: sender.as_str().to_string(),
            content: content.into(),
            kind: EventKind::Chat,
            timestamp: Some(Timestamp::now()),
        }
    }

    /// Key-exchange request carrying a `Public Key: <value>` content string.
    pub fn key_exchange(sender: &Username, peer_key: &str) -> Self {
        Self {
            id: Some(Uuid::new_v4()),
            sender: sender.as_str().to_string(),
            content: format!("{LABEL_PUBLIC_KEY}: {peer_key}"),
            kind: EventKind::KeyExchange,
            timestamp: Some(Timestamp::now()),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Username {
        Username::parse("alice").unwrap()
    }

    #[test]
    fn kind_serializes_screaming_case() {
        assert_eq!(serde_json::to_string(&EventKind::KeyExchange).unwrap(), "\"KEY_EXCHANGE\"");
        assert_eq!(serde_json::to_string(&EventKind::Join).unwrap(), "\"JOIN\"");
    }

    #[test]
    fn inbound_event_tolerates_missing_optional_fields() {
        let event: ChatEvent =
            serde_json::from_str(r#"{"sender": "bob", "type": "JOIN"}"#).unwrap();
        assert_eq!(event.sender, "bob");
        assert_eq!(event.kind, EventKind::Join);
        assert_eq!(event.content, "");
        assert!(event.id.is_none());
        assert!(event.timestamp.is_none());
    }

    #[test]
    fn inbound_event_tolerates_explicit_nulls() {
        let raw = r#"{"id": null, "sender": "bob", "content": "hi", "type": "CHAT", "timestamp": null}"#;
        let event: ChatEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(event.content, "hi");
        assert!(event.id.is_none());
        assert!(event.timestamp.is_none());
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let result =
            serde_json::from_str::<ChatEvent>(r#"{"sender": "bob", "type": "TYPING"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn chat_builder_stamps_id_and_timestamp() {
        let event = ChatEvent::chat(&alice(), "hello");
        assert_eq!(event.kind, EventKind::Chat);
        assert_eq!(event.sender, "alice");
        assert!(event.id.is_some());
        assert!(event.timestamp.is_some());
    }

    #[test]
    fn key_exchange_builder_labels_the_content() {
        let event = ChatEvent::key_exchange(&alice(), "abc123");
        assert_eq!(event.kind, EventKind::KeyExchange);
        assert_eq!(event.content, "Public Key: abc123");
    }

    #[test]
    fn join_wire_shape_uses_type_field() {
        let json = serde_json::to_value(ChatEvent::join(&alice())).unwrap();
        assert_eq!(json["sender"], "alice");
        assert_eq!(json["type"], "JOIN");
    }
}
