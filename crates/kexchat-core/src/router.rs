//! Inbound frame routing.
//!
//! One socket carries both broadcast chat traffic and the private key queue;
//! the router tells them apart by destination and dispatches to the
//! conversation log or the key-exchange session. Unknown destinations are
//! dropped without error so the relay can grow new traffic without breaking
//! deployed clients.

use tracing::trace;

use crate::errors::Result;
use crate::log::ConversationLog;
use crate::protocol::{destinations, ChatEvent, Envelope, KeyEvent};
use crate::session::{KeySession, SessionUpdate};
use crate::types::Timestamp;

/// What routing one envelope did.
#[derive(Debug, Clone, PartialEq)]
pub enum Routed {
    /// Appended to the conversation log.
    Chat(ChatEvent),
    /// Advanced the key-exchange session.
    Session(SessionUpdate),
    /// Nothing to do: unknown destination or irrelevant key event.
    Ignored,
}

#[derive(Debug, Default)]
pub struct MessageRouter;

impl MessageRouter {
    pub fn new() -> Self {
        Self
    }

    /// Classify an envelope and apply it to the session state.
    ///
    /// Malformed payloads return a protocol error and leave both the log and
    /// the session untouched; the caller logs the error and keeps consuming
    /// the stream.
    pub fn route(
        &self,
        envelope: &Envelope,
        session: &mut KeySession,
        log: &mut ConversationLog,
    ) -> Result<Routed> {
        match envelope.destination.as_str() {
            destinations::TOPIC_PUBLIC => {
                let mut event: ChatEvent = envelope.payload_as()?;
                // The relay omits timestamps on chat fan-out; stamp arrival
                // time so the log stays ordered by a single clock.
                if event.timestamp.is_none() {
                    event.timestamp = Some(Timestamp::now());
                }
                log.append(event.clone());
                Ok(Routed::Chat(event))
            }
            destinations::QUEUE_KEYS => {
                let key_event: KeyEvent = envelope.payload_as()?;
                match session.observe_key_event(&key_event)? {
                    Some(update) => Ok(Routed::Session(update)),
                    None => Ok(Routed::Ignored),
                }
            }
            other => {
                trace!(destination = other, "dropping frame for unknown destination");
                Ok(Routed::Ignored)
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::EventKind;
    use crate::session::SessionPhase;
    use crate::types::Username;

    fn fixtures() -> (MessageRouter, KeySession, ConversationLog) {
        (
            MessageRouter::new(),
            KeySession::new(Username::parse("alice").unwrap()),
            ConversationLog::new(),
        )
    }

    fn chat_envelope(sender: &str, content: &str) -> Envelope {
        Envelope::decode(&format!(
            r#"{{"destination": "/topic/public",
                 "payload": {{"sender": "{sender}", "content": "{content}", "type": "CHAT"}}}}"#
        ))
        .unwrap()
    }

    fn key_envelope(content: &str) -> Envelope {
        Envelope::decode(&format!(
            r#"{{"destination": "/user/queue/keys",
                 "payload": {{"sender": "System", "content": "{content}"}}}}"#
        ))
        .unwrap()
    }

    #[test]
    fn broadcast_frames_append_in_arrival_order() {
        let (router, mut session, mut log) = fixtures();
        router.route(&chat_envelope("bob", "one"), &mut session, &mut log).unwrap();
        router.route(&chat_envelope("carol", "two"), &mut session, &mut log).unwrap();

        let contents: Vec<&str> = log.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, ["one", "two"]);
    }

    #[test]
    fn missing_timestamp_is_stamped_at_arrival() {
        let (router, mut session, mut log) = fixtures();
        let routed = router
            .route(&chat_envelope("bob", "hi"), &mut session, &mut log)
            .unwrap();
        let Routed::Chat(event) = routed else { panic!("expected chat") };
        assert!(event.timestamp.is_some());
        assert_eq!(log.events()[0].timestamp, event.timestamp);
    }

    #[test]
    fn join_and_leave_frames_reach_the_log() {
        let (router, mut session, mut log) = fixtures();
        let envelope = Envelope::decode(
            r#"{"destination": "/topic/public", "payload": {"sender": "bob", "type": "LEAVE"}}"#,
        )
        .unwrap();
        router.route(&envelope, &mut session, &mut log).unwrap();
        assert_eq!(log.events()[0].kind, EventKind::Leave);
    }

    #[test]
    fn key_queue_frames_advance_the_session_not_the_log() {
        let (router, mut session, mut log) = fixtures();
        let routed = router
            .route(&key_envelope("Public Key: abc123"), &mut session, &mut log)
            .unwrap();
        assert_eq!(
            routed,
            Routed::Session(SessionUpdate::LocalKeyReady { public_key: "abc123".to_string() })
        );
        assert_eq!(session.phase(), SessionPhase::KeyReady);
        assert!(log.is_empty());
    }

    #[test]
    fn unknown_destination_changes_nothing() {
        let (router, mut session, mut log) = fixtures();
        let envelope = Envelope::decode(
            r#"{"destination": "/topic/presence", "payload": {"whatever": true}}"#,
        )
        .unwrap();
        let routed = router.route(&envelope, &mut session, &mut log).unwrap();
        assert_eq!(routed, Routed::Ignored);
        assert!(log.is_empty());
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn malformed_chat_payload_errors_and_leaves_log_alone() {
        let (router, mut session, mut log) = fixtures();
        let envelope = Envelope::decode(
            r#"{"destination": "/topic/public", "payload": {"content": "no sender"}}"#,
        )
        .unwrap();
        let err = router.route(&envelope, &mut session, &mut log).unwrap_err();
        assert!(err.is_protocol());
        assert!(log.is_empty());
    }

    #[test]
    fn duplicate_echo_appears_twice() {
        let (router, mut session, mut log) = fixtures();
        let envelope = chat_envelope("alice", "hello");
        router.route(&envelope, &mut session, &mut log).unwrap();
        router.route(&envelope, &mut session, &mut log).unwrap();
        assert_eq!(log.len(), 2);
    }
}
