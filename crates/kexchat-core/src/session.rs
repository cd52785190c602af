//! Key-exchange session state machine
//!
//! Tracks one user's key material through the in-band handshake. The key
//! mathematics live on the relay side; this machine only sequences the
//! opaque strings it is handed.
//!
//! Security note: a `Shared Secret` event is trusted unconditionally.
//! Nothing proves it resulted from a handshake involving the peer key we
//! submitted. That gap exists in the deployed relay protocol and is kept
//! here rather than silently changed.

use core::fmt;

use crate::errors::{Result, ValidationError};
use crate::protocol::{ChatEvent, KeyEvent, KeySignal};
use crate::types::Username;

// ----------------------------------------------------------------------------
// Phase
// ----------------------------------------------------------------------------

/// Where the session stands in the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Connected, no local key issued yet.
    Idle,
    /// Local public key known, no exchange in flight.
    KeyReady,
    /// A peer key was submitted; waiting for the relay's answer.
    Negotiating,
    /// Shared secret present.
    Established,
}

impl SessionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::KeyReady => "key-ready",
            SessionPhase::Negotiating => "negotiating",
            SessionPhase::Established => "established",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ----------------------------------------------------------------------------
// Session updates
// ----------------------------------------------------------------------------

/// State change produced by an inbound key event, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// The relay issued (or refreshed) our public key.
    LocalKeyReady { public_key: String },
    /// A shared secret arrived; the exchange is complete.
    SecretEstablished { secret: String },
    /// The relay rejected our exchange request.
    ExchangeRejected { reason: String },
}

// ----------------------------------------------------------------------------
// Session
// ----------------------------------------------------------------------------

/// One user's key material and handshake state.
#[derive(Debug)]
pub struct KeySession {
    username: Username,
    local_public_key: Option<String>,
    peer_public_key: Option<String>,
    shared_secret: Option<String>,
    phase: SessionPhase,
}

impl KeySession {
    pub fn new(username: Username) -> Self {
        Self {
            username,
            local_public_key: None,
            peer_public_key: None,
            shared_secret: None,
            phase: SessionPhase::Idle,
        }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn local_public_key(&self) -> Option<&str> {
        self.local_public_key.as_deref()
    }

    pub fn peer_public_key(&self) -> Option<&str> {
        self.peer_public_key.as_deref()
    }

    pub fn shared_secret(&self) -> Option<&str> {
        self.shared_secret.as_deref()
    }

    /// Validate a peer key and produce the exchange request to transmit.
    ///
    /// This is a request, not a completion: the phase moves to `Negotiating`
    /// (from `Established` too, which rotates the exchange) and stays there
    /// until the relay answers. An existing secret is kept until its
    /// replacement arrives. Empty or whitespace-only input is rejected
    /// before any frame is built.
    pub fn begin_exchange(&mut self, raw_peer_key: &str) -> Result<ChatEvent> {
        let peer_key = raw_peer_key.trim();
        if peer_key.is_empty() {
            return Err(ValidationError::EmptyPeerKey.into());
        }
        self.peer_public_key = Some(peer_key.to_string());
        self.phase = SessionPhase::Negotiating;
        Ok(ChatEvent::key_exchange(&self.username, peer_key))
    }

    /// Apply an inbound event from the private key queue.
    ///
    /// Returns `Ok(None)` for recognized-but-irrelevant events (unknown
    /// labels). Unlabeled content is a protocol error the caller logs and
    /// drops; the session is untouched either way.
    pub fn observe_key_event(&mut self, event: &KeyEvent) -> Result<Option<SessionUpdate>> {
        let Some(signal) = event.signal()? else {
            tracing::debug!(content = %event.content, "ignoring key event with unknown label");
            return Ok(None);
        };

        let update = match signal {
            KeySignal::PublicKey(key) => {
                if self.phase == SessionPhase::Idle {
                    self.phase = SessionPhase::KeyReady;
                }
                self.local_public_key = Some(key.clone());
                SessionUpdate::LocalKeyReady { public_key: key }
            }
            KeySignal::SharedSecret(secret) => {
                // Repeats of the same secret are idempotent.
                self.shared_secret = Some(secret.clone());
                self.phase = SessionPhase::Established;
                SessionUpdate::SecretEstablished { secret }
            }
            KeySignal::Rejected(reason) => SessionUpdate::ExchangeRejected { reason },
        };
        Ok(Some(update))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::EventKind;

    fn session() -> KeySession {
        KeySession::new(Username::parse("alice").unwrap())
    }

    #[test]
    fn starts_idle_with_no_keys() {
        let session = session();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.local_public_key().is_none());
        assert!(session.peer_public_key().is_none());
        assert!(session.shared_secret().is_none());
    }

    #[test]
    fn public_key_event_moves_idle_to_key_ready() {
        let mut session = session();
        let update = session
            .observe_key_event(&KeyEvent::new("Public Key: abc123"))
            .unwrap();
        assert_eq!(
            update,
            Some(SessionUpdate::LocalKeyReady { public_key: "abc123".to_string() })
        );
        assert_eq!(session.phase(), SessionPhase::KeyReady);
        assert_eq!(session.local_public_key(), Some("abc123"));
    }

    #[test]
    fn repeated_public_key_refreshes_without_phase_regression() {
        let mut session = session();
        session.observe_key_event(&KeyEvent::new("Public Key: old")).unwrap();
        session.begin_exchange("peer-key").unwrap();
        session.observe_key_event(&KeyEvent::new("Public Key: new")).unwrap();
        assert_eq!(session.local_public_key(), Some("new"));
        assert_eq!(session.phase(), SessionPhase::Negotiating);
    }

    #[test]
    fn begin_exchange_builds_labeled_request() {
        let mut session = session();
        session.observe_key_event(&KeyEvent::new("Public Key: abc123")).unwrap();
        let event = session.begin_exchange("  peer-key  ").unwrap();
        assert_eq!(event.kind, EventKind::KeyExchange);
        assert_eq!(event.content, "Public Key: peer-key");
        assert_eq!(session.peer_public_key(), Some("peer-key"));
        assert_eq!(session.phase(), SessionPhase::Negotiating);
    }

    #[test]
    fn begin_exchange_rejects_empty_input() {
        let mut session = session();
        for raw in ["", "   ", "\t"] {
            let err = session.begin_exchange(raw).unwrap_err();
            assert!(matches!(
                err,
                crate::ChatError::Validation(ValidationError::EmptyPeerKey)
            ));
        }
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.peer_public_key().is_none());
    }

    #[test]
    fn shared_secret_establishes_the_session() {
        let mut session = session();
        session.observe_key_event(&KeyEvent::new("Public Key: abc123")).unwrap();
        session.begin_exchange("peer-key").unwrap();
        let update = session
            .observe_key_event(&KeyEvent::new("Shared Secret: S3CR3T"))
            .unwrap();
        assert_eq!(
            update,
            Some(SessionUpdate::SecretEstablished { secret: "S3CR3T".to_string() })
        );
        assert_eq!(session.phase(), SessionPhase::Established);
        assert_eq!(session.shared_secret(), Some("S3CR3T"));
    }

    #[test]
    fn duplicate_shared_secret_is_idempotent() {
        let mut session = session();
        session.observe_key_event(&KeyEvent::new("Shared Secret: X")).unwrap();
        session.observe_key_event(&KeyEvent::new("Shared Secret: X")).unwrap();
        assert_eq!(session.phase(), SessionPhase::Established);
        assert_eq!(session.shared_secret(), Some("X"));
    }

    #[test]
    fn rotation_keeps_old_secret_until_replacement() {
        let mut session = session();
        session.observe_key_event(&KeyEvent::new("Public Key: k")).unwrap();
        session.begin_exchange("peer-one").unwrap();
        session.observe_key_event(&KeyEvent::new("Shared Secret: first")).unwrap();

        session.begin_exchange("peer-two").unwrap();
        assert_eq!(session.phase(), SessionPhase::Negotiating);
        assert_eq!(session.shared_secret(), Some("first"));

        session.observe_key_event(&KeyEvent::new("Shared Secret: second")).unwrap();
        assert_eq!(session.phase(), SessionPhase::Established);
        assert_eq!(session.shared_secret(), Some("second"));
    }

    #[test]
    fn rejection_leaves_the_phase_alone() {
        let mut session = session();
        session.observe_key_event(&KeyEvent::new("Public Key: k")).unwrap();
        session.begin_exchange("bad-key").unwrap();
        let update = session
            .observe_key_event(&KeyEvent::new("Error: invalid public key"))
            .unwrap();
        assert_eq!(
            update,
            Some(SessionUpdate::ExchangeRejected { reason: "invalid public key".to_string() })
        );
        assert_eq!(session.phase(), SessionPhase::Negotiating);
        assert!(session.shared_secret().is_none());
    }

    #[test]
    fn unknown_label_changes_nothing() {
        let mut session = session();
        let update = session
            .observe_key_event(&KeyEvent::new("Fingerprint: 00ff"))
            .unwrap();
        assert!(update.is_none());
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn unlabeled_content_errors_without_state_change() {
        let mut session = session();
        assert!(session.observe_key_event(&KeyEvent::new("garbage")).is_err());
        assert_eq!(session.phase(), SessionPhase::Idle);
    }
}
