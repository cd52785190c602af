//! Message types flowing between the tasks of a client session.
//!
//! Three channels, three sum types: `Command` (presentation → dispatch
//! loop), `LinkEvent` (relay link → dispatch loop) and `AppEvent` (dispatch
//! loop → presentation). The dispatch loop is the only task that touches
//! session state, so everything it learns or decides travels as one of
//! these values.

use core::fmt;

use kexchat_core::ChatEvent;

// ----------------------------------------------------------------------------
// Commands (presentation → dispatch loop)
// ----------------------------------------------------------------------------

/// A user intent, validated by the handle before it is enqueued.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Broadcast a chat message to the shared topic.
    SendMessage { content: String },
    /// Submit a peer's public key to start (or rotate) an exchange.
    ExchangeKey { peer_key: String },
    /// Tear the session down. The only way a session ends on purpose.
    Disconnect,
}

// ----------------------------------------------------------------------------
// Link events (relay link → dispatch loop)
// ----------------------------------------------------------------------------

/// Everything the relay link can tell the dispatch loop.
///
/// Delivered in transport order; `Disconnected` is emitted exactly once per
/// connection, whatever the cause.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    Connected,
    Disconnected { reason: String },
    /// One raw text frame, not yet parsed.
    Inbound { text: String },
}

// ----------------------------------------------------------------------------
// App events (dispatch loop → presentation)
// ----------------------------------------------------------------------------

/// Connection status as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connected => write!(f, "connected"),
            ConnectionStatus::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// State changes the presentation layer renders.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    ConnectionChanged { status: ConnectionStatus },
    /// A chat event was appended to the conversation log.
    ChatAppended { event: ChatEvent },
    /// The relay issued (or refreshed) our public key.
    LocalKeyAvailable { public_key: String },
    /// A key exchange completed.
    SecretEstablished { secret: String },
    /// The relay rejected our exchange request.
    ExchangeRejected { reason: String },
}
