//! Error types for the KexChat client
//!
//! The three failure families are deliberately separate because they surface
//! differently: transport failures become connection status changes,
//! protocol parse failures are logged and the offending frame dropped, and
//! validation failures are returned synchronously to the caller before any
//! network traffic. None of them terminates a session on its own.

use thiserror::Error;

// ----------------------------------------------------------------------------
// Sub-error enums
// ----------------------------------------------------------------------------

/// Failures of the relay connection itself.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("not connected to relay")]
    NotConnected,

    #[error("failed to connect to relay: {reason}")]
    ConnectFailed { reason: String },

    #[error("failed to send frame to relay: {reason}")]
    SendFailed { reason: String },

    #[error("relay connection closed: {reason}")]
    ConnectionClosed { reason: String },
}

/// An inbound frame that could not be understood.
///
/// The frame is dropped and the stream continues.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(#[from] serde_json::Error),

    #[error("malformed payload for {destination}: {reason}")]
    MalformedPayload { destination: String, reason: String },

    #[error("key event content carries no label: {content:?}")]
    MalformedKeyEvent { content: String },
}

/// User input rejected before any network call.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("username must not be empty")]
    EmptyUsername,

    #[error("message must not be empty")]
    EmptyMessage,

    #[error("peer public key must not be empty")]
    EmptyPeerKey,
}

// ----------------------------------------------------------------------------
// Unified error type
// ----------------------------------------------------------------------------

/// Umbrella error type for the KexChat client.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Internal channel failure, seen only on shutdown paths.
    #[error("channel error: {message}")]
    Channel { message: String },
}

impl ChatError {
    pub fn not_connected() -> Self {
        TransportError::NotConnected.into()
    }

    pub fn connect_failed<R: Into<String>>(reason: R) -> Self {
        TransportError::ConnectFailed { reason: reason.into() }.into()
    }

    pub fn send_failed<R: Into<String>>(reason: R) -> Self {
        TransportError::SendFailed { reason: reason.into() }.into()
    }

    pub fn connection_closed<R: Into<String>>(reason: R) -> Self {
        TransportError::ConnectionClosed { reason: reason.into() }.into()
    }

    pub fn malformed_payload<D: Into<String>, R: Into<String>>(destination: D, reason: R) -> Self {
        ProtocolError::MalformedPayload {
            destination: destination.into(),
            reason: reason.into(),
        }
        .into()
    }

    pub fn channel_error<M: Into<String>>(message: M) -> Self {
        ChatError::Channel { message: message.into() }
    }

    /// True for errors the dispatch loop contains by dropping the frame.
    pub fn is_protocol(&self) -> bool {
        matches!(self, ChatError::Protocol(_))
    }
}

/// Result type alias used throughout the client.
pub type Result<T> = core::result::Result<T, ChatError>;

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
