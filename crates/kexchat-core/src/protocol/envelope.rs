//! The `{destination, payload}` JSON envelope wrapping every relay frame.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{ProtocolError, Result};

/// Logical destinations understood by the relay.
pub mod destinations {
    /// Outbound: announce the joining user. Sent once, before anything else.
    pub const ADD_USER: &str = "/app/chat.addUser";
    /// Outbound: broadcast a chat message.
    pub const SEND_MESSAGE: &str = "/app/chat.sendMessage";
    /// Outbound: submit a peer's public key for the exchange.
    pub const EXCHANGE_KEY: &str = "/app/chat.exchangeKey";
    /// Inbound: the shared broadcast topic.
    pub const TOPIC_PUBLIC: &str = "/topic/public";
    /// Inbound: the private per-user key queue.
    pub const QUEUE_KEYS: &str = "/user/queue/keys";
}

// ----------------------------------------------------------------------------
// Envelope
// ----------------------------------------------------------------------------

/// One relay frame: a destination plus an uninterpreted payload.
///
/// The payload stays a raw JSON value until the router has classified the
/// destination, so one socket can carry differently shaped traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub destination: String,
    pub payload: serde_json::Value,
}

impl Envelope {
    /// Wrap a payload for the given destination.
    pub fn new(destination: &str, payload: &impl Serialize) -> Result<Self> {
        let payload = serde_json::to_value(payload).map_err(ProtocolError::MalformedEnvelope)?;
        Ok(Self { destination: destination.to_string(), payload })
    }

    /// Decode a raw text frame.
    pub fn decode(text: &str) -> Result<Self> {
        let envelope = serde_json::from_str(text).map_err(ProtocolError::MalformedEnvelope)?;
        Ok(envelope)
    }

    /// Encode for the wire.
    pub fn encode(&self) -> Result<String> {
        let text = serde_json::to_string(self).map_err(ProtocolError::MalformedEnvelope)?;
        Ok(text)
    }

    /// Interpret the payload as a `T`.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.payload.clone()).map_err(|e| {
            ProtocolError::MalformedPayload {
                destination: self.destination.clone(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
