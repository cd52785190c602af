//! Key events delivered over the private key queue.
//!
//! The relay tags key material inside a plain content string of the form
//! `"<Label>: <value>"`. The format is kept for relay compatibility; all of
//! its fragility is confined to this parser. Splitting happens on the first
//! colon only, so values that themselves contain colons survive.

use serde::{Deserialize, Serialize};

use crate::errors::{ProtocolError, Result};

pub const LABEL_PUBLIC_KEY: &str = "Public Key";
pub const LABEL_SHARED_SECRET: &str = "Shared Secret";
pub const LABEL_ERROR: &str = "Error";

// ----------------------------------------------------------------------------
// Key event
// ----------------------------------------------------------------------------

/// A private, per-user message on the key queue.
///
/// The relay sets the sender to `"System"` on secret and error messages;
/// the field is carried but nothing here depends on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,

    pub content: String,
}

/// Parsed meaning of a [`KeyEvent`] content string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySignal {
    /// The relay issued our public key.
    PublicKey(String),
    /// A derived shared secret, completing an exchange.
    SharedSecret(String),
    /// The relay rejected an exchange request.
    Rejected(String),
}

impl KeyEvent {
    pub fn new(content: impl Into<String>) -> Self {
        Self { sender: None, content: content.into() }
    }

    /// Parse the tagged content.
    ///
    /// Unrecognized labels yield `Ok(None)` so the relay can grow new message
    /// types without breaking deployed clients. Content with no label at all
    /// is a protocol error; the caller drops the frame and keeps going.
    pub fn signal(&self) -> Result<Option<KeySignal>> {
        let Some((label, value)) = self.content.split_once(':') else {
            return Err(ProtocolError::MalformedKeyEvent { content: self.content.clone() }.into());
        };
        let value = value.trim().to_string();
        match label.trim() {
            LABEL_PUBLIC_KEY => Ok(Some(KeySignal::PublicKey(value))),
            LABEL_SHARED_SECRET => Ok(Some(KeySignal::SharedSecret(value))),
            LABEL_ERROR => Ok(Some(KeySignal::Rejected(value))),
            _ => Ok(None),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
