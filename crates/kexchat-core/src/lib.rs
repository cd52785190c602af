//! KexChat core protocol implementation
//!
//! Foundational types for a relay-based chat client with an in-band
//! key-exchange handshake: the wire envelope codec, chat and key event
//! types, the key-exchange session state machine, the inbound message
//! router, and the conversation log.
//!
//! Everything in this crate is pure state and parsing. No I/O happens
//! here; the `kexchat-client` crate drives these types from its dispatch
//! loop and owns the relay connection.

pub mod errors;
pub mod log;
pub mod protocol;
pub mod router;
pub mod session;
pub mod types;

// ----------------------------------------------------------------------------
// Re-exports
// ----------------------------------------------------------------------------

pub use errors::{ChatError, ProtocolError, Result, TransportError, ValidationError};
pub use log::ConversationLog;
pub use protocol::{destinations, ChatEvent, Envelope, EventKind, KeyEvent, KeySignal};
pub use router::{MessageRouter, Routed};
pub use session::{KeySession, SessionPhase, SessionUpdate};
pub use types::{Timestamp, Username};
