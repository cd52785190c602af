//! Wire protocol for the relay connection
//!
//! Every frame on the relay socket is a JSON text envelope addressed by a
//! logical destination string. Broadcast chat traffic and private key-queue
//! traffic share the one socket and are told apart by destination alone.

pub mod envelope;
pub mod key_event;
pub mod message;

pub use envelope::{destinations, Envelope};
pub use key_event::{KeyEvent, KeySignal};
pub use message::{ChatEvent, EventKind};
