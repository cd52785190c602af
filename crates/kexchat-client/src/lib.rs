//! KexChat client engine
//!
//! Owns the relay connection and the single dispatch loop that serializes
//! every state transition of a chat session:
//!
//! - [`link::RelayLink`] adapts the WebSocket relay into a stream of
//!   [`events::LinkEvent`]s and a sink of outbound frames.
//! - [`task::ClientTask`] consumes link events and user commands one at a
//!   time and owns the session state from `kexchat-core`.
//! - [`handle::ClientHandle`] is the thread-safe surface the presentation
//!   layer calls; it validates input before anything is enqueued.
//!
//! Frontends connect with [`client::ChatClient::connect`] and then drain the
//! app event stream.

pub mod channel;
pub mod client;
pub mod events;
pub mod handle;
pub mod link;
pub mod task;

// ----------------------------------------------------------------------------
// Re-exports
// ----------------------------------------------------------------------------

pub use channel::ChannelConfig;
pub use client::{ChatClient, ClientConfig};
pub use events::{AppEvent, Command, ConnectionStatus, LinkEvent};
pub use handle::ClientHandle;
pub use link::{ConnectionGauge, RelayLink};
pub use task::ClientTask;
