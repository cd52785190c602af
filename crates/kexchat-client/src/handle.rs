//! The presentation-side handle.
//!
//! Cheap to clone and safe to call from any task. Validation happens here,
//! synchronously, so bad input never crosses a channel; the not-connected
//! check reads the shared gauge the same way. Commands that pass both are
//! enqueued without blocking.

use kexchat_core::{ChatError, Result, Username, ValidationError};
use tokio::sync::mpsc::error::TrySendError;

use crate::channel::CommandSender;
use crate::events::Command;
use crate::link::ConnectionGauge;

/// Handle for driving a running client task.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    commands: CommandSender,
    gauge: ConnectionGauge,
    username: Username,
}

impl ClientHandle {
    pub fn new(commands: CommandSender, gauge: ConnectionGauge, username: Username) -> Self {
        Self { commands, gauge, username }
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn is_connected(&self) -> bool {
        self.gauge.is_connected()
    }

    /// Broadcast a chat message.
    ///
    /// Empty or whitespace-only content is rejected here; sends while
    /// disconnected fail without anything reaching the network.
    pub fn send_message(&self, content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }
        self.ensure_connected()?;
        self.dispatch(Command::SendMessage { content: content.to_string() })
    }

    /// Submit a peer's public key, starting or rotating the exchange.
    pub fn exchange_key(&self, peer_key: &str) -> Result<()> {
        if peer_key.trim().is_empty() {
            return Err(ValidationError::EmptyPeerKey.into());
        }
        self.ensure_connected()?;
        self.dispatch(Command::ExchangeKey { peer_key: peer_key.to_string() })
    }

    /// End the session. The task winds down and the link closes.
    pub fn disconnect(&self) -> Result<()> {
        self.dispatch(Command::Disconnect)
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.gauge.is_connected() {
            Ok(())
        } else {
            Err(ChatError::not_connected())
        }
    }

    fn dispatch(&self, command: Command) -> Result<()> {
        self.commands.try_send(command).map_err(|e| match e {
            TrySendError::Full(_) => ChatError::channel_error("command buffer full"),
            TrySendError::Closed(_) => ChatError::channel_error("client task stopped"),
        })
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
