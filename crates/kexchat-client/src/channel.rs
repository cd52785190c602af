//! Bounded channel plumbing between the session tasks.

use tokio::sync::mpsc;

use crate::events::{AppEvent, Command, LinkEvent};

// ----------------------------------------------------------------------------
// Configuration
// ----------------------------------------------------------------------------

/// Buffer sizes for the session's channels.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Presentation → dispatch loop.
    pub command_buffer_size: usize,
    /// Relay link → dispatch loop.
    pub link_event_buffer_size: usize,
    /// Dispatch loop → presentation.
    pub app_event_buffer_size: usize,
    /// Dispatch loop → relay link writer.
    pub outbound_buffer_size: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            command_buffer_size: 32,
            link_event_buffer_size: 128,
            app_event_buffer_size: 64,
            outbound_buffer_size: 64,
        }
    }
}

// ----------------------------------------------------------------------------
// Channel type aliases
// ----------------------------------------------------------------------------

pub type CommandSender = mpsc::Sender<Command>;
pub type CommandReceiver = mpsc::Receiver<Command>;
pub type LinkEventSender = mpsc::Sender<LinkEvent>;
pub type LinkEventReceiver = mpsc::Receiver<LinkEvent>;
pub type AppEventSender = mpsc::Sender<AppEvent>;
pub type AppEventReceiver = mpsc::Receiver<AppEvent>;
/// Encoded frames on their way to the relay socket.
pub type OutboundSender = mpsc::Sender<String>;
pub type OutboundReceiver = mpsc::Receiver<String>;

// ----------------------------------------------------------------------------
// Channel creation
// ----------------------------------------------------------------------------

/// Create the bounded command channel (presentation → dispatch loop).
pub fn create_command_channel(config: &ChannelConfig) -> (CommandSender, CommandReceiver) {
    mpsc::channel(config.command_buffer_size)
}

/// Create the bounded link event channel (relay link → dispatch loop).
pub fn create_link_event_channel(config: &ChannelConfig) -> (LinkEventSender, LinkEventReceiver) {
    mpsc::channel(config.link_event_buffer_size)
}

/// Create the bounded app event channel (dispatch loop → presentation).
pub fn create_app_event_channel(config: &ChannelConfig) -> (AppEventSender, AppEventReceiver) {
    mpsc::channel(config.app_event_buffer_size)
}

/// Create the bounded outbound frame channel (dispatch loop → link writer).
pub fn create_outbound_channel(config: &ChannelConfig) -> (OutboundSender, OutboundReceiver) {
    mpsc::channel(config.outbound_buffer_size)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_buffer_sizes() {
        let config = ChannelConfig::default();
        assert_eq!(config.command_buffer_size, 32);
        assert_eq!(config.link_event_buffer_size, 128);
        assert_eq!(config.app_event_buffer_size, 64);
        assert_eq!(config.outbound_buffer_size, 64);
    }

    #[tokio::test]
    async fn command_channel_round_trip() {
        let (sender, mut receiver) = create_command_channel(&ChannelConfig::default());
        sender.send(Command::Disconnect).await.unwrap();
        assert_eq!(receiver.recv().await, Some(Command::Disconnect));
    }
}
