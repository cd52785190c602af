//! Session wiring: connect the link, spawn the task, hand back the surface.

use tokio::task::JoinHandle;
use tracing::error;
use url::Url;

use kexchat_core::{ChatError, Result, Username};

use crate::channel::{
    create_app_event_channel, create_command_channel, AppEventReceiver, ChannelConfig,
};
use crate::events::AppEvent;
use crate::handle::ClientHandle;
use crate::link::RelayLink;
use crate::task::ClientTask;

/// Everything needed to open a session.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub relay_url: Url,
    pub username: Username,
    pub channels: ChannelConfig,
}

impl ClientConfig {
    pub fn new(relay_url: Url, username: Username) -> Self {
        Self { relay_url, username, channels: ChannelConfig::default() }
    }
}

/// A live session: the command surface plus the app event stream.
pub struct ChatClient {
    handle: ClientHandle,
    app_events: AppEventReceiver,
    task: JoinHandle<()>,
}

impl ChatClient {
    /// Connect to the relay and start the dispatch loop.
    ///
    /// The first app event is always `ConnectionChanged { Connected }`.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let (link, link_events) =
            RelayLink::connect(&config.relay_url, &config.username, &config.channels).await?;
        let gauge = link.gauge();

        let (command_sender, command_receiver) = create_command_channel(&config.channels);
        let (app_event_sender, app_events) = create_app_event_channel(&config.channels);

        let task = ClientTask::new(
            config.username.clone(),
            command_receiver,
            link_events,
            link,
            app_event_sender,
        );
        let task = tokio::spawn(async move {
            if let Err(e) = task.run().await {
                error!("client task failed: {e}");
            }
        });

        let handle = ClientHandle::new(command_sender, gauge, config.username);
        Ok(Self { handle, app_events, task })
    }

    pub fn handle(&self) -> &ClientHandle {
        &self.handle
    }

    /// Next state change to render. `None` once the session has ended.
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.app_events.recv().await
    }

    /// Disconnect and wait for the dispatch loop to finish.
    pub async fn shutdown(self) -> Result<()> {
        // Ignore a task that already stopped on its own.
        let _ = self.handle.disconnect();
        self.task
            .await
            .map_err(|e| ChatError::channel_error(e.to_string()))
    }
}
