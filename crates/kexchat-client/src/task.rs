//! The dispatch loop.
//!
//! `ClientTask` is the single owner of all session state. Commands from the
//! presentation layer and events from the relay link are consumed one at a
//! time from one `select!` loop, so no state transition can interleave with
//! another and inbound frames are applied in delivery order.
//!
//! Error containment: a malformed frame is logged and dropped, a failed
//! command is logged and the loop keeps running. Only channel closure (or an
//! explicit `Disconnect`) ends the task.

use tracing::{debug, error, info, warn};

use kexchat_core::{
    destinations, ChatError, ChatEvent, ConversationLog, Envelope, KeySession, MessageRouter,
    Result, Routed, SessionUpdate, Username, ValidationError,
};

use crate::channel::{AppEventSender, CommandReceiver, LinkEventReceiver};
use crate::events::{AppEvent, Command, ConnectionStatus, LinkEvent};
use crate::link::RelayLink;

// ----------------------------------------------------------------------------
// Client task
// ----------------------------------------------------------------------------

/// The task that owns a chat session's state and runs its dispatch loop.
pub struct ClientTask {
    session: KeySession,
    log: ConversationLog,
    router: MessageRouter,
    command_receiver: CommandReceiver,
    link_receiver: LinkEventReceiver,
    link: RelayLink,
    app_event_sender: AppEventSender,
    connected: bool,
    running: bool,
}

impl ClientTask {
    pub fn new(
        username: Username,
        command_receiver: CommandReceiver,
        link_receiver: LinkEventReceiver,
        link: RelayLink,
        app_event_sender: AppEventSender,
    ) -> Self {
        Self {
            session: KeySession::new(username),
            log: ConversationLog::new(),
            router: MessageRouter::new(),
            command_receiver,
            link_receiver,
            link,
            app_event_sender,
            connected: false,
            running: true,
        }
    }

    /// Run the dispatch loop until disconnect or channel closure.
    pub async fn run(mut self) -> Result<()> {
        debug!(user = %self.session.username(), "client task starting");

        while self.running {
            tokio::select! {
                command = self.command_receiver.recv() => {
                    match command {
                        Some(command) => {
                            if let Err(e) = self.process_command(command).await {
                                if self.contain(e) {
                                    break;
                                }
                            }
                        }
                        None => {
                            info!("command channel closed, shutting down");
                            break;
                        }
                    }
                }

                event = self.link_receiver.recv() => {
                    match event {
                        Some(event) => {
                            if let Err(e) = self.process_link_event(event).await {
                                if self.contain(e) {
                                    break;
                                }
                            }
                        }
                        None => {
                            info!("link event channel closed, shutting down");
                            break;
                        }
                    }
                }
            }
        }

        debug!(user = %self.session.username(), "client task stopped");
        Ok(())
    }

    /// Log a processing error. Returns true when the loop must stop.
    fn contain(&mut self, error: ChatError) -> bool {
        match error {
            ChatError::Channel { .. } => {
                error!("channel failure, shutting down client task: {error}");
                self.running = false;
                true
            }
            ChatError::Protocol(_) => {
                warn!("dropping malformed frame: {error}");
                false
            }
            _ => {
                warn!("error processing message: {error}");
                false
            }
        }
    }

    // ------------------------------------------------------------------------
    // Command processing
    // ------------------------------------------------------------------------

    async fn process_command(&mut self, command: Command) -> Result<()> {
        match command {
            Command::SendMessage { content } => {
                // The handle validates too; commands can still arrive from
                // other producers, so the state owner re-checks.
                let content = content.trim();
                if content.is_empty() {
                    return Err(ValidationError::EmptyMessage.into());
                }
                if !self.connected {
                    return Err(ChatError::not_connected());
                }
                let event = ChatEvent::chat(self.session.username(), content);
                self.transmit(destinations::SEND_MESSAGE, &event)?;
            }

            Command::ExchangeKey { peer_key } => {
                // Connectivity first: a disconnected exchange must leave the
                // session untouched and produce no frame.
                if !self.connected {
                    return Err(ChatError::not_connected());
                }
                let event = self.session.begin_exchange(&peer_key)?;
                debug!(phase = %self.session.phase(), "key exchange requested");
                self.transmit(destinations::EXCHANGE_KEY, &event)?;
            }

            Command::Disconnect => {
                info!(user = %self.session.username(), "disconnecting");
                self.running = false;
                self.connected = false;
                self.link.close();
                self.emit(AppEvent::ConnectionChanged { status: ConnectionStatus::Disconnected })
                    .await?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Link event processing
    // ------------------------------------------------------------------------

    async fn process_link_event(&mut self, event: LinkEvent) -> Result<()> {
        match event {
            LinkEvent::Connected => {
                self.connected = true;
                self.emit(AppEvent::ConnectionChanged { status: ConnectionStatus::Connected })
                    .await?;
            }

            LinkEvent::Disconnected { reason } => {
                if self.connected {
                    self.connected = false;
                    warn!(%reason, "relay link lost");
                    self.emit(AppEvent::ConnectionChanged {
                        status: ConnectionStatus::Disconnected,
                    })
                    .await?;
                }
            }

            LinkEvent::Inbound { text } => {
                let envelope = Envelope::decode(&text)?;
                match self.router.route(&envelope, &mut self.session, &mut self.log)? {
                    Routed::Chat(event) => {
                        self.emit(AppEvent::ChatAppended { event }).await?;
                    }
                    Routed::Session(update) => {
                        let app_event = match update {
                            SessionUpdate::LocalKeyReady { public_key } => {
                                AppEvent::LocalKeyAvailable { public_key }
                            }
                            SessionUpdate::SecretEstablished { secret } => {
                                AppEvent::SecretEstablished { secret }
                            }
                            SessionUpdate::ExchangeRejected { reason } => {
                                AppEvent::ExchangeRejected { reason }
                            }
                        };
                        self.emit(app_event).await?;
                    }
                    Routed::Ignored => {}
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Outputs
    // ------------------------------------------------------------------------

    fn transmit(&self, destination: &str, event: &ChatEvent) -> Result<()> {
        let envelope = Envelope::new(destination, event)?;
        self.link.send(envelope.encode()?)
    }

    async fn emit(&self, event: AppEvent) -> Result<()> {
        self.app_event_sender
            .send(event)
            .await
            .map_err(|_| ChatError::channel_error("app event receiver dropped"))
    }
}
