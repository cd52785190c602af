//! Interactive chat session.
//!
//! One `select!` loop over stdin lines and app events. Plain text goes out
//! as a chat message; slash commands drive the key exchange and session
//! control. All state lives in the client task; the app only remembers the
//! last key material it was shown so `/key` and `/secret` can reprint it.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use kexchat_client::{AppEvent, ChatClient, ClientConfig, ConnectionStatus};
use kexchat_core::{ChatError, ChatEvent, EventKind, Timestamp, Username};

use crate::config::AppConfig;
use crate::error::Result;

pub struct ChatApp {
    client: ChatClient,
    config: AppConfig,
    local_key: Option<String>,
    shared_secret: Option<String>,
}

impl ChatApp {
    /// Connect to the configured relay and join as `username`.
    pub async fn connect(config: AppConfig, username: Username) -> Result<Self> {
        let relay_url = config.relay_url()?;
        debug!(relay = %relay_url, user = %username, "connecting");
        let client = ChatClient::connect(ClientConfig::new(relay_url, username)).await?;
        Ok(Self { client, config, local_key: None, shared_secret: None })
    }

    /// Run until the user quits or the relay connection ends.
    pub async fn run(mut self) -> Result<()> {
        println!("Type a message to chat. /exchange <key> starts a key exchange, /help lists commands.");
        self.prompt();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line? {
                        Some(line) => {
                            if self.handle_line(line.trim()) {
                                break;
                            }
                            self.prompt();
                        }
                        None => {
                            // stdin closed
                            let _ = self.client.handle().disconnect();
                            break;
                        }
                    }
                }

                event = self.client.next_event() => {
                    match event {
                        Some(event) => {
                            if self.render_event(event) {
                                break;
                            }
                        }
                        None => break,
                    }
                }
            }
        }

        self.client.shutdown().await?;
        println!("Session ended.");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Input handling
    // ------------------------------------------------------------------------

    /// Handle one input line. Returns true when the session should end.
    fn handle_line(&mut self, line: &str) -> bool {
        if line.is_empty() {
            return false;
        }
        let Some(rest) = line.strip_prefix('/') else {
            self.report(self.client.handle().send_message(line));
            return false;
        };

        let (command, argument) = rest.split_once(' ').unwrap_or((rest, ""));
        match command {
            "quit" | "q" => {
                let _ = self.client.handle().disconnect();
                return true;
            }
            "exchange" => self.report(self.client.handle().exchange_key(argument)),
            "key" => match &self.local_key {
                Some(key) => println!("your public key: {key}"),
                None => println!("no public key issued yet"),
            },
            "secret" => match &self.shared_secret {
                Some(secret) => println!("shared secret: {secret}"),
                None => println!("no shared secret established"),
            },
            "status" => {
                let status = if self.client.handle().is_connected() {
                    ConnectionStatus::Connected
                } else {
                    ConnectionStatus::Disconnected
                };
                println!("{} as {}", status, self.client.handle().username());
            }
            "help" => {
                println!("/exchange <key>  submit a peer's public key");
                println!("/key             show your public key");
                println!("/secret          show the established shared secret");
                println!("/status          show connection status");
                println!("/quit            leave the chat");
            }
            other => println!("unknown command: /{other}"),
        }
        false
    }

    fn report(&self, result: kexchat_core::Result<()>) {
        match result {
            Ok(()) => {}
            Err(ChatError::Validation(e)) => println!("! {e}"),
            Err(ChatError::Transport(e)) => println!("! {e}"),
            Err(e) => println!("! {e}"),
        }
    }

    fn prompt(&self) {
        print!("{}", self.config.ui.prompt);
        let _ = std::io::stdout().flush();
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Render one app event. Returns true when the session has ended.
    fn render_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::ConnectionChanged { status } => {
                println!("* {status}");
                return status == ConnectionStatus::Disconnected;
            }
            AppEvent::ChatAppended { event } => self.render_chat(&event),
            AppEvent::LocalKeyAvailable { public_key } => {
                println!("* your public key: {public_key}");
                self.local_key = Some(public_key);
            }
            AppEvent::SecretEstablished { secret } => {
                println!("* shared secret established: {secret}");
                self.shared_secret = Some(secret);
            }
            AppEvent::ExchangeRejected { reason } => {
                println!("! key exchange rejected: {reason}");
            }
        }
        false
    }

    fn render_chat(&self, event: &ChatEvent) {
        let clock = event.timestamp.map(|t| self.format_clock(t)).unwrap_or_default();
        match event.kind {
            EventKind::Join => println!("{clock}* {} joined", event.sender),
            EventKind::Leave => println!("{clock}* {} left", event.sender),
            EventKind::KeyExchange => {
                println!("{clock}* {} requested a key exchange", event.sender)
            }
            EventKind::Chat => println!("{clock}<{}> {}", event.sender, event.content),
        }
    }

    /// Wall-clock time of day (UTC) for a chat line.
    fn format_clock(&self, timestamp: Timestamp) -> String {
        if !self.config.ui.show_timestamps {
            return String::new();
        }
        let secs = timestamp.as_millis() / 1000;
        format!("[{:02}:{:02}:{:02}] ", (secs / 3600) % 24, (secs / 60) % 60, secs % 60)
    }
}
