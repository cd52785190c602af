//! Command line interface definition.

use clap::{Parser, Subcommand};

/// Relay chat client with in-band key exchange.
#[derive(Parser, Debug)]
#[command(name = "kexchat", version, about)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Relay WebSocket URL, overriding the configuration
    #[arg(short, long, global = true)]
    pub relay: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Join the chat room under the given display name
    Chat {
        /// Display name to join as
        name: String,
    },
    /// Print an example configuration file and exit
    ExampleConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_chat_subcommand() {
        let cli = Cli::parse_from(["kexchat", "chat", "alice"]);
        assert!(matches!(cli.command, Commands::Chat { ref name } if name == "alice"));
        assert!(!cli.verbose);
    }

    #[test]
    fn parses_global_flags() {
        let cli = Cli::parse_from([
            "kexchat", "-v", "--relay", "ws://example.org/chat", "chat", "bob",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.relay.as_deref(), Some("ws://example.org/chat"));
    }
}
