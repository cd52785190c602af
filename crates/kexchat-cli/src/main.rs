//! KexChat terminal client entry point.

use clap::Parser;
use tracing::{error, info};

use kexchat_cli::app::ChatApp;
use kexchat_cli::cli::{Cli, Commands};
use kexchat_cli::config::AppConfig;
use kexchat_cli::error::Result;
use kexchat_core::Username;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let mut config = load_configuration(&cli)?;
    if let Some(relay) = &cli.relay {
        config.relay.url = relay.clone();
        config.validate()?;
    }

    match cli.command {
        Commands::Chat { name } => {
            let username = Username::parse(&name)?;
            let app = ChatApp::connect(config, username).await?;
            if let Err(e) = app.run().await {
                error!("chat session failed: {e}");
                std::process::exit(1);
            }
        }
        Commands::ExampleConfig => {
            print!("{}", AppConfig::example_config());
        }
    }

    info!("kexchat exited");
    Ok(())
}

/// Setup logging based on verbosity level.
fn setup_logging(verbose: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Load configuration from the given file, or the default locations.
fn load_configuration(cli: &Cli) -> Result<AppConfig> {
    if let Some(path) = &cli.config {
        info!("loading configuration from {path}");
        Ok(AppConfig::load_from_file(path)?)
    } else {
        Ok(AppConfig::load()?)
    }
}
