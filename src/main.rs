//! Room availability service binary
//!
//! ```sh
//! # Default config (~/.config/room-availability/config.toml)
//! room-availability
//!
//! # Custom config path and port
//! room-availability --config /etc/room-availability/config.toml --api-port 9000
//!
//! # Validate config without starting
//! room-availability --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use room_availability::config::AppConfig;
use room_availability::server::{init_tracing, ServerHandle, ServerOptions};

/// Keeps hotel room blocked date ranges disjoint and in sync with inventory.
#[derive(Parser, Debug)]
#[command(name = "room-availability", version, about)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "AVAILABILITY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(room_availability::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }

    if cli.check {
        return match load_error {
            Some(e) => {
                eprintln!("Invalid configuration {}: {}", config_path.display(), e);
                Err(e.into())
            }
            None => {
                println!("Configuration is valid");
                println!("   Config file : {}", config_path.display());
                println!("   API address : {}", config.api_address());
                println!("   Database    : {}", config.database.connection_url());
                println!("   Log level   : {}", config.logging.level);
                println!(
                    "   Sync        : enabled={} mode={:?}",
                    config.sync.enabled, config.sync.mode
                );
                Ok(())
            }
        };
    }

    init_tracing(&config);
    match load_error {
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
        None => info!("Configuration loaded from {}", config_path.display()),
    }

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
