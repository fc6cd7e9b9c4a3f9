//! Room reservation service: CLI server
//!
//! ```sh
//! # Run with default config (~/.config/room-reservations/config.toml)
//! reservations-service
//!
//! # Custom config path
//! reservations-service --config /etc/room-reservations/config.toml
//!
//! # Override port and log level
//! reservations-service --api-port 9090 --log-level debug
//!
//! # Validate config without starting
//! reservations-service --check
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use room_reservations::config::{AppConfig, CONFIG_ENV};
use room_reservations::server::{init_tracing, ServerHandle, ServerOptions};

/// Room reservation REST service.
#[derive(Parser, Debug)]
#[command(
    name = "reservations-service",
    version,
    about = "Room reservation service with approval and conflict detection",
    long_about = "REST API server for creating, approving and cancelling room reservations.\n\n\
                  Default config: ~/.config/room-reservations/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = CONFIG_ENV)]
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

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(port) = self.api_port {
            config.server.api_port = port;
        }
        if let Some(ref level) = self.log_level {
            config.logging.level = level.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // ── Load configuration ─────────────────────────────────────
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(room_reservations::default_config_path);

    let loaded = AppConfig::load(&config_path);

    if cli.check {
        return Ok(match loaded {
            Ok(mut config) => {
                cli.apply_overrides(&mut config);
                println!("✅ Configuration is valid");
                println!("   Config file : {}", config_path.display());
                println!("   API address : {}", config.api_address());
                println!("   Database    : {}", config.database.connection_url());
                println!("   Log level   : {}", config.logging.level);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Invalid configuration in {}: {}", config_path.display(), e);
                ExitCode::FAILURE
            }
        });
    }

    let config = match loaded {
        Ok(mut cfg) => {
            cli.apply_overrides(&mut cfg);
            init_tracing(&cfg);
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            let mut cfg = AppConfig::default();
            cli.apply_overrides(&mut cfg);
            init_tracing(&cfg);
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
            cfg
        }
    };

    // ── Start server ───────────────────────────────────────────
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
    })
    .await?;

    handle.install_signal_handler();

    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(ExitCode::SUCCESS)
}
