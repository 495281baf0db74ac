//! keel - remote file store, project sync and build runner.
//!
//! # Usage
//!
//! ```bash
//! # Write a starter configuration
//! keel init-config keel.toml
//!
//! # Serve the API with command execution switched on
//! KEEL_API_KEY=change-me keel --config keel.toml serve --enable-exec
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use keel_cli::{ApiServer, logging, shutdown};
use keel_core::KeelConfig;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "keel")]
#[command(about = "keel - store, sync and build project files over HTTP", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "KEEL_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Listen address, e.g. 127.0.0.1:8080
        #[arg(long)]
        bind: Option<String>,

        /// SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,

        /// Shared secret expected in X-API-Key
        #[arg(long)]
        api_key: Option<String>,

        /// Working directory for exec requests without a project
        #[arg(long)]
        base_dir: Option<PathBuf>,

        /// Allow /api/exec and /api/build
        #[arg(long)]
        enable_exec: bool,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination (default: keel.toml)
        #[arg(default_value = "keel.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = KeelConfig::load(cli.config.as_deref())
        .await
        .context("Failed to load configuration")?;

    logging::init_logging(&config.general.log_level, config.general.log_format, cli.verbose);

    match cli.command {
        Commands::Serve {
            bind,
            db,
            api_key,
            base_dir,
            enable_exec,
        } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            if let Some(db) = db {
                config.store.database_path = db;
            }
            if let Some(api_key) = api_key {
                config.auth.api_key = Some(api_key);
            }
            if let Some(base_dir) = base_dir {
                config.exec.default_working_dir = Some(base_dir);
            }
            if enable_exec {
                config.exec.enabled = true;
            }

            let generated_key = config.auth.api_key.is_none();
            let config = Arc::new(config.finalize().context("Invalid configuration")?);
            if generated_key {
                println!("Development API key: {}", config.api_key());
            }
            let server = ApiServer::new(config).await?;
            server.serve(shutdown::shutdown_signal()).await?;
        }

        Commands::InitConfig { path, force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            KeelConfig::default()
                .save_to_path(&path)
                .await
                .context("Failed to write configuration")?;
            println!("Wrote default configuration to {}", path.display());
        }
    }

    Ok(())
}
