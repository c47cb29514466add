//! HTTP server command

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use frogboard_server::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Config file (default: $FROGBOARD_CONFIG, then ~/.frogboard/config.toml)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Address to bind to, overriding the config file
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Directory served under /public, overriding the config file
    #[arg(long)]
    pub public_dir: Option<PathBuf>,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut config =
        ServerConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if args.public_dir.is_some() {
        config.public_dir = args.public_dir;
    }

    tracing::info!("Starting frogboard on {}", config.bind);

    // Run server (blocks until shutdown)
    run_server(config).await.context("Server error")?;

    Ok(())
}
