//! frogboard: run a board server or render posts offline

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use commands::{RenderArgs, ServeArgs, TemplatesArgs};
use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(name = "frogboard", version, about = "A small anonymous message board")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Render a JSON array of posts to an HTML document
    Render(RenderArgs),
    /// Inspect or export the built-in templates
    Templates(TemplatesArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Render(args) => commands::run_render(args)?,
        Commands::Templates(args) => commands::run_templates(args)?,
    }
    Ok(())
}
