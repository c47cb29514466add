//! Built-in template inspection and export
//!
//! Exported files keep their layout (`required/` included) so they can be
//! fed to the stylesheet build or used as a starting point for edits.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use frogboard_core::render::{Template, BUILTIN_TEMPLATES};

#[derive(Args, Debug)]
pub struct TemplatesArgs {
    #[command(subcommand)]
    pub command: TemplatesCommand,
}

#[derive(Subcommand, Debug)]
pub enum TemplatesCommand {
    /// List templates and the variables each one binds
    List,
    /// Write the templates to a directory
    Export {
        /// Destination directory (created if missing)
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
}

pub fn run_templates(args: TemplatesArgs) -> Result<()> {
    match args.command {
        TemplatesCommand::List => list(),
        TemplatesCommand::Export { out } => export(out),
    }
}

fn list() -> Result<()> {
    for embedded in BUILTIN_TEMPLATES {
        let template = Template::new(embedded.name, embedded.source);
        let variables = template
            .variables()
            .with_context(|| format!("Template {embedded} does not parse"))?
            .into_iter()
            .map(|(name, optional)| if optional { format!("{name}?") } else { name.to_owned() })
            .collect::<Vec<_>>();

        println!("{embedded}: {}", variables.join(", "));
    }
    Ok(())
}

fn export(out: PathBuf) -> Result<()> {
    for embedded in BUILTIN_TEMPLATES {
        let path = out.join(embedded.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, embedded.source)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), "exported template");
    }

    println!("Exported {} templates to {}", BUILTIN_TEMPLATES.len(), out.display());
    Ok(())
}
