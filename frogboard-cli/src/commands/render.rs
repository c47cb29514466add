//! Offline rendering of a post dump

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use frogboard_core::{BoardAggregator, BoardInfo, Order, Post, Renderer};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OrderArg {
    Asc,
    #[default]
    Desc,
}

impl From<OrderArg> for Order {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Asc => Order::Ascending,
            OrderArg::Desc => Order::Descending,
        }
    }
}

/// Arguments for the render command
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// JSON file holding an array of posts (stdin when omitted)
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Listing order by creation time
    #[arg(long, value_enum, default_value_t = OrderArg::Desc)]
    pub order: OrderArg,

    /// Page heading
    #[arg(long, default_value = "frogboard")]
    pub title: String,

    /// Write the document here instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run_render(args: RenderArgs) -> Result<()> {
    let raw = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read posts from stdin")?;
            raw
        }
    };

    let posts: Vec<Post> = serde_json::from_str(&raw).context("Invalid post JSON")?;
    // Scratch board; the heading is presentation only
    let board = BoardAggregator::new(BoardInfo::new("feed", "feed")?);
    for post in posts {
        let id = post.id();
        board
            .add_post(post)
            .with_context(|| format!("Cannot add post {id}"))?;
    }

    let listing = board.list_posts(args.order.into());
    tracing::debug!(posts = listing.len(), order = ?listing.order(), "rendering feed");

    let html = Renderer::new()
        .site_name(&args.title)
        .render_feed(&args.title, &listing)?;

    match &args.output {
        Some(path) => fs::write(path, html.as_str())
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => io::stdout()
            .write_all(html.as_str().as_bytes())
            .context("Failed to write to stdout")?,
    }

    Ok(())
}
