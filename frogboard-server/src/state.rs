//! Application state shared across handlers

use std::sync::Arc;

use frogboard_core::{BanList, BoardAggregator, BoardDirectory, BoardInfo, Renderer};

use crate::config::{ConfigError, ServerConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    directory: BoardDirectory,
    boards: Vec<BoardInfo>,
    renderer: Renderer,
    bans: BanList,
    page_size: usize,
    reply_preview: usize,
    max_content_len: usize,
}

impl AppState {
    pub fn from_config(config: &ServerConfig) -> Result<Self, ConfigError> {
        let directory = config.directory()?;
        let boards = directory.boards();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                directory,
                boards,
                renderer: config.renderer(),
                bans: config.ban_list(),
                page_size: config.page_size,
                reply_preview: config.reply_preview,
                max_content_len: config.max_content_len,
            }),
        })
    }

    pub fn board(&self, id: &str) -> Option<Arc<BoardAggregator>> {
        self.inner.directory.board(id)
    }

    /// Every board, in slug order.
    pub fn boards(&self) -> &[BoardInfo] {
        &self.inner.boards
    }

    pub fn renderer(&self) -> &Renderer {
        &self.inner.renderer
    }

    pub fn bans(&self) -> &BanList {
        &self.inner.bans
    }

    pub fn page_size(&self) -> usize {
        self.inner.page_size
    }

    pub fn reply_preview(&self) -> usize {
        self.inner.reply_preview
    }

    pub fn max_content_len(&self) -> usize {
        self.inner.max_content_len
    }
}
