//! Boards known to the process

use std::collections::BTreeMap;
use std::sync::Arc;

use super::BoardAggregator;
use crate::error::{BoardError, Result};
use crate::models::{BoardId, BoardInfo};

/// Board aggregators keyed by slug, iterated in slug order
#[derive(Debug, Default)]
pub struct BoardDirectory {
    boards: BTreeMap<BoardId, Arc<BoardAggregator>>,
}

impl BoardDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a board.
    ///
    /// # Errors
    /// [`BoardError::DuplicateBoard`] if the slug is taken.
    pub fn insert(&mut self, info: BoardInfo) -> Result<Arc<BoardAggregator>> {
        if self.boards.contains_key(&info.id) {
            return Err(BoardError::DuplicateBoard(info.id.to_string()));
        }

        let id = info.id.clone();
        let board = Arc::new(BoardAggregator::new(info));
        self.boards.insert(id, Arc::clone(&board));
        Ok(board)
    }

    pub fn board(&self, id: &str) -> Option<Arc<BoardAggregator>> {
        self.boards.get(id).cloned()
    }

    pub fn boards(&self) -> Vec<BoardInfo> {
        self.boards.values().map(|b| b.info().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_slug() {
        let mut dir = BoardDirectory::new();
        dir.insert(BoardInfo::new("tech", "Technology").unwrap()).unwrap();
        dir.insert(BoardInfo::new("b", "Random").unwrap()).unwrap();

        assert_eq!(dir.board("b").unwrap().info().full_name, "Random");
        assert!(dir.board("x").is_none());

        let ids: Vec<String> = dir.boards().into_iter().map(|b| b.id.to_string()).collect();
        assert_eq!(ids, vec!["b", "tech"]);
    }

    #[test]
    fn duplicate_board_rejected() {
        let mut dir = BoardDirectory::new();
        dir.insert(BoardInfo::new("b", "Random").unwrap()).unwrap();

        let err = dir.insert(BoardInfo::new("b", "Other").unwrap()).unwrap_err();
        assert!(matches!(err, BoardError::DuplicateBoard(ref id) if id == "b"));
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.board("b").unwrap().info().full_name, "Random");
    }
}
