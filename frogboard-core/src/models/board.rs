//! Board identity
//!
//! Boards are addressed by a short slug (`/b/`, `/tech/`) and carry a
//! human-readable name for headings and navigation.

use std::borrow::Borrow;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Maximum length for board full names
const MAX_FULL_NAME_LEN: usize = 64;

/// Lowercase alphanumeric, 1-16 characters
static BOARD_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]{1,16}$").expect("invalid board id regex"));

/// Validated board slug
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoardId(String);

impl BoardId {
    /// Create a board id.
    ///
    /// # Example
    /// ```
    /// use frogboard_core::models::BoardId;
    ///
    /// assert!(BoardId::new("b").is_ok());
    /// assert!(BoardId::new("tech").is_ok());
    /// assert!(BoardId::new("Tech").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "board id" });
        }

        if !BOARD_ID_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "board id",
                reason: "must be 1-16 lowercase letters or digits",
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BoardId {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&s)
    }
}

impl From<BoardId> for String {
    fn from(id: BoardId) -> Self {
        id.0
    }
}

impl Borrow<str> for BoardId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BoardId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Board id plus display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardInfo {
    pub id: BoardId,
    pub full_name: String,
}

impl BoardInfo {
    pub fn new(id: &str, full_name: &str) -> Result<Self, ValidationError> {
        let id = BoardId::new(id)?;
        let full_name = full_name.trim();

        if full_name.is_empty() {
            return Err(ValidationError::Empty { field: "board name" });
        }

        if full_name.chars().count() > MAX_FULL_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "board name",
                max: MAX_FULL_NAME_LEN,
            });
        }

        Ok(Self {
            id,
            full_name: full_name.to_owned(),
        })
    }

    /// Path of the board's front page, e.g. `/b/`.
    pub fn path(&self) -> String {
        format!("/{}/", self.id)
    }
}
