//! Post model
//!
//! A post is created once and never edited. Every field is validated at
//! construction, so a `Post` in hand is always well-formed.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ValidationError;
use crate::citation;

/// Default maximum length for post content, in characters
pub const DEFAULT_MAX_CONTENT_LEN: usize = 8000;

/// Maximum length for author names
const MAX_AUTHOR_LEN: usize = 64;

/// Name shown when a poster leaves the author field blank
pub const ANONYMOUS: &str = "Anonymous";

/// Post identifier, sequential per board and always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct PostId(u64);

impl PostId {
    /// First id handed out on a fresh board
    pub const FIRST: PostId = PostId(1);

    pub fn new(id: u64) -> Result<Self, ValidationError> {
        if id == 0 {
            return Err(ValidationError::InvalidFormat {
                field: "post id",
                reason: "must be a positive integer",
            });
        }
        Ok(Self(id))
    }

    /// The id that follows this one in a board's sequence, or `None` once
    /// the sequence is exhausted.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for PostId {
    type Error = ValidationError;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<PostId> for u64 {
    fn from(id: PostId) -> Self {
        id.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validated post body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PostContent(String);

impl PostContent {
    /// Create post content with the default length limit.
    ///
    /// # Rules
    /// - Not empty or whitespace-only
    /// - At most [`DEFAULT_MAX_CONTENT_LEN`] characters
    ///
    /// The text is stored exactly as given; line breaks and surrounding
    /// whitespace survive.
    ///
    /// # Example
    /// ```
    /// use frogboard_core::models::PostContent;
    ///
    /// assert!(PostContent::new("hello").is_ok());
    /// assert!(PostContent::new("").is_err());
    /// assert!(PostContent::new(" \n ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        Self::with_max_len(s, DEFAULT_MAX_CONTENT_LEN)
    }

    /// Create post content with an explicit length limit.
    pub fn with_max_len(s: &str, max: usize) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Err(ValidationError::Empty { field: "content" });
        }

        if s.chars().count() > max {
            return Err(ValidationError::TooLong {
                field: "content",
                max,
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Post ids referenced with `>>N`, in order of first appearance.
    pub fn citations(&self) -> Vec<PostId> {
        citation::extract(&self.0)
    }
}

impl AsRef<str> for PostContent {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Poster display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Author(String);

impl Author {
    /// Create an author name. Blank input becomes [`ANONYMOUS`].
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Ok(Self::anonymous());
        }

        if trimmed.chars().count() > MAX_AUTHOR_LEN {
            return Err(ValidationError::TooLong {
                field: "author",
                max: MAX_AUTHOR_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn anonymous() -> Self {
        Self(ANONYMOUS.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Author {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// A single user-authored post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPost")]
pub struct Post {
    id: PostId,
    content: PostContent,
    author: Author,
    created_at: DateTime<Utc>,
}

impl Post {
    /// Build a post from raw values, validating each field.
    ///
    /// # Example
    /// ```
    /// use chrono::Utc;
    /// use frogboard_core::models::Post;
    ///
    /// let post = Post::new(1, "hello", "alice", Utc::now()).unwrap();
    /// assert_eq!(post.content().as_str(), "hello");
    /// assert!(Post::new(2, "", "bob", Utc::now()).is_err());
    /// ```
    pub fn new(
        id: u64,
        content: &str,
        author: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::from_parts(
            PostId::new(id)?,
            PostContent::new(content)?,
            Author::new(author)?,
            created_at,
        ))
    }

    /// Assemble a post from already-validated parts.
    pub fn from_parts(
        id: PostId,
        content: PostContent,
        author: Author,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            content,
            author,
            created_at,
        }
    }

    pub fn id(&self) -> PostId {
        self.id
    }

    pub fn content(&self) -> &PostContent {
        &self.content
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Fragment id used for in-page links (`#p42`).
    pub fn anchor(&self) -> String {
        format!("p{}", self.id)
    }
}

/// Wire shape accepted when deserializing a post
#[derive(Deserialize)]
struct RawPost {
    id: u64,
    content: String,
    #[serde(default)]
    author: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<RawPost> for Post {
    type Error = ValidationError;

    fn try_from(raw: RawPost) -> Result<Self, Self::Error> {
        Post::new(
            raw.id,
            &raw.content,
            raw.author.as_deref().unwrap_or_default(),
            raw.created_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn accessors_return_inputs() {
        let post = Post::new(7, "ribbit\n>be me", "alice", t0()).unwrap();
        assert_eq!(post.id().get(), 7);
        assert_eq!(post.content().as_str(), "ribbit\n>be me");
        assert_eq!(post.author().as_str(), "alice");
        assert_eq!(post.created_at(), t0());
        assert_eq!(post.anchor(), "p7");
    }

    #[test]
    fn rejects_empty_content() {
        let err = Post::new(1, "", "alice", t0()).unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "content" }));

        let err = Post::new(1, "  \n\t", "alice", t0()).unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
    }

    #[test]
    fn content_max_length() {
        let at_limit = "a".repeat(DEFAULT_MAX_CONTENT_LEN);
        assert!(PostContent::new(&at_limit).is_ok());

        let over = "a".repeat(DEFAULT_MAX_CONTENT_LEN + 1);
        let err = PostContent::new(&over).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: DEFAULT_MAX_CONTENT_LEN, .. }));
    }

    #[test]
    fn content_limit_counts_characters() {
        // 4 chars, 12 bytes
        assert!(PostContent::with_max_len("🐸🐸🐸🐸", 4).is_ok());
        assert!(PostContent::with_max_len("🐸🐸🐸🐸🐸", 4).is_err());
    }

    #[test]
    fn rejects_zero_id() {
        let err = Post::new(0, "hello", "alice", t0()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { field: "post id", .. }));
    }

    #[test]
    fn blank_author_is_anonymous() {
        assert_eq!(Author::new("").unwrap().as_str(), ANONYMOUS);
        assert_eq!(Author::new("   ").unwrap().as_str(), ANONYMOUS);
        assert_eq!(Author::new(" bob ").unwrap().as_str(), "bob");
    }

    #[test]
    fn author_max_length() {
        assert!(Author::new(&"x".repeat(64)).is_ok());
        let err = Author::new(&"x".repeat(65)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 64, .. }));
    }

    #[test]
    fn serde_validates_on_the_way_in() {
        let post: Post = serde_json::from_str(
            r#"{"id": 3, "content": "hi", "created_at": "2024-03-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(post.author().as_str(), ANONYMOUS);

        let bad = serde_json::from_str::<Post>(
            r#"{"id": 3, "content": "", "author": "x", "created_at": "2024-03-01T12:00:00Z"}"#,
        );
        assert!(bad.is_err());

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn id_sequence() {
        let id = PostId::new(41).unwrap();
        assert_eq!(id.next().map(PostId::get), Some(42));
        assert_eq!(PostId::new(u64::MAX).unwrap().next(), None);
        assert_eq!(id.to_string(), "41");
    }
}
