//! Thread title validation

use serde::Serialize;

use super::ValidationError;

/// Maximum length for thread titles
const MAX_TITLE_LEN: usize = 128;

/// Validated thread title. Threads may be untitled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ThreadTitle(String);

impl ThreadTitle {
    /// Create a thread title.
    ///
    /// # Rules
    /// - Surrounding whitespace is trimmed
    /// - Empty is allowed (untitled thread)
    /// - Max 128 characters
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untitled_is_allowed() {
        assert!(ThreadTitle::new("").unwrap().is_empty());
        assert!(ThreadTitle::new("   ").unwrap().is_empty());
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(ThreadTitle::new("  frogs  ").unwrap().as_str(), "frogs");
    }

    #[test]
    fn max_length() {
        assert!(ThreadTitle::new(&"a".repeat(128)).is_ok());
        let err = ThreadTitle::new(&"a".repeat(129)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 128, .. }));
    }
}
