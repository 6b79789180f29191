//! # Error Types
//!
//! Consent operations themselves never fail. The errors here belong to the
//! edges: building a configuration out of caller or environment input.

use thiserror::Error;

/// Errors raised while validating a `ConsentConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A prefix or path was empty.
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    /// A value contains a character that would corrupt the persisted layout.
    #[error("{field} contains forbidden character {found:?}: {value:?}")]
    ForbiddenCharacter {
        field: &'static str,
        value: String,
        found: char,
    },

    /// The cookie path must be absolute.
    #[error("cookie path must start with '/': {0:?}")]
    RelativePath(String),
}
