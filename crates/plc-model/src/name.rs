//! Project name grammar
//!
//! A legal name starts with an ASCII letter, continues with ASCII
//! alphanumerics, `-` or `_`, and is never identifier-shaped.

use crate::ids::ProjectId;
use once_cell::sync::Lazy;
use regex::Regex;

/// Shortest accepted project name
pub const MIN_NAME_LEN: usize = 2;

/// Default upper bound on project name length (DNS label size)
pub const DEFAULT_MAX_NAME_LEN: usize = 63;

static PROJECT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("project name pattern compiles"));

/// Reasons a project name is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// Name is empty
    #[error("name is empty")]
    Empty,

    /// Name is shorter than [`MIN_NAME_LEN`]
    #[error("name is shorter than {min} characters")]
    TooShort {
        /// Minimum length
        min: usize,
    },

    /// Name exceeds the configured maximum
    #[error("name is longer than {max} characters")]
    TooLong {
        /// Maximum length
        max: usize,
    },

    /// Name contains characters outside the grammar
    #[error("name must start with a letter and contain only letters, digits, '-' or '_'")]
    InvalidCharacters,

    /// Name would be read back as an identifier
    #[error("name must not have identifier syntax")]
    IdentifierShaped,
}

/// Validate a project name
///
/// # Errors
/// Returns the first [`NameError`] the name violates.
pub fn validate_project_name(name: &str, max_len: usize) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.len() < MIN_NAME_LEN {
        return Err(NameError::TooShort { min: MIN_NAME_LEN });
    }
    if name.len() > max_len {
        return Err(NameError::TooLong { max: max_len });
    }
    if !PROJECT_NAME.is_match(name) {
        return Err(NameError::InvalidCharacters);
    }
    if ProjectId::parse(name).is_some() {
        return Err(NameError::IdentifierShaped);
    }
    Ok(())
}
