//! Error types for the metadata store

/// Metadata store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Unique key already taken within the owner scope
    #[error("unique constraint violated on {field}: '{value}'")]
    Conflict {
        /// Constrained field
        field: &'static str,
        /// Rejected value
        value: String,
    },

    /// Backend unavailable or failed
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create backend error
    #[inline]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Check if error is a unique-key conflict
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
