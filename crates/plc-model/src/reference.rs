//! Caller-supplied project references

use crate::ids::ProjectId;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;

/// A project addressed either by identifier or by its owner-scoped name
///
/// Classified once when the raw string enters the system. A string with
/// identifier syntax is always an [`Reference::Identifier`], never a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reference {
    /// Canonical identifier
    Identifier(ProjectId),
    /// Human-chosen name, unique per owner
    Name(String),
}

impl Reference {
    /// Classify a raw reference string
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match ProjectId::parse(raw) {
            Some(id) => Self::Identifier(id),
            None => Self::Name(raw.to_string()),
        }
    }

    /// Whether the caller used identifier syntax
    #[inline]
    #[must_use]
    pub fn is_identifier(&self) -> bool {
        matches!(self, Self::Identifier(_))
    }

    /// Name, when addressed by name
    #[inline]
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Identifier(_) => None,
        }
    }
}

impl FromStr for Reference {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<ProjectId> for Reference {
    fn from(id: ProjectId) -> Self {
        Self::Identifier(id)
    }
}

impl From<&str> for Reference {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(id) => write!(f, "{id}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_syntax_wins() {
        let id = ProjectId::new();
        let reference = Reference::parse(&id.to_string());
        assert_eq!(reference, Reference::Identifier(id));
        assert!(reference.is_identifier());
        assert!(reference.as_name().is_none());
    }

    #[test]
    fn anything_else_is_a_name() {
        let reference: Reference = "web".parse().unwrap();
        assert_eq!(reference, Reference::Name("web".to_string()));
        assert_eq!(reference.as_name(), Some("web"));
        assert_eq!(reference.to_string(), "web");
    }
}
