//! Project records and change requests

use crate::ids::{OwnerId, ProjectId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tenant-owned project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Canonical identifier, assigned by the store
    pub id: ProjectId,
    /// Owning user, immutable
    pub owner: OwnerId,
    /// Name, unique per owner
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

/// Project contents before the store assigns an identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    /// Owning user
    pub owner: OwnerId,
    /// Validated name
    pub name: String,
    /// Description, empty when omitted
    pub description: String,
    /// Creation time, also the initial update time
    pub created_at: DateTime<Utc>,
}

impl ProjectDraft {
    /// Create new draft stamped with the current time
    #[must_use]
    pub fn new(owner: OwnerId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            owner,
            name: name.into(),
            description: description.into(),
            created_at: Utc::now(),
        }
    }

    /// Attach the store-assigned identifier
    #[must_use]
    pub fn into_project(self, id: ProjectId) -> Project {
        Project {
            id,
            owner: self.owner,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Create request as received from the boundary
///
/// `name` stays optional so that a missing name is reported as a bad
/// parameter rather than rejected by deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    /// Requested name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Requested description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewProject {
    /// Request a project with the given name
    #[inline]
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update; an absent field keeps its stored value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPatch {
    /// New name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ProjectPatch {
    /// Empty patch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With name
    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether the patch changes nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }

    /// Apply to a record; returns whether the name changed
    pub fn apply_to(&self, project: &mut Project) -> bool {
        let mut renamed = false;
        if let Some(name) = &self.name {
            renamed = *name != project.name;
            project.name.clone_from(name);
        }
        if let Some(description) = &self.description {
            project.description.clone_from(description);
        }
        renamed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Project {
        ProjectDraft::new(OwnerId::new(), "web", "front end").into_project(ProjectId::new())
    }

    #[test]
    fn draft_sets_both_timestamps() {
        let project = sample();
        assert_eq!(project.created_at, project.updated_at);
    }

    #[test]
    fn empty_patch_keeps_fields() {
        let mut project = sample();
        let patch = ProjectPatch::new();
        assert!(patch.is_empty());
        assert!(!patch.apply_to(&mut project));
        assert_eq!(project.name, "web");
        assert_eq!(project.description, "front end");
    }

    #[test]
    fn patch_reports_rename() {
        let mut project = sample();
        assert!(ProjectPatch::new().with_name("api").apply_to(&mut project));
        assert!(!ProjectPatch::new().with_name("api").apply_to(&mut project));
        assert_eq!(project.name, "api");
    }

    #[test]
    fn absent_fields_deserialize_as_none() {
        let patch: ProjectPatch = serde_json::from_str(r#"{"description":""}"#).unwrap();
        assert_eq!(patch.name, None);
        assert_eq!(patch.description.as_deref(), Some(""));

        let create: NewProject = serde_json::from_str("{}").unwrap();
        assert!(create.name.is_none());
    }
}
