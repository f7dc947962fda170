//! Fully-qualified resource names such as `workspaces/acme/tracking-plans/rs_123`.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const WORKSPACES_COLLECTION: &str = "workspaces";
pub const TRACKING_PLANS_COLLECTION: &str = "tracking-plans";
pub const SOURCES_COLLECTION: &str = "sources";

/// Last `/`-separated segment of a resource name: the short id.
///
/// Names that contain no `/` are returned unchanged.
pub fn short_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResourceNameError {
    #[error("resource name `{name}` must have the form `{expected}`")]
    Malformed { name: String, expected: &'static str },
    #[error("resource name `{name}` has an empty `{segment}` segment")]
    EmptySegment { name: String, segment: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackingPlanName {
    pub workspace: String,
    pub id: String,
}

impl TrackingPlanName {
    pub fn new(workspace: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            id: id.into(),
        }
    }
}

impl Display for TrackingPlanName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{WORKSPACES_COLLECTION}/{}/{TRACKING_PLANS_COLLECTION}/{}",
            self.workspace, self.id
        )
    }
}

impl FromStr for TrackingPlanName {
    type Err = ResourceNameError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let (workspace, id) = split_name(
            name,
            TRACKING_PLANS_COLLECTION,
            "workspaces/{workspace}/tracking-plans/{id}",
        )?;
        Ok(Self::new(workspace, id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceName {
    pub workspace: String,
    pub source: String,
}

impl SourceName {
    pub fn new(workspace: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            source: source.into(),
        }
    }
}

impl Display for SourceName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{WORKSPACES_COLLECTION}/{}/{SOURCES_COLLECTION}/{}",
            self.workspace, self.source
        )
    }
}

impl FromStr for SourceName {
    type Err = ResourceNameError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let (workspace, source) =
            split_name(name, SOURCES_COLLECTION, "workspaces/{workspace}/sources/{name}")?;
        Ok(Self::new(workspace, source))
    }
}

fn split_name<'a>(
    name: &'a str,
    collection: &str,
    expected: &'static str,
) -> Result<(&'a str, &'a str), ResourceNameError> {
    let malformed = || ResourceNameError::Malformed {
        name: name.to_string(),
        expected,
    };
    let parts = name.split('/').collect::<Vec<_>>();
    let [workspaces, workspace, kind, id] = parts.as_slice() else {
        return Err(malformed());
    };
    if *workspaces != WORKSPACES_COLLECTION || *kind != collection {
        return Err(malformed());
    }
    if workspace.is_empty() {
        return Err(ResourceNameError::EmptySegment {
            name: name.to_string(),
            segment: "workspace",
        });
    }
    if id.is_empty() {
        return Err(ResourceNameError::EmptySegment {
            name: name.to_string(),
            segment: "id",
        });
    }
    Ok((*workspace, *id))
}

#[cfg(test)]
#[path = "names_test.rs"]
mod tests;
