//! Resource paths and request envelopes.
//!
//! Paths have the form `/workspaces/{workspace}/{collection}[/{id}[/{sub}[/{sub_id}]]]`
//! with no trailing slash. List and create address a collection, the other calls an item.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use tplan_core::{SourceName, TRACKING_PLANS_COLLECTION, WORKSPACES_COLLECTION};
use tplan_model::{Rules, TrackingPlan};

pub const SOURCE_CONNECTIONS_COLLECTION: &str = "source-connections";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    workspace: String,
    collection: String,
    id: Option<String>,
    sub_collection: Option<String>,
    sub_id: Option<String>,
}

impl ResourcePath {
    pub fn collection(workspace: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            collection: collection.into(),
            id: None,
            sub_collection: None,
            sub_id: None,
        }
    }

    pub fn item(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Only rendered when an item id is set.
    pub fn sub_collection(mut self, sub_collection: impl Into<String>) -> Self {
        self.sub_collection = Some(sub_collection.into());
        self
    }

    /// Only rendered when a sub-collection is set.
    pub fn sub_item(mut self, sub_id: impl Into<String>) -> Self {
        self.sub_id = Some(sub_id.into());
        self
    }
}

impl Display for ResourcePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "/{WORKSPACES_COLLECTION}/{}/{}",
            self.workspace, self.collection
        )?;
        let Some(id) = &self.id else {
            return Ok(());
        };
        write!(f, "/{id}")?;
        let Some(sub_collection) = &self.sub_collection else {
            return Ok(());
        };
        write!(f, "/{sub_collection}")?;
        if let Some(sub_id) = &self.sub_id {
            write!(f, "/{sub_id}")?;
        }
        Ok(())
    }
}

pub fn tracking_plans_path(workspace: &str) -> String {
    ResourcePath::collection(workspace, TRACKING_PLANS_COLLECTION).to_string()
}

pub fn tracking_plan_path(workspace: &str, id: &str) -> String {
    ResourcePath::collection(workspace, TRACKING_PLANS_COLLECTION)
        .item(id)
        .to_string()
}

pub fn source_connections_path(workspace: &str, plan_id: &str) -> String {
    ResourcePath::collection(workspace, TRACKING_PLANS_COLLECTION)
        .item(plan_id)
        .sub_collection(SOURCE_CONNECTIONS_COLLECTION)
        .to_string()
}

pub fn source_connection_path(workspace: &str, plan_id: &str, source: &str) -> String {
    ResourcePath::collection(workspace, TRACKING_PLANS_COLLECTION)
        .item(plan_id)
        .sub_collection(SOURCE_CONNECTIONS_COLLECTION)
        .sub_item(source)
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTrackingPlan {
    pub display_name: String,
    pub rules: Rules,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTrackingPlanRequest {
    pub tracking_plan: NewTrackingPlan,
}

impl CreateTrackingPlanRequest {
    pub fn new(display_name: impl Into<String>, rules: Rules) -> Self {
        Self {
            tracking_plan: NewTrackingPlan {
                display_name: display_name.into(),
                rules,
            },
        }
    }
}

/// Dotted field paths the server applies from an update payload, e.g.
/// `tracking_plan.display_name`. Fields not named here keep their server value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMask {
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTrackingPlanRequest {
    pub tracking_plan: TrackingPlan,
    pub update_mask: UpdateMask,
}

impl UpdateTrackingPlanRequest {
    /// The mask is sent as given. Callers are responsible for it naming the fields they
    /// actually set on `tracking_plan`; nothing here cross-checks the two.
    pub fn new(tracking_plan: TrackingPlan, paths: Vec<String>) -> Self {
        Self {
            tracking_plan,
            update_mask: UpdateMask { paths },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSourceConnectionRequest {
    pub source_name: String,
}

impl CreateSourceConnectionRequest {
    pub fn new(source: &SourceName) -> Self {
        Self {
            source_name: source.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "request_test.rs"]
mod tests;
