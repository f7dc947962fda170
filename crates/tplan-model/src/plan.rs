use crate::rules::Rules;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tplan_core::{short_id, ResourceNameError, TrackingPlanName};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingPlan {
    /// Server-assigned `workspaces/{workspace}/tracking-plans/{id}`; empty before creation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub rules: Rules,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
}

impl TrackingPlan {
    pub fn new(display_name: impl Into<String>, rules: Rules) -> Self {
        Self {
            display_name: display_name.into(),
            rules,
            ..Self::default()
        }
    }

    pub fn id(&self) -> &str {
        short_id(&self.name)
    }

    pub fn parsed_name(&self) -> Result<TrackingPlanName, ResourceNameError> {
        self.name.parse()
    }
}

/// Response of the list endpoint. Only one page is ever read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingPlans {
    #[serde(default)]
    pub tracking_plans: Vec<TrackingPlan>,
}

impl TrackingPlans {
    pub fn len(&self) -> usize {
        self.tracking_plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracking_plans.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrackingPlan> {
        self.tracking_plans.iter()
    }

    pub fn find(&self, id: &str) -> Option<&TrackingPlan> {
        self.tracking_plans.iter().find(|plan| plan.id() == id)
    }

    /// Short id to full resource name for every plan in the list.
    pub fn ids(&self) -> BTreeMap<String, String> {
        self.tracking_plans
            .iter()
            .map(|plan| (plan.id().to_string(), plan.name.clone()))
            .collect()
    }
}

impl IntoIterator for TrackingPlans {
    type Item = TrackingPlan;
    type IntoIter = std::vec::IntoIter<TrackingPlan>;

    fn into_iter(self) -> Self::IntoIter {
        self.tracking_plans.into_iter()
    }
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
