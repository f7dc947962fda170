use crate::rule::Rule;
use serde::{Deserialize, Serialize};

/// Rules for one tracked event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Assigned by the caller; this crate does not check that versions increase.
    #[serde(default = "default_event_version")]
    pub version: u32,
    #[serde(default)]
    pub rules: Rule,
}

impl Event {
    pub fn new(name: impl Into<String>, rules: Rule) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            version: default_event_version(),
            rules,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }
}

fn default_event_version() -> u32 {
    1
}

/// Trait rule in the older list form used by `identify_traits` and `group_traits`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRule {
    pub name: String,
    #[serde(default)]
    pub rules: Rule,
}

impl NamedRule {
    pub fn new(name: impl Into<String>, rules: Rule) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }
}

/// The schema bundle of a tracking plan.
///
/// `identify`/`group` and `identify_traits`/`group_traits` come from two API schema
/// versions. Each wire key decodes into its own field only; a payload that carries one
/// shape leaves the other at its empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identify: Option<Rule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<Rule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<Rule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<Event>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identify_traits: Vec<NamedRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_traits: Vec<NamedRule>,
}

impl Rules {
    pub fn event(&self, name: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.name == name)
    }

    pub fn uses_trait_lists(&self) -> bool {
        !self.identify_traits.is_empty() || !self.group_traits.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
#[path = "rules_test.rs"]
mod tests;
