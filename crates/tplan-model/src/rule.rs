use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

// Encoding grows the stack by `STACK_GROWTH` whenever less than `RED_ZONE` remains.
const RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 2 * 1024 * 1024;

/// The `type` keyword of a rule: either one type name or a list of them.
///
/// The variant records which form arrived on the wire so that encoding writes the same
/// form back. `"string"` and `["string"]` are different values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleType {
    Single(String),
    Many(Vec<String>),
}

impl RuleType {
    pub fn names(&self) -> &[String] {
        match self {
            Self::Single(name) => std::slice::from_ref(name),
            Self::Many(names) => names.as_slice(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names().iter().any(|candidate| candidate == name)
    }
}

impl From<&str> for RuleType {
    fn from(name: &str) -> Self {
        Self::Single(name.to_string())
    }
}

impl From<Vec<String>> for RuleType {
    fn from(names: Vec<String>) -> Self {
        Self::Many(names)
    }
}

/// One node of a tracking plan schema.
///
/// A rule with no fields set matches anything. It encodes as `{}` and is a valid node,
/// unlike an absent rule, which callers model as `Option<Rule>::None`.
///
/// An empty `properties` map and a missing `properties` key decode to the same value.
/// `required` keeps its wire order.
///
/// Encoding grows the stack on demand and dropping does not recurse, so trees of any
/// depth are safe to hold and encode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Rule {
    #[serde(rename = "$schema", default)]
    pub schema: Option<String>,
    #[serde(rename = "type", default)]
    pub rule_type: Option<RuleType>,
    #[serde(default)]
    pub properties: BTreeMap<String, Rule>,
    #[serde(default)]
    pub required: Vec<String>,
}

impl Rule {
    pub fn object() -> Self {
        Self::default().with_type("object")
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_type(mut self, rule_type: impl Into<RuleType>) -> Self {
        self.rule_type = Some(rule_type.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, rule: Rule) -> Self {
        self.properties.insert(name.into(), rule);
        self
    }

    pub fn with_required(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    pub fn is_wildcard(&self) -> bool {
        self.schema.is_none()
            && self.rule_type.is_none()
            && self.properties.is_empty()
            && self.required.is_empty()
    }

    pub fn property(&self, name: &str) -> Option<&Rule> {
        self.properties.get(name)
    }

    /// Deepest nesting level below this node; a rule without properties has depth 0.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0usize)];
        while let Some((rule, level)) = pending.pop() {
            deepest = deepest.max(level);
            pending.extend(rule.properties.values().map(|child| (child, level + 1)));
        }
        deepest
    }
}

impl Serialize for Rule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        stacker::maybe_grow(RED_ZONE, STACK_GROWTH, || {
            let len = usize::from(self.schema.is_some())
                + usize::from(self.rule_type.is_some())
                + usize::from(!self.properties.is_empty())
                + usize::from(!self.required.is_empty());
            let mut map = serializer.serialize_map(Some(len))?;
            if let Some(schema) = &self.schema {
                map.serialize_entry("$schema", schema)?;
            }
            if let Some(rule_type) = &self.rule_type {
                map.serialize_entry("type", rule_type)?;
            }
            if !self.properties.is_empty() {
                map.serialize_entry("properties", &self.properties)?;
            }
            if !self.required.is_empty() {
                map.serialize_entry("required", &self.required)?;
            }
            map.end()
        })
    }
}

impl Drop for Rule {
    fn drop(&mut self) {
        if self.properties.is_empty() {
            return;
        }
        let mut pending = std::mem::take(&mut self.properties)
            .into_values()
            .collect::<Vec<_>>();
        while let Some(mut rule) = pending.pop() {
            pending.extend(std::mem::take(&mut rule.properties).into_values());
        }
    }
}

#[cfg(test)]
#[path = "rule_test.rs"]
mod tests;
