use serde::{Deserialize, Serialize};
use tplan_core::short_id;

/// Link between a tracking plan and a source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConnection {
    /// `workspaces/{workspace}/sources/{name}`.
    #[serde(default)]
    pub source_name: String,
    /// Short id of the tracking plan, e.g. `rs_123`.
    #[serde(default)]
    pub tracking_plan_id: String,
}

impl SourceConnection {
    pub fn source(&self) -> &str {
        short_id(&self.source_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConnections {
    #[serde(default)]
    pub connections: Vec<SourceConnection>,
}

impl SourceConnections {
    pub fn sources(&self) -> Vec<&str> {
        self.connections.iter().map(SourceConnection::source).collect()
    }
}
