pub mod connection;
pub mod decode;
pub mod plan;
pub mod rule;
pub mod rules;

pub use connection::{SourceConnection, SourceConnections};
pub use decode::{decode_json, DecodeFailure};
pub use plan::{TrackingPlan, TrackingPlans};
pub use rule::{Rule, RuleType};
pub use rules::{Event, NamedRule, Rules};
