pub mod field_path;
pub mod issues;
pub mod names;

pub use field_path::{FieldPath, FieldPathSegment};
pub use issues::{IssueSeverity, StructuredIssue};
pub use names::{
    short_id, ResourceNameError, SourceName, TrackingPlanName, SOURCES_COLLECTION,
    TRACKING_PLANS_COLLECTION, WORKSPACES_COLLECTION,
};
