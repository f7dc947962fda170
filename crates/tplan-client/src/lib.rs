pub mod client;
pub mod error;
pub mod http;
pub mod request;
pub mod transport;

pub use client::TrackingPlanClient;
pub use error::ClientError;
pub use http::{
    HttpEndpoint, HttpEndpointError, HttpTransport, DEFAULT_API_VERSION, DEFAULT_BASE_URL,
    DEFAULT_TIMEOUT_MS,
};
pub use request::{
    source_connection_path, source_connections_path, tracking_plan_path, tracking_plans_path,
    CreateSourceConnectionRequest, CreateTrackingPlanRequest, NewTrackingPlan, ResourcePath,
    UpdateMask, UpdateTrackingPlanRequest, SOURCE_CONNECTIONS_COLLECTION,
};
pub use transport::{Method, Transport, TransportError};
