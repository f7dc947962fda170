use crate::error::ClientError;
use crate::request::{
    source_connection_path, source_connections_path, tracking_plan_path, tracking_plans_path,
    CreateSourceConnectionRequest, CreateTrackingPlanRequest, UpdateTrackingPlanRequest,
};
use crate::transport::{Method, Transport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::str::FromStr;
use tplan_core::{short_id, SourceName, TrackingPlanName};
use tplan_model::{
    decode_json, Rules, SourceConnection, SourceConnections, TrackingPlan, TrackingPlans,
};

/// Tracking plan operations over an injected [`Transport`].
///
/// The client holds no mutable state, so one instance can serve concurrent callers.
/// Writes to the same plan from several callers are last-write-wins on the server.
pub struct TrackingPlanClient {
    transport: Box<dyn Transport>,
}

impl TrackingPlanClient {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn list_tracking_plans(&self, workspace: &str) -> Result<TrackingPlans, ClientError> {
        const OPERATION: &str = "list_tracking_plans";
        require(OPERATION, "workspace", workspace)?;
        self.send(
            OPERATION,
            "tracking plans",
            Method::Get,
            &tracking_plans_path(workspace),
            None,
        )
    }

    /// `id` is the short id (`rs_123`) or the plan's full `name`.
    pub fn get_tracking_plan(
        &self,
        workspace: &str,
        id: &str,
    ) -> Result<TrackingPlan, ClientError> {
        const OPERATION: &str = "get_tracking_plan";
        require(OPERATION, "workspace", workspace)?;
        let id = require_segment::<TrackingPlanName>(OPERATION, "id", id)?;
        self.send(
            OPERATION,
            "tracking plan",
            Method::Get,
            &tracking_plan_path(workspace, id),
            None,
        )
    }

    /// Creates a new plan on every call; the returned plan carries the server-assigned name.
    pub fn create_tracking_plan(
        &self,
        workspace: &str,
        display_name: &str,
        rules: Rules,
    ) -> Result<TrackingPlan, ClientError> {
        const OPERATION: &str = "create_tracking_plan";
        require(OPERATION, "workspace", workspace)?;
        let body = encode(OPERATION, &CreateTrackingPlanRequest::new(display_name, rules))?;
        self.send(
            OPERATION,
            "tracking plan",
            Method::Post,
            &tracking_plans_path(workspace),
            Some(body),
        )
    }

    /// `paths` is sent verbatim as the update mask; see [`UpdateTrackingPlanRequest::new`].
    pub fn update_tracking_plan(
        &self,
        workspace: &str,
        id: &str,
        paths: Vec<String>,
        updated_plan: TrackingPlan,
    ) -> Result<TrackingPlan, ClientError> {
        const OPERATION: &str = "update_tracking_plan";
        require(OPERATION, "workspace", workspace)?;
        let id = require_segment::<TrackingPlanName>(OPERATION, "id", id)?;
        let body = encode(OPERATION, &UpdateTrackingPlanRequest::new(updated_plan, paths))?;
        self.send(
            OPERATION,
            "tracking plan",
            Method::Put,
            &tracking_plan_path(workspace, id),
            Some(body),
        )
    }

    /// Deleting a plan the server no longer has fails with a not-found transport error.
    pub fn delete_tracking_plan(&self, workspace: &str, id: &str) -> Result<(), ClientError> {
        const OPERATION: &str = "delete_tracking_plan";
        require(OPERATION, "workspace", workspace)?;
        let id = require_segment::<TrackingPlanName>(OPERATION, "id", id)?;
        self.send_without_response(OPERATION, Method::Delete, &tracking_plan_path(workspace, id))
    }

    /// `source_name` is either a short source name (`js`) or an already qualified
    /// `workspaces/{workspace}/sources/{name}`. Plan ids may also be full plan names.
    pub fn create_source_connection(
        &self,
        workspace: &str,
        plan_id: &str,
        source_name: &str,
    ) -> Result<SourceConnection, ClientError> {
        const OPERATION: &str = "create_source_connection";
        require(OPERATION, "workspace", workspace)?;
        let plan_id = require_segment::<TrackingPlanName>(OPERATION, "plan_id", plan_id)?;
        let source = match source_name.parse::<SourceName>() {
            Ok(source) => {
                require(OPERATION, "source_name", &source.source)?;
                source
            }
            Err(_) => {
                let source = require(OPERATION, "source_name", source_name)?;
                SourceName::new(workspace, source)
            }
        };
        let body = encode(OPERATION, &CreateSourceConnectionRequest::new(&source))?;
        self.send(
            OPERATION,
            "source connection",
            Method::Post,
            &source_connections_path(workspace, plan_id),
            Some(body),
        )
    }

    pub fn list_source_connections(
        &self,
        workspace: &str,
        plan_id: &str,
    ) -> Result<SourceConnections, ClientError> {
        const OPERATION: &str = "list_source_connections";
        require(OPERATION, "workspace", workspace)?;
        let plan_id = require_segment::<TrackingPlanName>(OPERATION, "plan_id", plan_id)?;
        self.send(
            OPERATION,
            "source connections",
            Method::Get,
            &source_connections_path(workspace, plan_id),
            None,
        )
    }

    pub fn delete_source_connection(
        &self,
        workspace: &str,
        plan_id: &str,
        source_name: &str,
    ) -> Result<(), ClientError> {
        const OPERATION: &str = "delete_source_connection";
        require(OPERATION, "workspace", workspace)?;
        let plan_id = require_segment::<TrackingPlanName>(OPERATION, "plan_id", plan_id)?;
        let source = require_segment::<SourceName>(OPERATION, "source_name", source_name)?;
        self.send_without_response(
            OPERATION,
            Method::Delete,
            &source_connection_path(workspace, plan_id, source),
        )
    }

    fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        target: &'static str,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<T, ClientError> {
        let bytes = self.round_trip(operation, method, path, body.as_deref())?;
        decode_json::<T>(&bytes).map_err(|failure| {
            tracing::warn!(
                operation,
                target,
                path = %failure.path,
                reason = %failure.reason,
                "response decode failed"
            );
            ClientError::Decode {
                operation,
                target,
                path: failure.path,
                reason: failure.reason,
            }
        })
    }

    fn send_without_response(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
    ) -> Result<(), ClientError> {
        self.round_trip(operation, method, path, None).map(|_| ())
    }

    fn round_trip(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        body: Option<&[u8]>,
    ) -> Result<Vec<u8>, ClientError> {
        tracing::debug!(operation, %method, path, has_body = body.is_some(), "sending request");
        match self.transport.do_request(method, path, body) {
            Ok(bytes) => {
                tracing::debug!(operation, %method, path, bytes = bytes.len(), "request succeeded");
                Ok(bytes)
            }
            Err(error) => {
                tracing::warn!(operation, %method, path, error = %error, "request failed");
                Err(ClientError::Transport(error))
            }
        }
    }
}

/// `value` becomes one path segment, so it must be non-blank and free of `/`, `?`, `#`.
fn require<'a>(
    operation: &'static str,
    field: &'static str,
    value: &'a str,
) -> Result<&'a str, ClientError> {
    if value.trim().is_empty() || value.contains(|c| matches!(c, '/' | '?' | '#')) {
        return Err(ClientError::Precondition { operation, field });
    }
    Ok(value)
}

/// Like [`require`], first reducing a fully-qualified `N` name to its short id.
fn require_segment<'a, N: FromStr>(
    operation: &'static str,
    field: &'static str,
    value: &'a str,
) -> Result<&'a str, ClientError> {
    let segment = if value.parse::<N>().is_ok() {
        short_id(value)
    } else {
        value
    };
    require(operation, field, segment)
}

fn encode<T: Serialize>(operation: &'static str, request: &T) -> Result<Vec<u8>, ClientError> {
    serde_json::to_vec(request).map_err(|source| ClientError::Encode { operation, source })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
