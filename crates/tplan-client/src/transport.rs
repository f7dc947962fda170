use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("`{method} {path}` returned status {status}: {body}")]
    Status {
        method: Method,
        path: String,
        status: u16,
        body: String,
    },
    #[error("`{method} {path}` failed: {reason}")]
    Connection {
        method: Method,
        path: String,
        reason: String,
    },
    #[error("`{method} {path}` timed out after {timeout_ms}ms")]
    Timeout {
        method: Method,
        path: String,
        timeout_ms: u64,
    },
    #[error("`{method} {path}` was cancelled")]
    Cancelled { method: Method, path: String },
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Sends one request to the tracking plan API and returns the raw response body.
///
/// Implementations arrive fully configured: base URL, API version prefix and
/// credentials are applied by the transport, so `path` is only the resource path,
/// e.g. `/workspaces/acme/tracking-plans`. Timeouts and cancellation belong to the
/// transport and surface as `TransportError::Timeout` / `TransportError::Cancelled`.
/// `body` is an already encoded JSON document.
pub trait Transport: Send + Sync {
    fn do_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&[u8]>,
    ) -> Result<Vec<u8>, TransportError>;
}
