use crate::transport::TransportError;
use tplan_core::FieldPath;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("{operation}: failed to decode {target} at `{path}`: {reason}")]
    Decode {
        operation: &'static str,
        target: &'static str,
        path: FieldPath,
        reason: String,
    },
    #[error("{operation}: failed to encode request body: {source}")]
    Encode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{operation}: `{field}` must be a non-empty path segment")]
    Precondition {
        operation: &'static str,
        field: &'static str,
    },
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Transport(error) if error.is_not_found())
    }

    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Transport(_) => None,
            Self::Decode { operation, .. }
            | Self::Encode { operation, .. }
            | Self::Precondition { operation, .. } => Some(*operation),
        }
    }
}
