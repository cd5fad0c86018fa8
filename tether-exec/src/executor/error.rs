use std::fmt;

use tether_core::types::RequestKind;
use tether_store::StoreError;

use crate::executor::response::Response;
use crate::jsonpath::ExtractionError;
use crate::script::ScriptError;
use crate::transport::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Request,
    Environment,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Request => "request",
            Entity::Environment => "environment",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: Entity, id: String },
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("pre-request cycle detected: {}", .chain.join(" -> "))]
    CycleDetected { chain: Vec<String> },
    #[error("pre-request chain deeper than {max_depth}")]
    DepthExceeded { max_depth: usize },
    /// The request went out and a response came back, but post-processing failed.
    #[error("post-request hook failed: {error}")]
    PostRequest {
        response: Box<Response>,
        #[source]
        error: HookError,
    },
}

impl SendError {
    pub(crate) fn not_found(entity: Entity, id: &str) -> Self {
        SendError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// The response that was received before the failure, if any.
    pub fn response(&self) -> Option<&Response> {
        match self {
            SendError::PostRequest { response, .. } => Some(response),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("response kind {actual} does not match request kind {expected}")]
    TypeMismatch {
        expected: RequestKind,
        actual: RequestKind,
    },
    #[error("failed to extract {target}: {source}")]
    Extraction {
        target: String,
        #[source]
        source: ExtractionError,
    },
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error("failed to persist environment: {0}")]
    Persistence(#[from] StoreError),
}
