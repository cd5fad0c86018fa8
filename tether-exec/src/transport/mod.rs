mod http;
mod rpc;

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use tether_core::types::RequestKind;

pub use http::{canonical_header_key, parse_set_cookie, ReqwestHttpTransport};
pub use rpc::UnsupportedRpcTransport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpResponse {
    pub status_code: u16,
    /// Header names in canonical `Title-Case` form; repeated headers are joined with `", "`.
    pub headers: BTreeMap<String, String>,
    pub cookies: Vec<Cookie>,
    pub body: String,
    pub is_json: bool,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub key: String,
    pub value: String,
}

impl MetadataEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RpcResponse {
    /// gRPC status code; `0` is OK.
    pub status_code: i32,
    pub metadata: Vec<MetadataEntry>,
    pub trailers: Vec<MetadataEntry>,
    /// Response message rendered as JSON text.
    pub body: String,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("timeout")]
    Timeout,
    #[error("connect/dns/tls error: {0}")]
    Network(String),
    #[error("{0} transport is not available")]
    Unsupported(RequestKind),
    #[error("transport error: {0}")]
    Other(String),
}

/// Sends a saved HTTP request, resolving it and its environment by id.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send_request(
        &self,
        request_id: &str,
        environment_id: &str,
    ) -> Result<HttpResponse, TransportError>;
}

/// Invokes a saved RPC request, resolving it and its environment by id.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn invoke(
        &self,
        request_id: &str,
        environment_id: &str,
    ) -> Result<RpcResponse, TransportError>;
}
