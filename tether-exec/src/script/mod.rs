mod http;
mod registry;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tether_core::types::{Environment, KeyValue, Request, RequestSpec, ScriptLanguage};

use crate::transport::{HttpResponse, RpcResponse};

pub use http::HttpScriptRunner;
pub use registry::ScriptRegistry;

/// The request as a script sees it.
///
/// For RPC requests `method` is the RPC method and `url` the server address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestData {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(rename = "queryParams", default)]
    pub query_params: BTreeMap<String, String>,
    #[serde(rename = "pathParams", default)]
    pub path_params: BTreeMap<String, String>,
}

impl RequestData {
    pub fn from_request(req: &Request) -> Self {
        match &req.spec {
            RequestSpec::Http(http) => Self {
                body: http.body.clone(),
                method: http.method.clone(),
                url: http.url.clone(),
                metadata: BTreeMap::new(),
                headers: pairs(&http.headers),
                query_params: pairs(&http.query_params),
                path_params: pairs(&http.path_params),
            },
            RequestSpec::Rpc(rpc) => Self {
                body: rpc.body.clone(),
                method: rpc.method.clone(),
                url: rpc.address.clone(),
                metadata: pairs(&rpc.metadata),
                ..Self::default()
            },
        }
    }
}

fn pairs(values: &[KeyValue]) -> BTreeMap<String, String> {
    values
        .iter()
        .map(|kv| (kv.key.clone(), kv.value.clone()))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseData {
    #[serde(rename = "statusCode")]
    pub status_code: i32,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ResponseData {
    pub fn from_http(resp: &HttpResponse) -> Self {
        Self {
            status_code: i32::from(resp.status_code),
            headers: resp.headers.clone(),
            body: resp.body.clone(),
        }
    }

    /// RPC metadata is exposed to scripts as headers.
    pub fn from_rpc(resp: &RpcResponse) -> Self {
        let mut headers = BTreeMap::new();
        for entry in &resp.metadata {
            headers
                .entry(entry.key.clone())
                .or_insert_with(|| entry.value.clone());
        }
        Self {
            status_code: resp.status_code,
            headers,
            body: resp.body.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExecParams {
    pub env: Option<Environment>,
    pub req: Option<RequestData>,
    pub res: Option<ResponseData>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExecResult {
    #[serde(skip)]
    pub req: Option<RequestData>,
    #[serde(default)]
    pub set_environments: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub prints: Vec<String>,
}

impl ExecResult {
    /// String-valued entries of `set_environments`, in key order.
    pub fn string_updates(&self) -> impl Iterator<Item = (&str, &str)> {
        self.set_environments
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.as_str(), s)))
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ScriptError {
    #[error("no script runner registered for {0}")]
    RunnerUnavailable(ScriptLanguage),
    #[error("a script runner for {0} is already registered")]
    AlreadyRegistered(ScriptLanguage),
    #[error("unknown scripting language: {0}")]
    UnknownLanguage(String),
    #[error("failed to reach script runner: {0}")]
    Transport(String),
    #[error("script failed: {0}")]
    Runtime(String),
    #[error("failed to decode script result: {0}")]
    Decode(String),
    #[error("script task aborted: {0}")]
    Aborted(String),
}

/// A scripting backend for one language.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    fn language(&self) -> ScriptLanguage;

    async fn execute_pre_request_script(
        &self,
        script: &str,
        params: ExecParams,
    ) -> Result<ExecResult, ScriptError>;

    async fn execute_post_response_script(
        &self,
        script: &str,
        params: ExecParams,
    ) -> Result<ExecResult, ScriptError>;
}
