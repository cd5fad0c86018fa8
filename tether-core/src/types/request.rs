use std::fmt;

use crate::types::{KeyValue, PostRequest, PreRequest, Variable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Http,
    Rpc,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Http => "http",
            RequestKind::Rpc => "rpc",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RequestMeta {
    pub id: String,

    #[serde(default)]
    pub name: String,
}

/// A saved request.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Request {
    pub meta: RequestMeta,
    pub spec: RequestSpec,
}

impl Request {
    pub fn id(&self) -> &str {
        &self.meta.id
    }

    pub fn kind(&self) -> RequestKind {
        self.spec.kind()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RequestSpec {
    Http(HttpRequestSpec),
    Rpc(RpcRequestSpec),
}

impl RequestSpec {
    pub fn kind(&self) -> RequestKind {
        match self {
            RequestSpec::Http(_) => RequestKind::Http,
            RequestSpec::Rpc(_) => RequestKind::Rpc,
        }
    }

    pub fn pre_request(&self) -> &PreRequest {
        match self {
            RequestSpec::Http(s) => &s.pre_request,
            RequestSpec::Rpc(s) => &s.pre_request,
        }
    }

    pub fn post_request(&self) -> &PostRequest {
        match self {
            RequestSpec::Http(s) => &s.post_request,
            RequestSpec::Rpc(s) => &s.post_request,
        }
    }

    pub fn variables(&self) -> &[Variable] {
        match self {
            RequestSpec::Http(s) => &s.variables,
            RequestSpec::Rpc(s) => &s.variables,
        }
    }

    pub fn as_http(&self) -> Option<&HttpRequestSpec> {
        match self {
            RequestSpec::Http(s) => Some(s),
            RequestSpec::Rpc(_) => None,
        }
    }

    pub fn as_rpc(&self) -> Option<&RpcRequestSpec> {
        match self {
            RequestSpec::Rpc(s) => Some(s),
            RequestSpec::Http(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct HttpRequestSpec {
    #[serde(default = "default_method")]
    pub method: String,

    pub url: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<KeyValue>,

    #[serde(rename = "queryParams", default, skip_serializing_if = "Vec::is_empty")]
    pub query_params: Vec<KeyValue>,

    #[serde(rename = "pathParams", default, skip_serializing_if = "Vec::is_empty")]
    pub path_params: Vec<KeyValue>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,

    #[serde(rename = "preRequest", default)]
    pub pre_request: PreRequest,

    #[serde(rename = "postRequest", default)]
    pub post_request: PostRequest,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<Variable>,
}

#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct RpcRequestSpec {
    pub address: String,

    /// Fully qualified method, e.g. `package.Service/Method`.
    #[serde(default)]
    pub method: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata: Vec<KeyValue>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,

    #[serde(rename = "preRequest", default)]
    pub pre_request: PreRequest,

    #[serde(rename = "postRequest", default)]
    pub post_request: PostRequest,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<Variable>,
}

fn default_method() -> String {
    "GET".to_string()
}
