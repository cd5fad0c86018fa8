use tether_core::types::{RequestKind, VariableSource};

use crate::transport::{HttpResponse, RpcResponse};

/// The kind-agnostic shape binding rules are evaluated against.
///
/// `primary` holds headers (HTTP) or metadata (RPC); `secondary` holds
/// cookies (HTTP) or trailers (RPC). Both keep the transport's order.
#[derive(Debug, Clone)]
pub struct ResponseView {
    pub kind: RequestKind,
    pub status_code: i32,
    pub body: String,
    pub is_json: bool,
    pub primary: Vec<(String, String)>,
    pub secondary: Vec<(String, String)>,
}

impl ResponseView {
    pub fn from_http(resp: &HttpResponse) -> Self {
        Self {
            kind: RequestKind::Http,
            status_code: i32::from(resp.status_code),
            body: resp.body.clone(),
            is_json: resp.is_json,
            primary: resp
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            secondary: resp
                .cookies
                .iter()
                .map(|c| (c.name.clone(), c.value.clone()))
                .collect(),
        }
    }

    pub fn from_rpc(resp: &RpcResponse) -> Self {
        Self {
            kind: RequestKind::Rpc,
            status_code: resp.status_code,
            body: resp.body.clone(),
            is_json: true,
            primary: resp
                .metadata
                .iter()
                .map(|m| (m.key.clone(), m.value.clone()))
                .collect(),
            secondary: resp
                .trailers
                .iter()
                .map(|m| (m.key.clone(), m.value.clone()))
                .collect(),
        }
    }

    /// First value stored under exactly `key` in the list `source` reads from.
    ///
    /// Returns `None` for `Body` and for sources the response kind does not have.
    pub fn lookup(&self, source: VariableSource, key: &str) -> Option<&str> {
        if !source.allowed_for(self.kind) {
            return None;
        }
        let pairs = match source {
            VariableSource::Header | VariableSource::MetaData => &self.primary,
            VariableSource::Cookie | VariableSource::Trailers => &self.secondary,
            VariableSource::Body => return None,
        };
        pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}
