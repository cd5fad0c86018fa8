use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tether_core::{render_template, request_variables};
use tether_core::types::{HttpRequestSpec, KeyValue};
use tether_store::{EnvironmentStore, RequestStore};

use super::{Cookie, HttpResponse, HttpTransport, TransportError};

pub struct ReqwestHttpTransport {
    client: reqwest::Client,
    requests: Arc<dyn RequestStore>,
    environments: Arc<dyn EnvironmentStore>,
    timeout: Duration,
    max_response_bytes: usize,
}

impl ReqwestHttpTransport {
    pub fn new(
        requests: Arc<dyn RequestStore>,
        environments: Arc<dyn EnvironmentStore>,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("tether/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Other(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            requests,
            environments,
            timeout: Duration::from_secs(30),
            max_response_bytes: 16 * 1024 * 1024,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_response_bytes(mut self, max: usize) -> Self {
        self.max_response_bytes = max;
        self
    }

    async fn resolve(
        &self,
        request_id: &str,
        environment_id: &str,
    ) -> Result<(HttpRequestSpec, BTreeMap<String, String>), TransportError> {
        let req = self
            .requests
            .get_request(request_id)
            .await
            .ok_or_else(|| TransportError::NotFound {
                entity: "request",
                id: request_id.to_string(),
            })?;
        let spec = req
            .spec
            .as_http()
            .cloned()
            .ok_or_else(|| TransportError::InvalidRequest(format!("request {request_id} is not an HTTP request")))?;

        let env = if environment_id.is_empty() {
            None
        } else {
            Some(
                self.environments
                    .get_environment(environment_id)
                    .await
                    .ok_or_else(|| TransportError::NotFound {
                        entity: "environment",
                        id: environment_id.to_string(),
                    })?,
            )
        };
        Ok((spec, request_variables(env.as_ref())))
    }
}

#[async_trait]
impl HttpTransport for ReqwestHttpTransport {
    async fn send_request(
        &self,
        request_id: &str,
        environment_id: &str,
    ) -> Result<HttpResponse, TransportError> {
        let (spec, vars) = self.resolve(request_id, environment_id).await?;
        let url = build_url(&spec, &vars)?;

        let method = if spec.method.trim().is_empty() { "GET" } else { spec.method.trim() };
        let method: reqwest::Method = method
            .to_ascii_uppercase()
            .parse()
            .map_err(|e: <reqwest::Method as std::str::FromStr>::Err| TransportError::InvalidRequest(e.to_string()))?;

        let mut rb = self.client.request(method, url).timeout(self.timeout);
        for h in enabled(&spec.headers) {
            rb = rb.header(render_template(&h.key, &vars), render_template(&h.value, &vars));
        }
        if !spec.body.is_empty() {
            rb = rb.body(render_template(&spec.body, &vars));
        }

        let started = Instant::now();
        let resp = rb.send().await.map_err(map_reqwest_error)?;
        let status_code = resp.status().as_u16();

        let mut headers: BTreeMap<String, String> = BTreeMap::new();
        let mut cookies = Vec::new();
        for (k, v) in resp.headers().iter() {
            let Ok(v) = v.to_str() else {
                continue;
            };
            if *k == reqwest::header::SET_COOKIE {
                if let Some(c) = parse_set_cookie(v) {
                    cookies.push(c);
                }
            }
            headers
                .entry(canonical_header_key(k.as_str()))
                .and_modify(|cur| {
                    cur.push_str(", ");
                    cur.push_str(v);
                })
                .or_insert_with(|| v.to_string());
        }

        let body = resp.bytes().await.map_err(map_reqwest_error)?;
        if body.len() > self.max_response_bytes {
            return Err(TransportError::Other(format!(
                "response too large (>{} bytes)",
                self.max_response_bytes
            )));
        }
        let is_json = serde_json::from_slice::<serde_json::Value>(&body).is_ok();
        let body = String::from_utf8_lossy(&body).into_owned();

        Ok(HttpResponse {
            status_code,
            headers,
            cookies,
            body,
            is_json,
            elapsed: started.elapsed(),
        })
    }
}

fn enabled(kvs: &[KeyValue]) -> impl Iterator<Item = &KeyValue> {
    kvs.iter().filter(|kv| kv.enable)
}

fn build_url(spec: &HttpRequestSpec, vars: &BTreeMap<String, String>) -> Result<url::Url, TransportError> {
    let mut raw = render_template(&spec.url, vars);
    for p in enabled(&spec.path_params) {
        raw = raw.replace(&format!("{{{}}}", p.key), &render_template(&p.value, vars));
    }

    let mut url = url::Url::parse(&raw).map_err(|e| TransportError::InvalidRequest(format!("{raw}: {e}")))?;
    let query: Vec<_> = enabled(&spec.query_params).collect();
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for q in query {
            pairs.append_pair(&render_template(&q.key, vars), &render_template(&q.value, vars));
        }
    }
    Ok(url)
}

/// `content-type` -> `Content-Type`, `x-session-id` -> `X-Session-Id`.
pub fn canonical_header_key(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for ch in name.chars() {
        if upper {
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
        upper = ch == '-';
    }
    out
}

/// Name and value of a `Set-Cookie` header; attributes are ignored.
pub fn parse_set_cookie(header: &str) -> Option<Cookie> {
    let pair = header.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let value = value.trim().trim_matches('"');
    Some(Cookie::new(name, value))
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        return TransportError::Timeout;
    }
    if e.is_connect() || e.is_request() {
        return TransportError::Network(e.to_string());
    }
    TransportError::Other(e.to_string())
}
