#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tether_core::types::{
    Environment, HttpRequestSpec, PostRequest, PreRequest, Request, RequestMeta, RequestSpec,
    RpcRequestSpec, ScriptLanguage, Variable, VariableSource,
};
use tether_exec::executor::{Event, EventSink, Orchestrator, OrchestratorConfig};
use tether_exec::script::{ExecParams, ExecResult, ScriptError, ScriptRunner};
use tether_exec::transport::{
    HttpResponse, HttpTransport, RpcResponse, RpcTransport, TransportError,
};
use tether_store::{EnvironmentStore, MemoryStore, StoreError, UpdateSource};

/// Shared call log so tests can assert ordering across transports.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub struct MockHttp {
    pub responses: BTreeMap<String, HttpResponse>,
    pub calls: CallLog,
}

#[async_trait]
impl HttpTransport for MockHttp {
    async fn send_request(
        &self,
        request_id: &str,
        environment_id: &str,
    ) -> Result<HttpResponse, TransportError> {
        self.calls
            .lock()
            .await
            .push(format!("http:{request_id}@{environment_id}"));
        self.responses
            .get(request_id)
            .cloned()
            .ok_or_else(|| TransportError::Network(format!("no route to {request_id}")))
    }
}

pub struct MockRpc {
    pub responses: BTreeMap<String, RpcResponse>,
    pub calls: CallLog,
}

#[async_trait]
impl RpcTransport for MockRpc {
    async fn invoke(
        &self,
        request_id: &str,
        environment_id: &str,
    ) -> Result<RpcResponse, TransportError> {
        self.calls
            .lock()
            .await
            .push(format!("rpc:{request_id}@{environment_id}"));
        self.responses
            .get(request_id)
            .cloned()
            .ok_or_else(|| TransportError::Network(format!("no route to {request_id}")))
    }
}

/// Wraps a [`MemoryStore`] and records every persist call.
pub struct RecordingEnvStore {
    pub inner: Arc<MemoryStore>,
    pub updates: Mutex<Vec<UpdateSource>>,
    pub fail: bool,
}

impl RecordingEnvStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            updates: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub async fn update_count(&self) -> usize {
        self.updates.lock().await.len()
    }
}

#[async_trait]
impl EnvironmentStore for RecordingEnvStore {
    async fn get_environment(&self, id: &str) -> Option<Environment> {
        self.inner.get_environment(id).await
    }

    async fn list_environments(&self) -> Vec<Environment> {
        self.inner.list_environments().await
    }

    async fn update_environment(
        &self,
        env: &Environment,
        source: UpdateSource,
        immediate: bool,
    ) -> Result<(), StoreError> {
        self.updates.lock().await.push(source);
        if self.fail {
            return Err(StoreError::Other("disk full".to_string()));
        }
        self.inner.update_environment(env, source, immediate).await
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub async fn names(&self) -> Vec<&'static str> {
        self.events.lock().await.iter().map(|e| e.name()).collect()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn emit(&self, event: Event) {
        self.events.lock().await.push(event);
    }
}

pub struct MockScriptRunner {
    pub result: Result<ExecResult, ScriptError>,
    pub seen: Mutex<Vec<(String, ExecParams)>>,
}

impl MockScriptRunner {
    pub fn returning(set_environments: serde_json::Value) -> Self {
        let set_environments = match set_environments {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        Self {
            result: Ok(ExecResult {
                req: None,
                set_environments,
                prints: vec!["hello from script".to_string()],
            }),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ScriptRunner for MockScriptRunner {
    fn language(&self) -> ScriptLanguage {
        ScriptLanguage::Python
    }

    async fn execute_pre_request_script(
        &self,
        script: &str,
        params: ExecParams,
    ) -> Result<ExecResult, ScriptError> {
        self.execute_post_response_script(script, params).await
    }

    async fn execute_post_response_script(
        &self,
        script: &str,
        params: ExecParams,
    ) -> Result<ExecResult, ScriptError> {
        self.seen.lock().await.push((script.to_string(), params));
        self.result.clone()
    }
}

pub fn http_request(id: &str) -> Request {
    Request {
        meta: RequestMeta {
            id: id.to_string(),
            name: id.to_string(),
        },
        spec: RequestSpec::Http(HttpRequestSpec {
            method: "GET".to_string(),
            url: format!("https://api.test/{id}"),
            ..HttpRequestSpec::default()
        }),
    }
}

pub fn rpc_request(id: &str) -> Request {
    Request {
        meta: RequestMeta {
            id: id.to_string(),
            name: id.to_string(),
        },
        spec: RequestSpec::Rpc(RpcRequestSpec {
            address: "localhost:50051".to_string(),
            method: "svc.Service/Call".to_string(),
            ..RpcRequestSpec::default()
        }),
    }
}

pub fn with_trigger(mut req: Request, target: &str) -> Request {
    let pre = PreRequest::TriggerRequest {
        request_id: target.to_string(),
    };
    match &mut req.spec {
        RequestSpec::Http(s) => s.pre_request = pre,
        RequestSpec::Rpc(s) => s.pre_request = pre,
    }
    req
}

pub fn with_post(mut req: Request, post: PostRequest) -> Request {
    match &mut req.spec {
        RequestSpec::Http(s) => s.post_request = post,
        RequestSpec::Rpc(s) => s.post_request = post,
    }
    req
}

pub fn with_variables(mut req: Request, rules: Vec<Variable>) -> Request {
    match &mut req.spec {
        RequestSpec::Http(s) => s.variables = rules,
        RequestSpec::Rpc(s) => s.variables = rules,
    }
    req
}

pub fn body_rule(target: &str, json_path: &str, status: i32) -> Variable {
    Variable {
        id: format!("rule-{target}"),
        target_env_variable: target.to_string(),
        from: VariableSource::Body,
        source_key: String::new(),
        on_status_code: status,
        json_path: json_path.to_string(),
        enable: true,
    }
}

pub fn keyed_rule(target: &str, from: VariableSource, key: &str, status: i32) -> Variable {
    Variable {
        id: format!("rule-{target}"),
        target_env_variable: target.to_string(),
        from,
        source_key: key.to_string(),
        on_status_code: status,
        json_path: String::new(),
        enable: true,
    }
}

pub fn json_response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status_code: status,
        body: body.to_string(),
        is_json: serde_json::from_str::<serde_json::Value>(body).is_ok(),
        ..HttpResponse::default()
    }
}

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub envs: Arc<RecordingEnvStore>,
    pub calls: CallLog,
    pub sink: Arc<RecordingSink>,
}

impl Fixture {
    pub async fn new(requests: Vec<Request>, environments: Vec<Environment>) -> Self {
        let store = Arc::new(MemoryStore::new());
        for req in requests {
            store.insert_request(req).await;
        }
        for env in environments {
            store.insert_environment(env).await;
        }
        Self {
            envs: Arc::new(RecordingEnvStore::new(store.clone())),
            store,
            calls: Arc::new(Mutex::new(Vec::new())),
            sink: Arc::new(RecordingSink::default()),
        }
    }

    pub fn failing_persistence(mut self) -> Self {
        self.envs = Arc::new(RecordingEnvStore {
            inner: self.store.clone(),
            updates: Mutex::new(Vec::new()),
            fail: true,
        });
        self
    }

    pub fn orchestrator(
        &self,
        config: OrchestratorConfig,
        http: Vec<(&str, HttpResponse)>,
        rpc: Vec<(&str, RpcResponse)>,
    ) -> Orchestrator {
        let http = MockHttp {
            responses: http.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            calls: self.calls.clone(),
        };
        let rpc = MockRpc {
            responses: rpc.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            calls: self.calls.clone(),
        };
        Orchestrator::new(
            config,
            self.store.clone(),
            self.envs.clone(),
            Arc::new(http),
            Arc::new(rpc),
        )
        .with_event_sink(self.sink.clone())
    }

    pub async fn env_value(&self, env_id: &str, key: &str) -> Option<String> {
        self.store
            .get_environment(env_id)
            .await
            .and_then(|env| env.get(key).map(str::to_string))
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

pub fn environment(id: &str, values: &[(&str, &str)]) -> Environment {
    let mut env = Environment::with_id(id, id);
    for (k, v) in values {
        env.set_key(k, *v);
    }
    env
}
