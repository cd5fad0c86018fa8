use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tether_core::types::{RequestKind, ScriptLanguage};
use tether_store::UpdateSource;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SendStarted {
        request_id: String,
        kind: RequestKind,
        depth: usize,
    },
    PreRequestTriggered {
        request_id: String,
        target_id: String,
    },
    ResponseReceived {
        request_id: String,
        kind: RequestKind,
        status_code: i32,
        elapsed_ms: u64,
    },
    VariablesApplied {
        request_id: String,
        environment_id: String,
        keys: Vec<String>,
        source: UpdateSource,
    },
    ScriptExecuted {
        request_id: String,
        language: ScriptLanguage,
        prints: usize,
    },
    SendFailed {
        request_id: String,
        error: String,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::SendStarted { .. } => "send.started",
            Event::PreRequestTriggered { .. } => "pre_request.triggered",
            Event::ResponseReceived { .. } => "response.received",
            Event::VariablesApplied { .. } => "variables.applied",
            Event::ScriptExecuted { .. } => "script.executed",
            Event::SendFailed { .. } => "send.failed",
        }
    }

    pub fn request_id(&self) -> &str {
        match self {
            Event::SendStarted { request_id, .. }
            | Event::PreRequestTriggered { request_id, .. }
            | Event::ResponseReceived { request_id, .. }
            | Event::VariablesApplied { request_id, .. }
            | Event::ScriptExecuted { request_id, .. }
            | Event::SendFailed { request_id, .. } => request_id,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut value = match self {
            Event::SendStarted { request_id, kind, depth } => {
                json!({ "request_id": request_id, "kind": kind.to_string(), "depth": depth })
            }
            Event::PreRequestTriggered { request_id, target_id } => {
                json!({ "request_id": request_id, "target_id": target_id })
            }
            Event::ResponseReceived { request_id, kind, status_code, elapsed_ms } => {
                json!({
                    "request_id": request_id,
                    "kind": kind.to_string(),
                    "status_code": status_code,
                    "elapsed_ms": elapsed_ms
                })
            }
            Event::VariablesApplied { request_id, environment_id, keys, source } => {
                json!({
                    "request_id": request_id,
                    "environment_id": environment_id,
                    "keys": keys,
                    "source": source.as_str()
                })
            }
            Event::ScriptExecuted { request_id, language, prints } => {
                json!({ "request_id": request_id, "language": language.as_str(), "prints": prints })
            }
            Event::SendFailed { request_id, error } => {
                json!({ "request_id": request_id, "error": error })
            }
        };
        if let Some(obj) = value.as_object_mut() {
            obj.insert("type".to_string(), json!(self.name()));
        }
        value
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

pub struct CompositeEventSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl Default for CompositeEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn with(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.add(sink);
        self
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: Event) {
        for sink in &self.sinks {
            sink.emit(event.clone()).await;
        }
    }
}

/// Logs every event through `tracing`; failures at `warn`, the rest at `debug`.
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, event: Event) {
        let payload = event.to_json();
        match &event {
            Event::SendFailed { request_id, error } => {
                tracing::warn!(request_id = %request_id, error = %error, "send failed");
            }
            _ => {
                tracing::debug!(
                    event = event.name(),
                    request_id = event.request_id(),
                    payload = %payload,
                    "send event"
                );
            }
        }
    }
}

/// Writes one JSON object per event to stdout.
pub struct StdoutEventSink;

#[async_trait]
impl EventSink for StdoutEventSink {
    async fn emit(&self, event: Event) {
        let mut json = event.to_json();
        if let Some(obj) = json.as_object_mut() {
            obj.insert("ts".to_string(), json!(chrono::Utc::now().to_rfc3339()));
        }
        println!("{}", serde_json::to_string(&json).unwrap_or_default());
    }
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {
    }
}
