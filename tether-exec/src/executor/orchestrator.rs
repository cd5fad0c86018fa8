use std::sync::Arc;

use futures_util::future::BoxFuture;
use tether_core::types::{PreRequest, Request, RequestKind};
use tether_store::{EnvironmentStore, RequestStore};
use tracing::debug;

use crate::executor::chain::SendChain;
use crate::executor::config::OrchestratorConfig;
use crate::executor::error::{Entity, SendError};
use crate::executor::events::{Event, EventSink, NoOpEventSink};
use crate::executor::response::Response;
use crate::jsonpath::{JsonPathEvaluator, SerdeJsonPathEvaluator};
use crate::script::ScriptRegistry;
use crate::transport::{HttpTransport, RpcTransport};

/// Sends saved requests and runs their pre- and post-request hooks.
pub struct Orchestrator {
    pub(crate) config: OrchestratorConfig,
    pub(crate) requests: Arc<dyn RequestStore>,
    pub(crate) environments: Arc<dyn EnvironmentStore>,
    pub(crate) http: Arc<dyn HttpTransport>,
    pub(crate) rpc: Arc<dyn RpcTransport>,
    pub(crate) scripts: ScriptRegistry,
    pub(crate) evaluator: Arc<dyn JsonPathEvaluator>,
    pub(crate) event_sink: Arc<dyn EventSink>,
}

impl Orchestrator {
    pub fn new(
        config: OrchestratorConfig,
        requests: Arc<dyn RequestStore>,
        environments: Arc<dyn EnvironmentStore>,
        http: Arc<dyn HttpTransport>,
        rpc: Arc<dyn RpcTransport>,
    ) -> Self {
        Self {
            config,
            requests,
            environments,
            http,
            rpc,
            scripts: ScriptRegistry::default(),
            evaluator: Arc::new(SerdeJsonPathEvaluator),
            event_sink: Arc::new(NoOpEventSink),
        }
    }

    pub fn with_scripts(mut self, scripts: ScriptRegistry) -> Self {
        self.scripts = scripts;
        self
    }

    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    pub fn with_evaluator(mut self, evaluator: Arc<dyn JsonPathEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Sends `request_id`, running any trigger chain first.
    ///
    /// An empty `environment_id` means no environment: binding rules and
    /// script updates are skipped. A non-empty id is resolved only after the
    /// transport call has been made, so an unknown environment still lets the
    /// request go out before `NotFound` is returned.
    pub async fn send(&self, request_id: &str, environment_id: &str) -> Result<Response, SendError> {
        let mut chain = SendChain::default();
        let result = self.send_in_chain(request_id, environment_id, &mut chain).await;
        if let Err(err) = &result {
            self.event_sink
                .emit(Event::SendFailed {
                    request_id: request_id.to_string(),
                    error: err.to_string(),
                })
                .await;
        }
        result
    }

    fn send_in_chain<'a>(
        &'a self,
        request_id: &'a str,
        environment_id: &'a str,
        chain: &'a mut SendChain,
    ) -> BoxFuture<'a, Result<Response, SendError>> {
        Box::pin(async move {
            let request = self
                .requests
                .get_request(request_id)
                .await
                .ok_or_else(|| SendError::not_found(Entity::Request, request_id))?;

            chain.enter(request_id, self.config.max_chain_depth)?;
            let result = self.send_resolved(&request, environment_id, chain).await;
            chain.leave();
            result
        })
    }

    async fn send_resolved(
        &self,
        request: &Request,
        environment_id: &str,
        chain: &mut SendChain,
    ) -> Result<Response, SendError> {
        let request_id = request.id();
        self.event_sink
            .emit(Event::SendStarted {
                request_id: request_id.to_string(),
                kind: request.kind(),
                depth: chain.depth(),
            })
            .await;

        self.run_pre_request(request, environment_id, chain).await?;

        let response = match request.kind() {
            RequestKind::Http => Response::Http(self.http.send_request(request_id, environment_id).await?),
            RequestKind::Rpc => Response::Rpc(self.rpc.invoke(request_id, environment_id).await?),
        };
        self.event_sink
            .emit(Event::ResponseReceived {
                request_id: request_id.to_string(),
                kind: response.kind(),
                status_code: response.status_code(),
                elapsed_ms: u64::try_from(response.elapsed().as_millis()).unwrap_or(u64::MAX),
            })
            .await;

        let environment = if environment_id.is_empty() {
            None
        } else {
            Some(
                self.environments
                    .get_environment(environment_id)
                    .await
                    .ok_or_else(|| SendError::not_found(Entity::Environment, environment_id))?,
            )
        };

        match self.run_post_request(request, &response, environment).await {
            Ok(()) => Ok(response),
            Err(error) => Err(SendError::PostRequest {
                response: Box::new(response),
                error,
            }),
        }
    }

    async fn run_pre_request(
        &self,
        request: &Request,
        environment_id: &str,
        chain: &mut SendChain,
    ) -> Result<(), SendError> {
        let pre = request.spec.pre_request();
        match pre {
            PreRequest::TriggerRequest { .. } => {
                let Some(target) = pre.trigger_target() else {
                    return Ok(());
                };
                self.event_sink
                    .emit(Event::PreRequestTriggered {
                        request_id: request.id().to_string(),
                        target_id: target.to_string(),
                    })
                    .await;
                // Only the error matters; the triggered response is dropped.
                self.send_in_chain(target, environment_id, chain).await?;
            }
            PreRequest::Script { language, .. } => {
                debug!(
                    request_id = request.id(),
                    language = language.as_str(),
                    "pre-request scripts are not executed"
                );
            }
            PreRequest::None => {}
        }
        Ok(())
    }
}
