use tether_core::types::{Environment, PostRequest, PostRequestSet, Request, RequestKind, ScriptLanguage};
use tether_store::UpdateSource;
use tracing::{debug, info, warn};

use crate::executor::error::HookError;
use crate::executor::events::Event;
use crate::executor::orchestrator::Orchestrator;
use crate::executor::response::Response;
use crate::extract::{extract_static, extract_variables, Binding, ResponseView};
use crate::script::{ExecParams, RequestData, ScriptError};

fn service_source(kind: RequestKind) -> UpdateSource {
    match kind {
        RequestKind::Http => UpdateSource::HttpService,
        RequestKind::Rpc => UpdateSource::RpcService,
    }
}

impl Orchestrator {
    /// Binding rules first, then the script or static `setEnv` hook.
    pub(crate) async fn run_post_request(
        &self,
        request: &Request,
        response: &Response,
        mut environment: Option<Environment>,
    ) -> Result<(), HookError> {
        // A transport answering with the other kind breaks its contract.
        if request.kind() != response.kind() {
            return Err(HookError::TypeMismatch {
                expected: request.kind(),
                actual: response.kind(),
            });
        }

        let view = response.view();
        self.apply_variables(request, &view, environment.as_mut()).await?;

        match request.spec.post_request() {
            PostRequest::None => Ok(()),
            PostRequest::SetEnvFromResponse(set) => {
                self.apply_static(request, set, &view, environment.as_mut()).await
            }
            PostRequest::Script { language, script } => {
                self.run_post_script(request, response, *language, script, environment.as_mut())
                    .await
            }
        }
    }

    async fn apply_variables(
        &self,
        request: &Request,
        view: &ResponseView,
        environment: Option<&mut Environment>,
    ) -> Result<(), HookError> {
        let rules = request.spec.variables();
        if rules.is_empty() {
            return Ok(());
        }
        let Some(env) = environment else {
            debug!(request_id = request.id(), "no active environment, binding rules skipped");
            return Ok(());
        };

        let bindings = extract_variables(rules, view, self.evaluator.clone())
            .await
            .map_err(|e| HookError::Extraction {
                target: e.target,
                source: e.source,
            })?;
        self.persist(request, env, bindings, service_source(request.kind()))
            .await
    }

    async fn apply_static(
        &self,
        request: &Request,
        set: &PostRequestSet,
        view: &ResponseView,
        environment: Option<&mut Environment>,
    ) -> Result<(), HookError> {
        let binding = extract_static(set, view, self.evaluator.as_ref()).map_err(|source| {
            HookError::Extraction {
                target: set.target.clone(),
                source,
            }
        })?;
        let Some(binding) = binding else {
            return Ok(());
        };
        let Some(env) = environment else {
            warn!(request_id = request.id(), target = %set.target, "setEnv hook has no active environment");
            return Ok(());
        };
        self.persist(request, env, vec![binding], service_source(request.kind()))
            .await
    }

    async fn run_post_script(
        &self,
        request: &Request,
        response: &Response,
        language: ScriptLanguage,
        script: &str,
        environment: Option<&mut Environment>,
    ) -> Result<(), HookError> {
        if !self.config.scripting.enabled {
            warn!(
                request_id = request.id(),
                language = language.as_str(),
                "scripting is disabled, post-request script skipped"
            );
            return Ok(());
        }
        let runner = self
            .scripts
            .get_plugin(language)
            .ok_or(ScriptError::RunnerUnavailable(language))?;

        let params = ExecParams {
            env: environment.as_deref().cloned(),
            req: Some(RequestData::from_request(request)),
            res: Some(response.script_data()),
        };
        let script = script.to_string();
        // Spawned so that dropping the send future does not cancel the script.
        let handle =
            tokio::spawn(async move { runner.execute_post_response_script(&script, params).await });
        let result = handle
            .await
            .map_err(|e| ScriptError::Aborted(e.to_string()))??;

        for line in &result.prints {
            info!(request_id = request.id(), "{line}");
        }
        self.event_sink
            .emit(Event::ScriptExecuted {
                request_id: request.id().to_string(),
                language,
                prints: result.prints.len(),
            })
            .await;

        let bindings: Vec<Binding> = result
            .string_updates()
            .map(|(k, v)| Binding {
                target: k.to_string(),
                value: v.to_string(),
            })
            .collect();
        if bindings.is_empty() {
            return Ok(());
        }
        let Some(env) = environment else {
            warn!(request_id = request.id(), "script set variables but there is no active environment");
            return Ok(());
        };
        self.persist(request, env, bindings, UpdateSource::Script).await
    }

    /// Applies `bindings` in order and persists them with a single store write.
    async fn persist(
        &self,
        request: &Request,
        env: &mut Environment,
        bindings: Vec<Binding>,
        source: UpdateSource,
    ) -> Result<(), HookError> {
        if bindings.is_empty() {
            return Ok(());
        }
        let mut keys = Vec::with_capacity(bindings.len());
        for binding in bindings {
            env.set_key(&binding.target, binding.value);
            keys.push(binding.target);
        }
        self.environments
            .update_environment(env, source, true)
            .await?;

        self.event_sink
            .emit(Event::VariablesApplied {
                request_id: request.id().to_string(),
                environment_id: env.id().to_string(),
                keys,
                source,
            })
            .await;
        Ok(())
    }
}
