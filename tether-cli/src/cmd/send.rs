use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tether_exec::executor::{
    CompositeEventSink, EventSink, Orchestrator, Response, SendError, StdoutEventSink,
    TracingEventSink,
};
use tether_exec::script::{HttpScriptRunner, ScriptRegistry};
use tether_exec::transport::{ReqwestHttpTransport, UnsupportedRpcTransport};
use tether_store::YamlWorkspaceStore;

use crate::cmd::config::{build_orchestrator_config, load_workspace_config};
use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{OrchestratorArgs, OutputArgs, WorkspaceArgs};

#[derive(Serialize)]
struct SendSummary {
    request_id: String,
    kind: String,
    status_code: i32,
    elapsed_ms: u64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    headers: BTreeMap<String, String>,
    body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl SendSummary {
    fn new(request_id: &str, response: &Response, error: Option<String>) -> Self {
        let headers = match response {
            Response::Http(r) => r.headers.clone(),
            Response::Rpc(r) => r
                .metadata
                .iter()
                .map(|m| (m.key.clone(), m.value.clone()))
                .collect(),
        };
        Self {
            request_id: request_id.to_string(),
            kind: response.kind().to_string(),
            status_code: response.status_code(),
            elapsed_ms: u64::try_from(response.elapsed().as_millis()).unwrap_or(u64::MAX),
            headers,
            body: response.body().to_string(),
            error,
        }
    }
}

pub async fn send_cmd(
    request_id: &str,
    env: Option<&str>,
    events: bool,
    workspace: WorkspaceArgs,
    args: OrchestratorArgs,
    output: OutputArgs,
) -> i32 {
    let file = match load_workspace_config(&workspace.workspace) {
        Ok(f) => f,
        Err(e) => {
            print_error(output.format, output.quiet, &e);
            return exit_codes::RUNTIME_ERROR;
        }
    };
    let config = build_orchestrator_config(&file, &args);

    let store = match YamlWorkspaceStore::open(&workspace.workspace).await {
        Ok(s) => Arc::new(s),
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let http = match ReqwestHttpTransport::new(store.clone(), store.clone()) {
        Ok(t) => t.with_timeout(Duration::from_millis(args.timeout)),
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let mut scripts = ScriptRegistry::new();
    if config.scripting.enabled {
        let registered = HttpScriptRunner::from_config(&config.scripting)
            .and_then(|runner| scripts.register(Arc::new(runner)));
        if let Err(e) = registered {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::RUNTIME_ERROR;
        }
    }

    let mut sink = CompositeEventSink::new().with(Arc::new(TracingEventSink));
    if events {
        sink.add(Arc::new(StdoutEventSink));
    }
    let sink: Arc<dyn EventSink> = Arc::new(sink);

    let orchestrator = Orchestrator::new(
        config,
        store.clone(),
        store,
        Arc::new(http),
        Arc::new(UnsupportedRpcTransport),
    )
    .with_scripts(scripts)
    .with_event_sink(sink);

    match orchestrator.send(request_id, env.unwrap_or_default()).await {
        Ok(response) => {
            report(request_id, &response, None, &output);
            exit_codes::SUCCESS
        }
        Err(SendError::PostRequest { response, error }) => {
            report(request_id, &response, Some(error.to_string()), &output);
            print_error(output.format, output.quiet, &format!("post-request hook failed: {error}"));
            exit_codes::SEND_FAILED
        }
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            exit_codes::SEND_FAILED
        }
    }
}

fn report(request_id: &str, response: &Response, error: Option<String>, output: &OutputArgs) {
    if output.quiet {
        return;
    }
    if output.format == OutputFormat::Text {
        println!(
            "{} {} ({} ms)",
            response.kind().as_str().to_uppercase(),
            response.status_code(),
            response.elapsed().as_millis()
        );
        if !response.body().is_empty() {
            println!("{}", response.body());
        }
        return;
    }
    print_result(output.format, output.quiet, &SendSummary::new(request_id, response, error));
}
