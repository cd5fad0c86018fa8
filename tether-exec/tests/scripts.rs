mod support;

use std::sync::Arc;

use serde_json::json;
use tether_core::types::{PostRequest, PreRequest, RequestSpec, ScriptLanguage};
use tether_exec::executor::{HookError, OrchestratorConfig, ScriptingConfig, SendError};
use tether_exec::script::{ScriptError, ScriptRegistry, ScriptRunner};
use tether_store::UpdateSource;

use support::*;

fn scripting_enabled() -> OrchestratorConfig {
    OrchestratorConfig {
        scripting: ScriptingConfig {
            enabled: true,
            ..ScriptingConfig::default()
        },
        ..OrchestratorConfig::default()
    }
}

fn post_script(id: &str) -> tether_core::types::Request {
    with_post(
        http_request(id),
        PostRequest::Script {
            language: ScriptLanguage::Python,
            script: "set_env('TOKEN', response.json()['token'])".to_string(),
        },
    )
}

fn registry_with(runner: Arc<MockScriptRunner>) -> ScriptRegistry {
    let mut registry = ScriptRegistry::new();
    registry.register(runner).unwrap();
    registry
}

#[tokio::test]
async fn script_updates_apply_only_strings() {
    let fx = Fixture::new(
        vec![post_script("login")],
        vec![environment("dev", &[("SESSION", "keep")])],
    )
    .await;
    let runner = Arc::new(MockScriptRunner::returning(json!({
        "SESSION": 42,
        "TOKEN": "abc",
        "NESTED": {"a": "b"}
    })));
    let orch = fx
        .orchestrator(scripting_enabled(), vec![("login", json_response(200, "{}"))], vec![])
        .with_scripts(registry_with(runner.clone()));

    orch.send("login", "dev").await.unwrap();

    assert_eq!(fx.env_value("dev", "SESSION").await.as_deref(), Some("keep"));
    assert_eq!(fx.env_value("dev", "TOKEN").await.as_deref(), Some("abc"));
    assert_eq!(fx.env_value("dev", "NESTED").await, None);
    assert_eq!(fx.envs.updates.lock().await.clone(), vec![UpdateSource::Script]);
}

#[tokio::test]
async fn non_string_only_result_does_not_persist() {
    let fx = Fixture::new(vec![post_script("login")], vec![environment("dev", &[])]).await;
    let runner = Arc::new(MockScriptRunner::returning(json!({ "SESSION": 42 })));
    let orch = fx
        .orchestrator(scripting_enabled(), vec![("login", json_response(200, "{}"))], vec![])
        .with_scripts(registry_with(runner));

    orch.send("login", "dev").await.unwrap();

    assert_eq!(fx.env_value("dev", "SESSION").await, None);
    assert_eq!(fx.envs.update_count().await, 0);
}

#[tokio::test]
async fn script_sees_request_response_and_environment() {
    let fx = Fixture::new(
        vec![post_script("login")],
        vec![environment("dev", &[("BASE", "https://api.test")])],
    )
    .await;
    let runner = Arc::new(MockScriptRunner::returning(json!({})));
    let orch = fx
        .orchestrator(
            scripting_enabled(),
            vec![("login", json_response(201, r#"{"token":"t"}"#))],
            vec![],
        )
        .with_scripts(registry_with(runner.clone()));

    orch.send("login", "dev").await.unwrap();

    let seen = runner.seen.lock().await;
    assert_eq!(seen.len(), 1);
    let (script, params) = &seen[0];
    assert!(script.contains("set_env"));
    let env = params.env.as_ref().unwrap();
    assert_eq!(env.get("BASE"), Some("https://api.test"));
    let req = params.req.as_ref().unwrap();
    assert_eq!(req.url, "https://api.test/login");
    let res = params.res.as_ref().unwrap();
    assert_eq!(res.status_code, 201);
    assert_eq!(res.body, r#"{"token":"t"}"#);
}

#[tokio::test]
async fn disabled_scripting_skips_the_script() {
    let fx = Fixture::new(vec![post_script("login")], vec![environment("dev", &[])]).await;
    let runner = Arc::new(MockScriptRunner::returning(json!({ "TOKEN": "abc" })));
    let orch = fx
        .orchestrator(
            OrchestratorConfig::default(),
            vec![("login", json_response(200, "{}"))],
            vec![],
        )
        .with_scripts(registry_with(runner.clone()));

    orch.send("login", "dev").await.unwrap();

    assert!(runner.seen.lock().await.is_empty());
    assert_eq!(fx.env_value("dev", "TOKEN").await, None);
}

#[tokio::test]
async fn missing_runner_is_an_error() {
    let fx = Fixture::new(vec![post_script("login")], vec![environment("dev", &[])]).await;
    let orch = fx.orchestrator(
        scripting_enabled(),
        vec![("login", json_response(200, "{}"))],
        vec![],
    );

    let err = orch.send("login", "dev").await.unwrap_err();

    assert!(matches!(
        err,
        SendError::PostRequest {
            error: HookError::Script(ScriptError::RunnerUnavailable(ScriptLanguage::Python)),
            ..
        }
    ));
}

#[tokio::test]
async fn runner_failure_is_an_error() {
    let fx = Fixture::new(vec![post_script("login")], vec![environment("dev", &[])]).await;
    let runner = Arc::new(MockScriptRunner {
        result: Err(ScriptError::Runtime("boom".to_string())),
        seen: Default::default(),
    });
    let orch = fx
        .orchestrator(scripting_enabled(), vec![("login", json_response(200, "{}"))], vec![])
        .with_scripts(registry_with(runner));

    let err = orch.send("login", "dev").await.unwrap_err();

    assert!(err.to_string().contains("boom"));
    assert!(err.response().is_some());
}

#[tokio::test]
async fn script_without_environment_changes_nothing() {
    let fx = Fixture::new(vec![post_script("login")], vec![]).await;
    let runner = Arc::new(MockScriptRunner::returning(json!({ "TOKEN": "abc" })));
    let orch = fx
        .orchestrator(scripting_enabled(), vec![("login", json_response(200, "{}"))], vec![])
        .with_scripts(registry_with(runner.clone()));

    orch.send("login", "").await.unwrap();

    assert_eq!(runner.seen.lock().await.len(), 1);
    assert_eq!(fx.envs.update_count().await, 0);
}

#[tokio::test]
async fn pre_request_script_is_not_run() {
    let mut req = http_request("main");
    if let RequestSpec::Http(spec) = &mut req.spec {
        spec.pre_request = PreRequest::Script {
            language: ScriptLanguage::Python,
            script: "print('pre')".to_string(),
        };
    }
    let fx = Fixture::new(vec![req], vec![]).await;
    let runner = Arc::new(MockScriptRunner::returning(json!({})));
    let orch = fx
        .orchestrator(scripting_enabled(), vec![("main", json_response(200, "{}"))], vec![])
        .with_scripts(registry_with(runner.clone()));

    orch.send("main", "").await.unwrap();

    assert!(runner.seen.lock().await.is_empty());
    assert_eq!(fx.calls().await, vec!["http:main@"]);
}

#[test]
fn registry_rejects_duplicate_language() {
    let mut registry = ScriptRegistry::new();
    registry
        .register(Arc::new(MockScriptRunner::returning(json!({}))))
        .unwrap();
    let err = registry
        .register(Arc::new(MockScriptRunner::returning(json!({}))))
        .unwrap_err();
    assert!(matches!(err, ScriptError::AlreadyRegistered(ScriptLanguage::Python)));
}

#[test]
fn registry_lookup_by_name() {
    let registry = registry_with(Arc::new(MockScriptRunner::returning(json!({}))));

    let runner = registry.get_plugin_by_name("Python").unwrap();
    assert_eq!(runner.language(), ScriptLanguage::Python);
    assert!(matches!(
        registry.get_plugin_by_name("ruby"),
        Err(ScriptError::UnknownLanguage(ref name)) if name == "ruby"
    ));
    assert!(matches!(
        ScriptRegistry::new().get_plugin_by_name("python"),
        Err(ScriptError::RunnerUnavailable(ScriptLanguage::Python))
    ));
}
