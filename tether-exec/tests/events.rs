mod support;

use std::sync::Arc;

use tether_core::types::RequestKind;
use tether_exec::executor::{CompositeEventSink, Event, EventSink, OrchestratorConfig};
use tether_store::UpdateSource;

use support::*;

#[tokio::test]
async fn send_emits_lifecycle_in_order() {
    let login = with_variables(http_request("login"), vec![body_rule("TOKEN", "$.t", 200)]);
    let fx = Fixture::new(
        vec![with_trigger(http_request("main"), "login"), login],
        vec![environment("dev", &[])],
    )
    .await;
    let orch = fx.orchestrator(
        OrchestratorConfig::default(),
        vec![
            ("main", json_response(200, "{}")),
            ("login", json_response(200, r#"{"t":"x"}"#)),
        ],
        vec![],
    );

    orch.send("main", "dev").await.unwrap();

    assert_eq!(
        fx.sink.names().await,
        vec![
            "send.started",
            "pre_request.triggered",
            "send.started",
            "response.received",
            "variables.applied",
            "response.received",
        ]
    );
    let events = fx.sink.events.lock().await;
    assert!(matches!(
        &events[2],
        Event::SendStarted { request_id, kind: RequestKind::Http, depth: 1 } if request_id == "login"
    ));
    assert!(matches!(
        &events[4],
        Event::VariablesApplied { keys, source: UpdateSource::HttpService, .. } if keys == &vec!["TOKEN".to_string()]
    ));
}

#[tokio::test]
async fn failed_send_is_reported_once() {
    let fx = Fixture::new(vec![], vec![]).await;
    let orch = fx.orchestrator(OrchestratorConfig::default(), vec![], vec![]);

    let _ = orch.send("missing", "").await;

    let events = fx.sink.events.lock().await;
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        Event::SendFailed { request_id, error } if request_id == "missing" && error.contains("not found")
    ));
}

#[tokio::test]
async fn composite_sink_fans_out() {
    let a = Arc::new(RecordingSink::default());
    let b = Arc::new(RecordingSink::default());
    let sink = CompositeEventSink::new().with(a.clone()).with(b.clone());

    sink.emit(Event::SendFailed {
        request_id: "r".into(),
        error: "boom".into(),
    })
    .await;

    assert_eq!(a.names().await, vec!["send.failed"]);
    assert_eq!(b.names().await, vec!["send.failed"]);
}

#[test]
fn event_json_carries_type() {
    let json = Event::ResponseReceived {
        request_id: "r".into(),
        kind: RequestKind::Rpc,
        status_code: 0,
        elapsed_ms: 12,
    }
    .to_json();

    assert_eq!(json["type"], "response.received");
    assert_eq!(json["kind"], "rpc");
    assert_eq!(json["elapsed_ms"], 12);
}
