use tether_core::types::{Environment, HttpRequestSpec, Request, RequestMeta, RequestSpec};
use tether_store::{EnvironmentStore, MemoryStore, RequestStore, StoreError, UpdateSource};

fn request(id: &str) -> Request {
    Request {
        meta: RequestMeta {
            id: id.to_string(),
            name: id.to_string(),
        },
        spec: RequestSpec::Http(HttpRequestSpec {
            url: "https://example.com".to_string(),
            ..Default::default()
        }),
    }
}

#[tokio::test]
async fn get_request_returns_none_when_missing() {
    let store = MemoryStore::new();
    store.insert_request(request("a")).await;

    assert!(store.get_request("a").await.is_some());
    assert!(store.get_request("b").await.is_none());
    assert_eq!(store.list_requests().await.len(), 1);
}

#[tokio::test]
async fn update_environment_replaces_snapshot() {
    let store = MemoryStore::new();
    store.insert_environment(Environment::with_id("dev", "Dev")).await;

    let mut env = store.get_environment("dev").await.unwrap();
    env.set_key("TOKEN", "t1");

    // In-memory mutation is not visible until it is handed back.
    assert_eq!(store.get_environment("dev").await.unwrap().get("TOKEN"), None);

    store
        .update_environment(&env, UpdateSource::HttpService, true)
        .await
        .unwrap();
    assert_eq!(store.get_environment("dev").await.unwrap().get("TOKEN"), Some("t1"));
}

#[tokio::test]
async fn update_unknown_environment_fails() {
    let store = MemoryStore::new();
    let env = Environment::with_id("ghost", "Ghost");

    let err = store
        .update_environment(&env, UpdateSource::Script, true)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "environment", .. }));
    assert_eq!(err.to_string(), "environment with id ghost not found");
}
