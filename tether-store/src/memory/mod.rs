use std::collections::BTreeMap;

use async_trait::async_trait;
use tether_core::types::{Environment, Request, RequestMeta};
use tokio::sync::RwLock;

use crate::store::{EnvironmentStore, RequestStore, StoreError, UpdateSource};

/// Keeps requests and environments in memory only.
#[derive(Default)]
pub struct MemoryStore {
    requests: RwLock<BTreeMap<String, Request>>,
    environments: RwLock<BTreeMap<String, Environment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_request(&self, req: Request) {
        self.requests.write().await.insert(req.meta.id.clone(), req);
    }

    pub async fn insert_environment(&self, env: Environment) {
        self.environments.write().await.insert(env.meta.id.clone(), env);
    }

    pub async fn remove_environment(&self, id: &str) -> Option<Environment> {
        self.environments.write().await.remove(id)
    }
}

#[async_trait]
impl RequestStore for MemoryStore {
    async fn get_request(&self, id: &str) -> Option<Request> {
        self.requests.read().await.get(id).cloned()
    }

    async fn list_requests(&self) -> Vec<RequestMeta> {
        self.requests
            .read()
            .await
            .values()
            .map(|r| r.meta.clone())
            .collect()
    }
}

#[async_trait]
impl EnvironmentStore for MemoryStore {
    async fn get_environment(&self, id: &str) -> Option<Environment> {
        self.environments.read().await.get(id).cloned()
    }

    async fn list_environments(&self) -> Vec<Environment> {
        self.environments.read().await.values().cloned().collect()
    }

    async fn update_environment(
        &self,
        env: &Environment,
        _source: UpdateSource,
        _immediate: bool,
    ) -> Result<(), StoreError> {
        let mut envs = self.environments.write().await;
        match envs.get_mut(env.id()) {
            Some(slot) => {
                *slot = env.clone();
                Ok(())
            }
            None => Err(StoreError::environment_not_found(env.id())),
        }
    }
}
