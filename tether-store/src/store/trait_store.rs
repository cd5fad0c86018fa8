use async_trait::async_trait;
use tether_core::types::{Environment, Request, RequestMeta};

use crate::store::types::{StoreError, UpdateSource};

#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Absence is not an error; callers decide what a missing request means.
    async fn get_request(&self, id: &str) -> Option<Request>;

    async fn list_requests(&self) -> Vec<RequestMeta>;
}

#[async_trait]
pub trait EnvironmentStore: Send + Sync {
    /// Returns a snapshot of the environment; mutate it with
    /// [`Environment::set_key`] and hand it back through `update_environment`.
    async fn get_environment(&self, id: &str) -> Option<Environment>;

    async fn list_environments(&self) -> Vec<Environment>;

    /// Replaces the stored environment with `env`. With `immediate` the change
    /// is written through to backing storage before returning.
    async fn update_environment(
        &self,
        env: &Environment,
        source: UpdateSource,
        immediate: bool,
    ) -> Result<(), StoreError>;
}
