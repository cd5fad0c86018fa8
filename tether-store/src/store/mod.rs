mod trait_store;
mod types;

pub use trait_store::{EnvironmentStore, RequestStore};
pub use types::{StoreError, UpdateSource};
