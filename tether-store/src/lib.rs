#![forbid(unsafe_code)]

pub mod memory;
pub mod store;
pub mod yaml;

pub use crate::memory::MemoryStore;
pub use crate::store::{EnvironmentStore, RequestStore, StoreError, UpdateSource};
pub use crate::yaml::YamlWorkspaceStore;
