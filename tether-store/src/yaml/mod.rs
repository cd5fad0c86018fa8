use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tether_core::types::{Environment, Request, RequestMeta};
use tether_core::{parse_str, DocumentFormat};
use tokio::sync::RwLock;

use crate::store::{EnvironmentStore, RequestStore, StoreError, UpdateSource};

pub const REQUESTS_DIR: &str = "requests";
pub const ENVIRONMENTS_DIR: &str = "environments";

struct Entry<T> {
    value: T,
    path: PathBuf,
    format: DocumentFormat,
}

/// A workspace directory holding `requests/*.yaml` and `environments/*.yaml`
/// (JSON files are accepted too). Everything is loaded on [`open`](Self::open);
/// environment updates are written back when `immediate` is set.
pub struct YamlWorkspaceStore {
    root: PathBuf,
    requests: RwLock<BTreeMap<String, Entry<Request>>>,
    environments: RwLock<BTreeMap<String, Entry<Environment>>>,
}

impl YamlWorkspaceStore {
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        let requests = load_dir::<Request>(&root.join(REQUESTS_DIR), |r| r.meta.id.clone()).await?;
        let environments =
            load_dir::<Environment>(&root.join(ENVIRONMENTS_DIR), |e| e.meta.id.clone()).await?;
        tracing::debug!(
            root = %root.display(),
            requests = requests.len(),
            environments = environments.len(),
            "workspace loaded"
        );
        Ok(Self {
            root,
            requests: RwLock::new(requests),
            environments: RwLock::new(environments),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

async fn load_dir<T: DeserializeOwned>(
    dir: &Path,
    id_of: impl Fn(&T) -> String,
) -> Result<BTreeMap<String, Entry<T>>, StoreError> {
    let mut out = BTreeMap::new();
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(e) => e,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(out),
        Err(e) => return Err(StoreError::io(dir, e)),
    };

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| StoreError::io(dir, e))? {
        let path = entry.path();
        let is_doc = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml" | "json")
        );
        if is_doc {
            paths.push(path);
        }
    }
    // Deterministic order so duplicate ids resolve the same way every time.
    paths.sort();

    for path in paths {
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| StoreError::io(&path, e))?;
        let parsed = parse_str::<T>(&raw, DocumentFormat::Auto).map_err(|source| StoreError::Parse {
            path: path.clone(),
            source,
        })?;
        let id = id_of(&parsed.document);
        if out.contains_key(&id) {
            tracing::warn!(id = %id, path = %path.display(), "duplicate id in workspace, keeping first");
            continue;
        }
        out.insert(
            id,
            Entry {
                value: parsed.document,
                path,
                format: parsed.format,
            },
        );
    }
    Ok(out)
}

/// Writes `env` back in the format its file was loaded from.
fn serialize(env: &Environment, format: DocumentFormat) -> Result<String, StoreError> {
    let written = match format {
        DocumentFormat::Json => serde_json::to_string_pretty(env)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| e.to_string()),
        DocumentFormat::Yaml | DocumentFormat::Auto => {
            serde_yaml::to_string(env).map_err(|e| e.to_string())
        }
    };
    written.map_err(|message| StoreError::Serialization {
        id: env.id().to_string(),
        message,
    })
}

#[async_trait]
impl RequestStore for YamlWorkspaceStore {
    async fn get_request(&self, id: &str) -> Option<Request> {
        self.requests.read().await.get(id).map(|e| e.value.clone())
    }

    async fn list_requests(&self) -> Vec<RequestMeta> {
        self.requests
            .read()
            .await
            .values()
            .map(|e| e.value.meta.clone())
            .collect()
    }
}

#[async_trait]
impl EnvironmentStore for YamlWorkspaceStore {
    async fn get_environment(&self, id: &str) -> Option<Environment> {
        self.environments.read().await.get(id).map(|e| e.value.clone())
    }

    async fn list_environments(&self) -> Vec<Environment> {
        self.environments
            .read()
            .await
            .values()
            .map(|e| e.value.clone())
            .collect()
    }

    async fn update_environment(
        &self,
        env: &Environment,
        source: UpdateSource,
        immediate: bool,
    ) -> Result<(), StoreError> {
        // Hold the write lock across the file write so concurrent updates
        // land on disk in the same order as in memory.
        let mut envs = self.environments.write().await;
        let entry = envs
            .get_mut(env.id())
            .ok_or_else(|| StoreError::environment_not_found(env.id()))?;

        if immediate {
            let contents = serialize(env, entry.format)?;
            tokio::fs::write(&entry.path, contents)
                .await
                .map_err(|e| StoreError::io(&entry.path, e))?;
        }

        entry.value = env.clone();
        tracing::debug!(environment = %env.id(), %source, immediate, "environment updated");
        Ok(())
    }
}
