use std::fmt;
use std::path::PathBuf;

/// Who changed an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateSource {
    HttpService,
    RpcService,
    Script,
    User,
}

impl UpdateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateSource::HttpService => "http",
            UpdateSource::RpcService => "rpc",
            UpdateSource::Script => "script",
            UpdateSource::User => "user",
        }
    }
}

impl fmt::Display for UpdateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("i/o error at {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: tether_core::ParseError,
    },
    #[error("failed to serialize environment {id}: {message}")]
    Serialization { id: String, message: String },
    #[error("store error: {0}")]
    Other(String),
}

impl StoreError {
    pub fn environment_not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: "environment",
            id: id.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
