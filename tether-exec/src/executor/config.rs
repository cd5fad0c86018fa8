use std::time::Duration;

use tether_core::types::ScriptLanguage;

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Maximum number of trigger hops below the request passed to `send`.
    pub max_chain_depth: usize,
    pub scripting: ScriptingConfig,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_chain_depth: 16,
            scripting: ScriptingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptingConfig {
    /// When false, post-request scripts are skipped with a warning.
    pub enabled: bool,
    pub language: ScriptLanguage,
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl Default for ScriptingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            language: ScriptLanguage::Python,
            host: "localhost".to_string(),
            port: 2397,
            timeout: Duration::from_secs(10),
        }
    }
}
