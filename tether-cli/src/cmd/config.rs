use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tether_core::types::ScriptLanguage;
use tether_exec::executor::{OrchestratorConfig, ScriptingConfig};

use crate::OrchestratorArgs;

pub const CONFIG_FILE: &str = "tether.yaml";

/// Optional `tether.yaml` at the workspace root.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorkspaceConfig {
    pub max_chain_depth: Option<usize>,
    #[serde(default)]
    pub scripting: ScriptingFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScriptingFile {
    pub enabled: Option<bool>,
    pub language: Option<ScriptLanguage>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub timeout_seconds: Option<u64>,
}

pub fn load_workspace_config(root: &Path) -> Result<WorkspaceConfig, String> {
    let path = root.join(CONFIG_FILE);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(WorkspaceConfig::default()),
        Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
    };
    if content.trim().is_empty() {
        return Ok(WorkspaceConfig::default());
    }
    serde_yaml::from_str(&content).map_err(|e| format!("invalid {}: {e}", path.display()))
}

/// File values first, then command-line overrides.
pub fn build_orchestrator_config(file: &WorkspaceConfig, args: &OrchestratorArgs) -> OrchestratorConfig {
    let defaults = ScriptingConfig::default();
    let scripting = ScriptingConfig {
        enabled: args.scripting || file.scripting.enabled.unwrap_or(defaults.enabled),
        language: file.scripting.language.unwrap_or(defaults.language),
        host: file.scripting.host.clone().unwrap_or(defaults.host),
        port: args
            .script_port
            .or(file.scripting.port)
            .unwrap_or(defaults.port),
        timeout: file
            .scripting
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout),
    };

    OrchestratorConfig {
        max_chain_depth: args
            .max_chain_depth
            .or(file.max_chain_depth)
            .unwrap_or(OrchestratorConfig::default().max_chain_depth),
        scripting,
    }
}
