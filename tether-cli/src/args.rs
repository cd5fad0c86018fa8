use std::path::PathBuf;

use clap::Args;

use crate::output::OutputFormat;

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Args, Clone)]
pub struct WorkspaceArgs {
    /// Directory holding `requests/`, `environments/` and an optional `tether.yaml`.
    #[arg(long, short = 'w', default_value = ".")]
    pub workspace: PathBuf,
}

/// Overrides for values read from `tether.yaml`.
#[derive(Debug, Args, Clone, Default)]
pub struct OrchestratorArgs {
    #[arg(long)]
    pub max_chain_depth: Option<usize>,
    /// Run post-request scripts through the script server.
    #[arg(long)]
    pub scripting: bool,
    #[arg(long)]
    pub script_port: Option<u16>,
    /// HTTP request timeout in milliseconds.
    #[arg(long, default_value_t = 30000)]
    pub timeout: u64,
}
