use std::path::PathBuf;

use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send a saved request, running its trigger chain and post-request hooks.
    Send {
        request_id: String,
        /// Environment to read `{{placeholders}}` from and bind values into.
        #[arg(long, short = 'e')]
        env: Option<String>,
        /// Print lifecycle events as JSON lines.
        #[arg(long)]
        events: bool,
        #[command(flatten)]
        workspace: WorkspaceArgs,
        #[command(flatten)]
        orchestrator: OrchestratorArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List environments, or show the values of one.
    Env {
        environment_id: Option<String>,
        #[command(flatten)]
        workspace: WorkspaceArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Parse and validate a request document, or every request in a workspace.
    Validate {
        path: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
}
