use clap::Parser;

mod args;
mod cmd;
mod commands;
mod exit_codes;
mod output;

pub use args::*;
use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "tether", version, about = "Send saved HTTP/RPC requests and bind response values into environments")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            std::process::exit(exit_codes::RUNTIME_ERROR);
        }
    };

    let exit_code = rt.block_on(run_command(cli.command));
    std::process::exit(exit_code);
}

async fn run_command(command: Command) -> i32 {
    match command {
        Command::Send {
            request_id,
            env,
            events,
            workspace,
            orchestrator,
            output,
        } => {
            cmd::send::send_cmd(&request_id, env.as_deref(), events, workspace, orchestrator, output)
                .await
        }
        Command::Env {
            environment_id,
            workspace,
            output,
        } => cmd::env::env_cmd(environment_id.as_deref(), workspace, output).await,
        Command::Validate { path, output } => cmd::validate::validate_cmd(&path, output).await,
    }
}
