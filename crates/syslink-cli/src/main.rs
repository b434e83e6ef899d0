//! syslink CLI entry point.
//!
//! Binary name: `syslink`
//!
//! Parses CLI arguments, initializes tracing, the database, and the link
//! service, then dispatches to the command handler.

mod cli;
mod prompt;
mod state;

use std::process::ExitCode;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands, SystemCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,syslink=debug",
        _ => "trace",
    };
    syslink_observe::tracing_setup::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "syslink", &mut std::io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let state = AppState::init().await?;
    let caller = cli.caller.as_deref();
    let out = cli.output();

    let succeeded = match cli.command {
        Commands::Link { account } => cli::link::link(&state, caller, account, out).await?,
        Commands::Unlink { account } => {
            cli::link::unlink(&state, caller, account, out).await?
        }
        Commands::Accounts => cli::link::accounts(&state, caller, out).await?,
        Commands::System { action } => match action {
            SystemCommand::New => cli::system::create_system(&state, caller, out).await?,
        },
        Commands::Systems => cli::system::list_systems(&state, out).await?,
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    state.db_pool.close().await;
    syslink_observe::tracing_setup::shutdown_tracing();

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
