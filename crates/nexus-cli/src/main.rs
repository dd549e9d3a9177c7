//! Nexus terminal chat client entry point.
//!
//! Binary name: `nexus`
//!
//! Parses CLI arguments, sets up tracing, opens the state database and
//! dispatches to the command handlers. With no subcommand the interactive
//! chat loop starts.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = nexus_observe::tracing_setup::filter_for_verbosity(cli.verbose, cli.quiet);
    if let Err(e) = nexus_observe::tracing_setup::init_tracing(filter, cli.otel) {
        eprintln!("Warning: could not initialize logging: {e}");
    }

    let command = cli.command.clone().unwrap_or(Commands::Chat);

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "nexus", &mut std::io::stdout());
        return Ok(());
    }

    let mut state = AppState::init(cli.api_key.clone()).await?;

    let result = match command {
        Commands::Chat => cli::chat::loop_runner::run_chat_loop(state).await,
        Commands::Ask { text } => cli::ask::ask(&state, &text.join(" "), cli.json).await,
        Commands::Sessions => cli::session::list_sessions(&state, cli.json).await,
        Commands::Clear { all, force } => cli::session::clear(&state, all, force, cli.json).await,
        Commands::Theme { mode } => cli::preferences::theme(&mut state, mode, cli.json).await,
        Commands::Voice { name } => cli::preferences::voice(&mut state, name, cli.json).await,
        Commands::Completions { .. } => Ok(()),
    };

    nexus_observe::tracing_setup::shutdown_tracing();
    result
}
