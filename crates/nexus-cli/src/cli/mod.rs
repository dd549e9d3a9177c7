//! CLI command definitions for the `nexus` binary.

pub mod ask;
pub mod chat;
pub mod preferences;
pub mod session;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Chat with a web-grounded assistant from your terminal.
#[derive(Parser)]
#[command(name = "nexus", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone)]
pub enum Commands {
    /// Start an interactive chat (the default).
    Chat,

    /// Send one message to the active session and print the reply.
    Ask {
        /// Message text.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// List chat sessions.
    #[command(alias = "ls")]
    Sessions,

    /// Clear the active session's messages.
    Clear {
        /// Delete every session instead and start over.
        #[arg(long)]
        all: bool,

        /// Skip the confirmation prompt.
        #[arg(long, short)]
        force: bool,
    },

    /// Show or change the display theme.
    Theme {
        mode: Option<ThemeArg>,
    },

    /// Show or change the speech voice.
    Voice {
        /// Kore, Puck, Zephyr or Charon.
        name: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
    Toggle,
}
