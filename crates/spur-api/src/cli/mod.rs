//! CLI command definitions for the `spur` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod history;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// SpurStore customer support chat backend.
#[derive(Parser)]
#[command(name = "spur", version, about, long_about = None)]
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

    /// Path to the configuration file.
    #[arg(long, global = true, env = "SPUR_CONFIG", default_value = "config.toml")]
    pub config: PathBuf,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server.
    Serve {
        /// Port to listen on (overrides config and PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config).
        #[arg(long)]
        host: Option<String>,
    },

    /// Create or upgrade the database schema, then exit.
    Migrate,

    /// Send one message to the support agent and print the reply.
    Ask {
        /// The customer message.
        message: String,

        /// Continue an existing conversation.
        #[arg(long)]
        session: Option<String>,
    },

    /// Print the message history of a conversation.
    History {
        /// Conversation identifier.
        session_id: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
