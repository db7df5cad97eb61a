//! CLI command definitions for the `askrelay` binary.

pub mod ask;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Relay questions to an LLM provider and get back display-safe answers.
#[derive(Parser)]
#[command(name = "askrelay", version, about, long_about = None)]
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

    /// Config file (defaults to relay.toml in the data directory).
    #[arg(long, global = true, env = "ASKRELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Write logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask one question and print the answer.
    Ask {
        /// The question text.
        question: String,

        /// Replace the default system prompt for this question.
        #[arg(long, short = 's')]
        system_prompt: Option<String>,
    },

    /// Start the HTTP server.
    Serve {
        /// Interface to bind (overrides server.host).
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides server.port).
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
