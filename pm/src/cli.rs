//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::Mode;

/// PromptMode - draft / critique / revise orchestration
#[derive(Parser)]
#[command(
    name = "pm",
    about = "Run a task through a draft / critique / revise loop against an LLM backend",
    version,
    after_help = "Logs are written to: ~/.local/share/promptmode/logs/promptmode.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Run a task file through the V1 or V2 engine
    Run {
        /// Engine mode to run (v1 or v2)
        #[arg(short, long)]
        mode: Mode,

        /// Path to task file (markdown or plain text)
        task: PathBuf,

        /// Number of improvement passes (v2 only)
        #[arg(short, long, default_value_t = 1)]
        passes: u32,

        /// Use the deterministic local mock instead of a real model
        #[arg(long)]
        mock: bool,

        /// Path to save the run transcript (JSONL)
        #[arg(short, long)]
        save: Option<PathBuf>,
    },
}
