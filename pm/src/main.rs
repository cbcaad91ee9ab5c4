//! PromptMode - draft / critique / revise orchestration
//!
//! CLI entry point: load a task file, run it through the V1 or V2 engine,
//! print the final output, and optionally persist the transcript.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result, eyre};
use tracing::info;

use promptmode::cli::{Cli, Command};
use promptmode::config::Config;
use promptmode::domain::Mode;
use promptmode::engine::{PromptModeV1, PromptModeV2};
use promptmode::llm::{LlmClient, LocalMock, create_client};
use promptmode::prompts::PromptLoader;
use promptmode::transcript::write_transcript;

fn setup_logging(verbose: bool) -> Result<()> {
    // Write to a log file, not stdout/stderr - stdout carries the result
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("promptmode")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("promptmode.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(provider = %config.llm.provider, model = %config.llm.model, "config loaded");

    match cli.command {
        Some(Command::Run {
            mode,
            task,
            passes,
            mock,
            save,
        }) => cmd_run(&config, mode, &task, passes, mock, save.as_deref()).await,
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Run a task through the selected engine
async fn cmd_run(config: &Config, mode: Mode, task: &Path, passes: u32, mock: bool, save: Option<&Path>) -> Result<()> {
    if !task.exists() {
        return Err(eyre!("Task file not found: {}", task.display()));
    }
    let task_text = fs::read_to_string(task).context("Failed to read task file")?;

    // Model selection: --mock and PM_FORCE_MOCK both force the offline
    // backend so CI can never reach a real API.
    let force_mock = mock || std::env::var_os("PM_FORCE_MOCK").is_some();
    let model: Arc<dyn LlmClient> = if force_mock {
        info!("using LocalMock backend");
        Arc::new(LocalMock::new())
    } else {
        config.validate()?;
        create_client(&config.llm).context("Failed to create LLM client")?
    };

    let loader = PromptLoader::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let result = match mode {
        Mode::V1 => PromptModeV1::new(model, config.v1.clone())?.with_loader(loader).run(&task_text).await?,
        Mode::V2 => {
            PromptModeV2::new(model, passes, config.v2.clone())?
                .with_loader(loader)
                .run(&task_text)
                .await?
        }
    };

    println!("\n=== FINAL OUTPUT ===\n");
    println!("{}", result.final_output);
    println!("\n=== SUMMARY ===");
    println!("Passes: {}", result.passes.len());
    println!("Token estimate: {}", result.token_count);
    println!("Stopped: {}", result.stopped_reason);
    if let Some(error) = &result.error_message {
        println!("Error: {}", error);
    }

    if let Some(path) = save {
        write_transcript(path, &result)?;
        println!("Transcript saved to: {}", path.display());
    }

    Ok(())
}
