//! Scout CLI - web-search-augmented queries from the console.
//!
//! Runs one-shot questions (`scout ask`) or an interactive session
//! (`scout chat`) against a hosted chat-completion model with a DuckDuckGo
//! search tool.

#![allow(clippy::print_stdout, clippy::print_stderr)] // CLI program intentionally writes to the console

mod chat;
mod config;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use scout::agent::Agent;
use scout::model::GithubModelsClient;
use scout::tools::{DuckDuckGo, SearchProbeTool, SearchTool};
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;

use crate::config::ScoutConfig;
use crate::error::Result;

/// Demonstration query used when `ask` is given no argument.
const DEMO_QUERY: &str = "How many churches in Vilnius? Please search DuckDuckGo.";

/// Scout - ask questions from the console with web-search assistance
#[derive(Parser)]
#[command(name = "scout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "SCOUT_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single query and print the answer
    Ask {
        /// The question to answer (defaults to the demonstration query)
        query: Option<String>,
    },

    /// Start an interactive chat session
    Chat,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with the given verbosity level.
///
/// Quiet by default; log lines go to stderr so a piped answer stays clean.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "scout={level},{}",
            if verbosity >= 3 { "debug" } else { "warn" }
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(path) => config::load_from(path).await?,
        None => config::load().await?,
    };

    match cli.command {
        Commands::Ask { query } => cmd_ask(query, &config).await,
        Commands::Chat => cmd_chat(&config).await,
    }
}

/// Run a single query and print the final answer.
async fn cmd_ask(query: Option<String>, config: &ScoutConfig) -> Result<()> {
    let agent = build_agent(config)?;
    let query = query.unwrap_or_else(|| DEMO_QUERY.to_string());

    let result = agent.run(query).await?;
    debug!("{}", result.summary().trim_end());
    println!("{}", result.output);

    Ok(())
}

/// Start the interactive chat session.
async fn cmd_chat(config: &ScoutConfig) -> Result<()> {
    let agent = build_agent(config)?;
    chat::ChatSession::new(agent).run().await
}

/// Assemble the agent from configuration.
///
/// The credential is resolved first so a missing token fails before any
/// network client is built.
fn build_agent(config: &ScoutConfig) -> Result<Agent> {
    let api_key = config::credential()?;

    let client = GithubModelsClient::builder()
        .api_key(api_key)
        .base_url(&config.model.base_url)
        .build();

    let provider = Arc::new(DuckDuckGo::new(config.search.timeout_secs));
    let search_tool =
        SearchTool::with_provider(provider).with_max_results(config.search.max_results);

    let mut builder = Agent::builder()
        .model(client.completion_model(&config.model.id))
        .instructions(config.agent.instructions.text())
        .max_steps(config.agent.max_steps)
        .timeout_secs(config.agent.timeout_secs)
        .temperature(config.model.temperature)
        .tool(search_tool);

    if let Some(max_tokens) = config.model.max_tokens {
        builder = builder.max_tokens(max_tokens);
    }
    if config.search.probe {
        builder = builder.tool(SearchProbeTool::new(config.search.timeout_secs));
    }

    Ok(builder.try_build()?)
}
