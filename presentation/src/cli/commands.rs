//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for agent replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Only the final answer
    Answer,
    /// Answer plus tools used and tool errors
    Full,
    /// JSON reply object
    Json,
}

impl From<OutputFormat> for finwise_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Answer => finwise_domain::OutputFormat::Answer,
            OutputFormat::Full => finwise_domain::OutputFormat::Full,
            OutputFormat::Json => finwise_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for finwise
#[derive(Parser, Debug)]
#[command(name = "finwise")]
#[command(
    author,
    version,
    about = "Financial assistant agent that calls tools to answer questions"
)]
#[command(long_about = r#"
finwise answers financial questions with an LLM that can call tools:
live exchange rates, a company registry lookup, and document-grounded
answers with source citations.

Each query runs one turn:
1. Decision: the LLM is shown the available tools and decides whether to call any
2. Tools: requested tools run with validated arguments; failing tools are
   disabled for a while by a circuit breaker
3. Synthesis: the LLM writes the final answer from the tool results

Configuration files are loaded from (in priority order):
1. --config <path>                      Explicit config file
2. ./finwise.toml                       Project-level config
3. ~/.config/finwise/config.toml        Global config
4. FINWISE_* environment variables      e.g. FINWISE_PROVIDER__DEFAULT=gemini

Example:
  finwise "Convert 100 USD to NGN"
  finwise -o full "Is Tesla an active company?"
  finwise -p gemini -o json "What was Q3 2024 net revenue?"
"#)]
pub struct Cli {
    /// The question to ask
    #[arg(required_unless_present = "show_config")]
    pub query: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "answer")]
    pub output: OutputFormat,

    /// LLM provider to use (groq or gemini), overriding the config
    #[arg(short, long, value_name = "PROVIDER")]
    pub provider: Option<String>,

    /// Model to use, overriding the provider's configured model
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
