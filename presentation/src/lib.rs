//! Presentation layer for finwise
//!
//! This crate contains the CLI definition and the console/JSON
//! formatting of agent replies.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
