//! Output format value object

use serde::{Deserialize, Serialize};

/// How an agent reply is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Only the final answer (default)
    #[default]
    Answer,
    /// Answer plus tools used and tool errors
    Full,
    /// JSON reply object
    Json,
}
