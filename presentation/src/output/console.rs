//! Console output formatter for agent replies

use colored::Colorize;
use finwise_domain::{AgentReply, OutputFormat};

/// Formats agent replies for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format a reply in the requested format
    pub fn format(reply: &AgentReply, format: OutputFormat) -> String {
        match format {
            OutputFormat::Answer => Self::format_answer(reply),
            OutputFormat::Full => Self::format_full(reply),
            OutputFormat::Json => Self::format_json(reply),
        }
    }

    /// Only the final answer
    pub fn format_answer(reply: &AgentReply) -> String {
        reply.final_answer.clone()
    }

    /// Answer plus tools used and tool errors
    pub fn format_full(reply: &AgentReply) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("finwise"));
        output.push('\n');

        output.push_str(&format!("{}\n{}\n\n", "Answer:".cyan().bold(), reply.final_answer));

        if reply.used_tools.is_empty() {
            output.push_str(&format!("{} {}\n", "Tools used:".cyan().bold(), "none".dimmed()));
        } else {
            output.push_str(&format!(
                "{} {}\n",
                "Tools used:".cyan().bold(),
                reply.used_tools.join(", ")
            ));
        }

        if !reply.tool_errors.is_empty() {
            output.push_str(&format!("\n{}\n", "Tool errors:".yellow().bold()));
            for error in &reply.tool_errors {
                output.push_str(&format!("  {} {}\n", "*".red(), error));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON: `{"final_answer", "used_tools", "tool_errors"}`
    pub fn format_json(reply: &AgentReply) -> String {
        serde_json::to_string_pretty(reply).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "═".repeat(50);
        format!("{}\n{}\n{}", line.cyan(), title.cyan().bold(), line.cyan())
    }

    fn footer() -> String {
        format!("{}\n", "─".repeat(50).dimmed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn degraded_reply() -> AgentReply {
        AgentReply {
            final_answer: "Tesla, Inc. is active; the rate could not be fetched.".to_string(),
            used_tools: vec![
                "verify_company_registry".to_string(),
                "get_exchange_rate".to_string(),
            ],
            tool_errors: vec![
                "get_exchange_rate: upstream returned HTTP 503: Service Unavailable".to_string(),
            ],
        }
    }

    #[test]
    fn test_answer_only() {
        let reply = AgentReply::answer_only("Hello");
        assert_eq!(ConsoleFormatter::format(&reply, OutputFormat::Answer), "Hello");
    }

    #[test]
    fn test_full_lists_tools_and_errors() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::format(&degraded_reply(), OutputFormat::Full);
        assert!(output.contains("Answer:\nTesla, Inc. is active"));
        assert!(output.contains("Tools used: verify_company_registry, get_exchange_rate"));
        assert!(output.contains("Tool errors:"));
        assert!(output.contains("* get_exchange_rate: upstream returned HTTP 503"));
    }

    #[test]
    fn test_full_without_tools() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::format_full(&AgentReply::answer_only("Hi"));
        assert!(output.contains("Tools used: none"));
        assert!(!output.contains("Tool errors:"));
    }

    #[test]
    fn test_json_shape() {
        let output = ConsoleFormatter::format(&degraded_reply(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["used_tools"][0], "verify_company_registry");
        assert_eq!(value["tool_errors"].as_array().unwrap().len(), 1);
        assert!(value["final_answer"].as_str().unwrap().starts_with("Tesla"));
    }
}
