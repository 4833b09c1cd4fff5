//! Prompt templates for the agent loop

use crate::agent::turn::ToolAttempt;
use crate::tool::entities::ToolDefinition;

/// Templates for generating agent prompts
pub struct AgentPromptTemplate;

impl AgentPromptTemplate {
    /// Instruction placed ahead of the user query when tools are offered.
    pub fn tool_instruction() -> &'static str {
        r#"If you must call a tool to answer the user's query, respond with exactly one JSON object and nothing else.
The object must have "tool" and "args" properties, for example: {"tool": "get_exchange_rate", "args": {"source_currency": "USD", "target_currency": "NGN"}}
If you do not need a tool, respond with a plain text answer."#
    }

    /// One `name(param, param)` line per tool.
    pub fn tool_listing(tools: &[ToolDefinition]) -> String {
        let lines = tools
            .iter()
            .map(|t| format!("{}({})", t.name, t.parameter_names().collect::<Vec<_>>().join(", ")))
            .collect::<Vec<_>>()
            .join("\n");
        format!("Available tools:\n{}", lines)
    }

    /// Decision prompt: instruction, tool listing, then the user query.
    pub fn decision(query: &str, tools: &[ToolDefinition]) -> String {
        format!(
            "{}\n{}\nUSER QUERY:\n{}",
            Self::tool_instruction(),
            Self::tool_listing(tools),
            query
        )
    }

    /// Synthesis prompt built from every tool attempt, in order.
    pub fn synthesis(query: &str, attempts: &[ToolAttempt]) -> String {
        let results = attempts
            .iter()
            .map(ToolAttempt::prompt_line)
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"USER QUERY:
{query}

TOOL RESULTS:
{results}

Using the tool results above, write the final answer to the user's query.
If a tool reported an error, say what could not be determined instead of guessing."#
        )
    }

    /// Context-restricted prompt for document-grounded answers.
    pub fn financial_analyst(context_chunks: &[String], query: &str) -> String {
        format!(
            "You are a highly specialized financial analyst. Use ONLY the provided context to answer the user's query.\nCONTEXT:\n{}\nUSER QUERY:\n{}",
            context_chunks.join("\n"),
            query
        )
    }
}
