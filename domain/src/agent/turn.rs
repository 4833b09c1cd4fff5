//! Per-query working state of the agent loop.
//!
//! An [`AgentTurn`] is created when a query arrives, filled in as the
//! decision call and tool attempts complete, and consumed into an
//! [`AgentReply`] when the turn ends.
//!
//! Results are kept twice: `attempts` holds every call in order, and
//! `results` holds the last outcome per tool name. Prompts are rendered from
//! `attempts`, so a repeated tool name never hides an earlier outcome.

use crate::session::response::LlmResponse;
use crate::tool::value_objects::ToolCallResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One requested tool call and what came of it.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolAttempt {
    pub tool_name: String,
    pub arguments: HashMap<String, serde_json::Value>,
    pub result: ToolCallResult,
}

impl ToolAttempt {
    pub fn new(
        tool_name: impl Into<String>,
        arguments: HashMap<String, serde_json::Value>,
        result: ToolCallResult,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
            result,
        }
    }

    /// `name: <rendered result>`, as it appears in the synthesis prompt.
    pub fn prompt_line(&self) -> String {
        format!("{}: {}", self.tool_name, self.result.render())
    }

    /// Error string for the reply, if the attempt failed.
    pub fn error_message(&self) -> Option<String> {
        self.result
            .failure_reason()
            .map(|reason| format!("{}: {}", self.tool_name, reason))
    }
}

#[derive(Debug, Clone)]
pub struct AgentTurn {
    query: String,
    decision: Option<LlmResponse>,
    attempts: Vec<ToolAttempt>,
    results: HashMap<String, ToolCallResult>,
    used_tools: Vec<String>,
    tool_errors: Vec<String>,
}

impl AgentTurn {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            decision: None,
            attempts: Vec::new(),
            results: HashMap::new(),
            used_tools: Vec::new(),
            tool_errors: Vec::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_decision(&mut self, response: LlmResponse) {
        self.decision = Some(response);
    }

    pub fn decision(&self) -> Option<&LlmResponse> {
        self.decision.as_ref()
    }

    /// Record an attempt. Every attempt counts as a used tool.
    pub fn record(&mut self, attempt: ToolAttempt) {
        self.used_tools.push(attempt.tool_name.clone());
        if let Some(message) = attempt.error_message() {
            self.tool_errors.push(message);
        }
        self.results
            .insert(attempt.tool_name.clone(), attempt.result.clone());
        self.attempts.push(attempt);
    }

    pub fn attempts(&self) -> &[ToolAttempt] {
        &self.attempts
    }

    /// Last outcome recorded for `tool_name`.
    pub fn result_for(&self, tool_name: &str) -> Option<&ToolCallResult> {
        self.results.get(tool_name)
    }

    pub fn used_tools(&self) -> &[String] {
        &self.used_tools
    }

    pub fn tool_errors(&self) -> &[String] {
        &self.tool_errors
    }

    /// Close the turn with a final answer.
    pub fn finish(self, final_answer: impl Into<String>) -> AgentReply {
        AgentReply {
            final_answer: final_answer.into(),
            used_tools: self.used_tools,
            tool_errors: self.tool_errors,
        }
    }
}

/// What the caller receives for one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentReply {
    pub final_answer: String,
    pub used_tools: Vec<String>,
    pub tool_errors: Vec<String>,
}

impl AgentReply {
    /// A reply that used no tools.
    pub fn answer_only(final_answer: impl Into<String>) -> Self {
        Self {
            final_answer: final_answer.into(),
            used_tools: Vec::new(),
            tool_errors: Vec::new(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.tool_errors.is_empty()
    }
}
