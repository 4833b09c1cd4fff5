//! Process Query use case (the agent loop).
//!
//! One query is one turn:
//!
//! 1. **Decision**: send the query with every tool definition to the gateway
//! 2. **No tool requested**: the decision text is the final answer
//! 3. **Dispatch**: for each requested call, in order:
//!    lookup → circuit breaker → argument validation → execution
//! 4. **Synthesis**: send the query plus one line per tool result back to
//!    the gateway, without tools
//! 5. **Return**: final answer, attempted tools, collected tool errors
//!
//! No per-tool failure aborts the turn. Only a gateway failure ends it early,
//! and even then the caller receives an [`AgentReply`], never an error.

use crate::ports::audit_logger::{AuditEvent, AuditEventType, AuditLogger, NoAuditLogger};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::tool_executor::ToolExecutorPort;
use finwise_domain::util::preview;
use finwise_domain::{
    AgentPromptTemplate, AgentReply, AgentTurn, ArgumentValidator, CircuitBreaker, Query,
    ToolAttempt, ToolCall, ToolCallResult, ToolFailureKind,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Answer returned when the LLM gateway fails.
pub const SYSTEM_ERROR_ANSWER: &str = "Agent system error. Please check configuration.";

/// Answer returned for a blank query.
pub const EMPTY_QUERY_ANSWER: &str = "Please provide a non-empty query.";

/// Use case for answering one user query with tools.
///
/// The circuit breaker is shared process-wide; the validator is derived from
/// the executor's tool spec unless one is supplied.
pub struct ProcessQueryUseCase {
    gateway: Arc<dyn LlmGateway>,
    tool_executor: Arc<dyn ToolExecutorPort>,
    circuit_breaker: Arc<CircuitBreaker>,
    validator: ArgumentValidator,
    audit_logger: Arc<dyn AuditLogger>,
}

impl ProcessQueryUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        tool_executor: Arc<dyn ToolExecutorPort>,
        circuit_breaker: Arc<CircuitBreaker>,
    ) -> Self {
        let validator = ArgumentValidator::from_spec(tool_executor.tool_spec());
        Self {
            gateway,
            tool_executor,
            circuit_breaker,
            validator,
            audit_logger: Arc::new(NoAuditLogger),
        }
    }

    /// Create with an audit logger.
    pub fn with_audit_logger(mut self, logger: Arc<dyn AuditLogger>) -> Self {
        self.audit_logger = logger;
        self
    }

    /// Replace the schema set used for argument validation.
    pub fn with_validator(mut self, validator: ArgumentValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Process one query. Always produces a reply.
    pub async fn execute(&self, raw_query: &str) -> AgentReply {
        let query = match Query::parse(raw_query) {
            Ok(q) => q,
            Err(e) => {
                warn!("Rejected query: {}", e);
                return AgentReply::answer_only(EMPTY_QUERY_ANSWER);
            }
        };

        info!("Processing query: {}", preview(query.content(), 100));
        self.audit(AuditEventType::UserQuery, query.content(), json!({}));

        let mut turn = AgentTurn::new(query.content());
        let definitions = self.tool_executor.definitions();

        // Decision call
        let decision = match self
            .gateway
            .generate(query.content(), Some(&definitions))
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Decision call failed");
                self.audit(
                    AuditEventType::Error,
                    query.content(),
                    json!({ "stage": "decision", "error": e.to_string() }),
                );
                return turn.finish(SYSTEM_ERROR_ANSWER);
            }
        };

        if !decision.has_tool_calls() {
            debug!("No tool requested, answering directly");
            let answer = decision.text.clone();
            turn.set_decision(decision);
            self.audit(
                AuditEventType::FinalAnswer,
                query.content(),
                json!({
                    "answer": answer,
                    "used_tools": [],
                    "tool_errors": [],
                    "decision_model": decision_model(&turn),
                }),
            );
            return turn.finish(answer);
        }

        info!(
            tools = ?decision.tool_names(),
            "Model requested {} tool call(s)",
            decision.tool_calls.len()
        );

        for call in &decision.tool_calls {
            let result = self.dispatch(query.content(), call).await;
            turn.record(ToolAttempt::new(
                call.tool_name.clone(),
                call.arguments.clone(),
                result,
            ));
        }
        turn.set_decision(decision);

        // Synthesis call
        let prompt = AgentPromptTemplate::synthesis(turn.query(), turn.attempts());
        debug!("Synthesis prompt: {}", preview(&prompt, 300));

        match self.gateway.generate(&prompt, None).await {
            Ok(response) => {
                self.audit(
                    AuditEventType::FinalAnswer,
                    query.content(),
                    json!({
                        "answer": response.text,
                        "used_tools": turn.used_tools(),
                        "tool_errors": turn.tool_errors(),
                        "decision_model": decision_model(&turn),
                        "synthesis_model": response.model,
                    }),
                );
                turn.finish(response.text)
            }
            Err(e) => {
                error!(error = %e, "Synthesis call failed");
                self.audit(
                    AuditEventType::Error,
                    query.content(),
                    json!({
                        "stage": "synthesis",
                        "error": e.to_string(),
                        "used_tools": turn.used_tools(),
                    }),
                );
                turn.finish(SYSTEM_ERROR_ANSWER)
            }
        }
    }

    /// Run one requested call through lookup, breaker, validation and execution.
    async fn dispatch(&self, query: &str, call: &ToolCall) -> ToolCallResult {
        let name = call.tool_name.as_str();

        if !self.tool_executor.has_tool(name) {
            warn!(tool = %name, "Tool not found");
            return ToolCallResult::failure(ToolFailureKind::NotFound, "tool not found");
        }

        if self.circuit_breaker.is_open(name) {
            warn!(tool = %name, "Circuit breaker open, skipping tool");
            return ToolCallResult::failure(ToolFailureKind::CircuitOpen, "circuit breaker open");
        }

        let args = match self.validator.validate(name, &call.arguments) {
            Ok(args) => args,
            Err(e) => {
                if e.is_configuration_error() {
                    error!(tool = %name, error = %e, "Tool has no argument schema");
                } else {
                    warn!(tool = %name, error = %e, "Invalid tool arguments");
                }
                return ToolCallResult::failure(
                    ToolFailureKind::Validation,
                    format!("invalid args: {}", e),
                );
            }
        };

        debug!(tool = %name, args = %args.to_value(), "Executing tool");

        match self.tool_executor.execute(name, &args).await {
            Ok(value) => {
                self.circuit_breaker.record_success(name);
                self.audit(
                    AuditEventType::ToolCall,
                    query,
                    json!({ "tool": name, "args": args.to_value(), "result": value }),
                );
                ToolCallResult::success(value)
            }
            Err(e) => {
                let kind = e.failure_kind();
                if kind.counts_as_tool_failure() {
                    self.circuit_breaker.record_failure(name);
                    warn!(
                        tool = %name,
                        error = %e,
                        failures = self.circuit_breaker.failure_count(name),
                        "Tool execution failed"
                    );
                } else {
                    warn!(tool = %name, error = %e, "Tool rejected its arguments");
                }
                self.audit(
                    AuditEventType::ToolError,
                    query,
                    json!({
                        "tool": name,
                        "args": args.to_value(),
                        "error": e.to_string(),
                        "kind": kind.as_str(),
                    }),
                );
                ToolCallResult::failure(kind, e.to_string())
            }
        }
    }

    fn audit(&self, event_type: AuditEventType, query: &str, details: serde_json::Value) {
        if let Err(e) = self
            .audit_logger
            .log(AuditEvent::new(event_type, query, details))
        {
            warn!(event = %event_type, error = %e, "Failed to write audit event");
        }
    }
}

/// Model that answered the decision call, when the gateway reported one.
fn decision_model(turn: &AgentTurn) -> Option<&str> {
    turn.decision().and_then(|d| d.model.as_deref())
}
