//! CLI entrypoint for finwise
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use finwise_application::{AuditLogger, LlmGateway, NoAuditLogger, ProcessQueryUseCase};
use finwise_domain::{ProviderKind, util::preview};
use finwise_infrastructure::{
    ConfigLoader, FileConfig, InMemoryRetriever, JsonlAuditLogger, build_gateway,
    default_registry,
};
use finwise_presentation::{Cli, ConsoleFormatter};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_without_files()
    } else {
        ConfigLoader::load(cli.config.as_deref())
    }
    .context("Failed to load configuration")?;

    let _log_guard = init_logging(cli.verbose, config.logging.log_dir().as_deref())?;

    info!("Starting finwise");

    let issues = config.validate();
    if !issues.is_empty() {
        let details: Vec<String> = issues.iter().map(|i| format!("  - {}", i)).collect();
        bail!("Invalid configuration:\n{}", details.join("\n"));
    }

    let query = cli.query.clone().unwrap_or_default();
    let use_case = build_use_case(&cli, &config)?;
    let reply = use_case.execute(&query).await;

    if reply.is_degraded() {
        warn!(errors = ?reply.tool_errors, "Answered with tool errors");
    }
    info!(
        tools = ?reply.used_tools,
        answer = %preview(&reply.final_answer, 80),
        "Query complete"
    );

    println!("{}", ConsoleFormatter::format(&reply, cli.output.into()));

    Ok(())
}

/// Install the tracing subscriber: stderr, plus a daily-rolling file when configured.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "finwise.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

/// === Dependency Injection ===
fn build_use_case(cli: &Cli, config: &FileConfig) -> Result<ProcessQueryUseCase> {
    let mut provider_config = config.provider.to_provider_config();
    if let Some(provider) = &cli.provider {
        provider_config.default = provider
            .parse::<ProviderKind>()
            .with_context(|| format!("Invalid --provider '{}'", provider))?;
    }
    info!(
        provider = %provider_config.default,
        model = %cli.model.as_deref().unwrap_or(provider_config.active_model()),
        "Using LLM provider"
    );

    let gateway: Arc<dyn LlmGateway> = Arc::new(
        build_gateway(&provider_config, cli.model.as_deref())
            .context("Failed to create LLM gateway")?,
    );

    let tools = default_registry(
        &config.tools.to_tool_settings(),
        gateway.clone(),
        Arc::new(InMemoryRetriever::seeded()),
    )
    .context("Failed to create tools")?;

    let circuit_breaker = Arc::new(config.agent.to_agent_params().circuit_breaker());

    Ok(
        ProcessQueryUseCase::new(gateway, Arc::new(tools), circuit_breaker)
            .with_audit_logger(audit_logger(config)),
    )
}

/// The audit trail never blocks a query: an unopenable file disables it.
fn audit_logger(config: &FileConfig) -> Arc<dyn AuditLogger> {
    if !config.audit.enabled {
        return Arc::new(NoAuditLogger);
    }
    match JsonlAuditLogger::open(&config.audit.path) {
        Ok(logger) => {
            info!(path = %logger.path().display(), "Audit trail enabled");
            Arc::new(logger)
        }
        Err(e) => {
            warn!(
                path = %config.audit.path.display(),
                error = %e,
                "Failed to open audit trail, continuing without it"
            );
            Arc::new(NoAuditLogger)
        }
    }
}
