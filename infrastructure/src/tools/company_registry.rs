//! verify_company_registry tool: company status lookup
//!
//! Queries `{api_url}/search?q=<name>` when a registry API is configured.
//! When it is not, or the request fails, an offline simulated registry
//! answers instead so the tool always produces a record.

use super::RegistrySettings;
use async_trait::async_trait;
use finwise_domain::tool::{
    Coercion, ToolArguments, ToolDefinition, ToolExecutionError, ToolHandler, ToolParameter,
};
use serde_json::{Value, json};

/// Tool name constant
pub const VERIFY_COMPANY_REGISTRY: &str = "verify_company_registry";

pub struct CompanyRegistryTool {
    http: reqwest::Client,
    api_url: Option<String>,
}

impl CompanyRegistryTool {
    pub fn new(settings: &RegistrySettings) -> Result<Self, ToolExecutionError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| {
                ToolExecutionError::failed(format!("failed to create HTTP client: {}", e))
            })?;

        let api_url = settings
            .api_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(|u| u.trim_end_matches('/').to_string());

        Ok(Self { http, api_url })
    }

    /// Registry that only uses the simulated lookup.
    pub fn offline() -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: None,
        }
    }

    async fn query_api(
        &self,
        api_url: &str,
        company_name: &str,
    ) -> Result<Value, ToolExecutionError> {
        let response = self
            .http
            .get(format!("{}/search", api_url))
            .query(&[("q", company_name)])
            .send()
            .await
            .map_err(|e| ToolExecutionError::failed(format!("registry request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolExecutionError::Upstream {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ToolExecutionError::failed(format!("invalid registry response: {}", e)))
    }
}

pub fn company_registry_definition() -> ToolDefinition {
    ToolDefinition::new(
        VERIFY_COMPANY_REGISTRY,
        "Verify a company's registration status and details in the corporate registry.",
    )
    .with_parameter(
        ToolParameter::new("company_name", "Name of the company to verify", true)
            .with_coercion(Coercion::Trim),
    )
}

/// Offline registry with a single known company.
pub fn simulated_lookup(company_name: &str) -> Value {
    if company_name.contains("Tesla") {
        json!({
            "name": "Tesla, Inc.",
            "status": "Active",
            "cik": "0001318605",
            "country": "USA",
            "date_founded": "2003-07-01"
        })
    } else {
        json!({"name": company_name, "status": "Not Found", "details": null})
    }
}

#[async_trait]
impl ToolHandler for CompanyRegistryTool {
    fn definition(&self) -> ToolDefinition {
        company_registry_definition()
    }

    async fn call(&self, args: &ToolArguments) -> Result<Value, ToolExecutionError> {
        let company_name = args.require_str("company_name")?;
        tracing::info!(company = %company_name, "Checking company registry");

        if let Some(api_url) = &self.api_url {
            match self.query_api(api_url, company_name).await {
                Ok(record) => return Ok(record),
                Err(e) => tracing::warn!(
                    api_url = %api_url,
                    error = %e,
                    "Registry API unavailable, using simulated registry"
                ),
            }
        }

        Ok(simulated_lookup(company_name))
    }
}
