//! get_exchange_rate tool: live currency conversion rate

use super::ExchangeRateSettings;
use crate::providers::resolve_api_key;
use async_trait::async_trait;
use finwise_domain::tool::{
    Coercion, ToolArguments, ToolDefinition, ToolExecutionError, ToolHandler, ToolParameter,
};
use serde_json::Value;

/// Tool name constant
pub const GET_EXCHANGE_RATE: &str = "get_exchange_rate";

/// Fetches `rates[TARGET]` from an exchangerate-api style endpoint.
///
/// Network errors, HTTP errors and a missing target currency are all
/// returned as [`ToolExecutionError`]; a rate is never defaulted.
pub struct ExchangeRateTool {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ExchangeRateTool {
    pub fn new(settings: &ExchangeRateSettings) -> Result<Self, ToolExecutionError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| {
                ToolExecutionError::failed(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: resolve_api_key(settings.api_key.as_deref(), &settings.api_key_env),
        })
    }

    /// Key-in-path form when a key is configured, `?base=` form otherwise.
    fn url_for(&self, source: &str) -> String {
        match &self.api_key {
            Some(key) => format!("{}/{}/latest/{}", self.base_url, key, source),
            None => format!("{}/latest?base={}", self.base_url, source),
        }
    }
}

pub fn exchange_rate_definition() -> ToolDefinition {
    ToolDefinition::new(
        GET_EXCHANGE_RATE,
        "Get the current exchange rate between two currencies (ISO 4217 codes, e.g. USD, NGN).",
    )
    .with_parameter(
        ToolParameter::new("source_currency", "Currency to convert from", true)
            .with_coercion(Coercion::Uppercase),
    )
    .with_parameter(
        ToolParameter::new("target_currency", "Currency to convert to", true)
            .with_coercion(Coercion::Uppercase),
    )
}

/// An ISO 4217 code: exactly three ASCII letters. Anything else would
/// change the request path.
fn currency_code<'a>(args: &'a ToolArguments, key: &str) -> Result<&'a str, ToolExecutionError> {
    let code = args.require_str(key)?;
    if code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(ToolExecutionError::invalid_argument(format!(
            "'{}' must be a three-letter currency code, got '{}'",
            key, code
        )))
    }
}

/// Read `rates[target]` from a latest-rates response body.
pub(crate) fn parse_rate(body: &Value, target: &str) -> Result<f64, ToolExecutionError> {
    if body.get("result").and_then(Value::as_str) == Some("error") {
        let kind = body
            .get("error-type")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        return Err(ToolExecutionError::failed(format!(
            "exchange rate API error: {}",
            kind
        )));
    }

    let rates = body
        .get("rates")
        .or_else(|| body.get("conversion_rates"))
        .and_then(Value::as_object)
        .ok_or_else(|| ToolExecutionError::failed("exchange rate response has no rates"))?;

    rates
        .get(target)
        .and_then(Value::as_f64)
        .ok_or_else(|| {
            ToolExecutionError::failed(format!(
                "Target currency '{}' not found in response",
                target
            ))
        })
}

#[async_trait]
impl ToolHandler for ExchangeRateTool {
    fn definition(&self) -> ToolDefinition {
        exchange_rate_definition()
    }

    async fn call(&self, args: &ToolArguments) -> Result<Value, ToolExecutionError> {
        let source = currency_code(args, "source_currency")?;
        let target = currency_code(args, "target_currency")?;

        tracing::debug!(source = %source, target = %target, "Fetching exchange rate");

        let response = self
            .http
            .get(self.url_for(source))
            .header("User-Agent", "finwise/0.3 (Agent Tool)")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ToolExecutionError::timeout("exchange rate request")
                } else {
                    ToolExecutionError::failed(format!("Failed to fetch exchange rate: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolExecutionError::Upstream {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body: Value = response.json().await.map_err(|e| {
            ToolExecutionError::failed(format!("Invalid exchange rate response: {}", e))
        })?;

        let rate = parse_rate(&body, target)?;
        Ok(serde_json::json!(rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool(api_key: Option<&str>) -> ExchangeRateTool {
        let settings = ExchangeRateSettings {
            base_url: "https://rates.example/v6/".to_string(),
            api_key: api_key.map(str::to_string),
            api_key_env: "FINWISE_TEST_RATE_KEY_UNSET".to_string(),
            ..Default::default()
        };
        ExchangeRateTool::new(&settings).unwrap()
    }

    #[test]
    fn test_url_with_key_in_path() {
        assert_eq!(
            tool(Some("abc123")).url_for("USD"),
            "https://rates.example/v6/abc123/latest/USD"
        );
    }

    #[test]
    fn test_url_without_key() {
        assert_eq!(
            tool(None).url_for("EUR"),
            "https://rates.example/v6/latest?base=EUR"
        );
    }

    #[test]
    fn test_parse_rate() {
        let body = json!({"base": "USD", "rates": {"NGN": 800.5, "EUR": 0.92}});
        assert_eq!(parse_rate(&body, "NGN").unwrap(), 800.5);

        let v6 = json!({"result": "success", "conversion_rates": {"EUR": 0.92}});
        assert_eq!(parse_rate(&v6, "EUR").unwrap(), 0.92);
    }

    #[test]
    fn test_parse_missing_target_is_error() {
        let body = json!({"rates": {"EUR": 0.92}});
        let err = parse_rate(&body, "XYZ").unwrap_err();
        assert_eq!(err.to_string(), "Target currency 'XYZ' not found in response");
    }

    #[test]
    fn test_parse_api_error_body() {
        let body = json!({"result": "error", "error-type": "invalid-key"});
        let err = parse_rate(&body, "EUR").unwrap_err();
        assert!(err.to_string().contains("invalid-key"));

        assert!(parse_rate(&json!({}), "EUR").is_err());
    }

    #[tokio::test]
    async fn test_malformed_codes_rejected_before_request() {
        let tool = tool(Some("abc123"));
        for bad in ["US/D", "USD?x=1", "US", "EURO", "1AB"] {
            let args = ToolArguments::new()
                .with("source_currency", bad)
                .with("target_currency", "NGN");
            let err = tool.call(&args).await.unwrap_err();
            assert!(
                matches!(err, ToolExecutionError::InvalidArgument(_)),
                "{bad}: {err}"
            );
        }

        let args = ToolArguments::new()
            .with("source_currency", "USD")
            .with("target_currency", "N/G");
        let err = tool.call(&args).await.unwrap_err();
        assert!(err.to_string().contains("target_currency"));
    }

    #[test]
    fn test_definition_uppercases_codes() {
        let def = exchange_rate_definition();
        assert_eq!(def.name, GET_EXCHANGE_RATE);
        assert!(
            def.parameters
                .iter()
                .all(|p| p.required && p.coercion == Some(Coercion::Uppercase))
        );
    }
}
