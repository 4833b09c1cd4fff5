//! Argument schemas and validation
//!
//! A [`ToolSchema`] lists a tool's required argument names, the expected
//! [`ParamType`] of each argument and any declared [`Coercion`]s. The
//! [`ArgumentValidator`] holds one schema per tool and turns the raw,
//! LLM-supplied argument map into [`ToolArguments`] the tool can trust.
//!
//! Validation order:
//!
//! 1. Schema lookup (absent schema is a configuration error)
//! 2. Missing required keys, all reported, sorted
//! 3. Type check per declared key, first mismatch wins
//! 4. Declared coercions
//!
//! Null values count as present for step 2 and are not type-checked.
//! Keys the schema does not declare are dropped.

use super::entities::{Coercion, ParamType, ToolDefinition, ToolSpec};
use super::value_objects::ToolExecutionError;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

/// Why a set of arguments was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("no schema registered for tool '{0}'")]
    NoSchema(String),

    #[error("missing required arguments: {}", .0.join(", "))]
    MissingArguments(Vec<String>),

    #[error("argument '{key}' expected {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: ParamType,
        actual: &'static str,
    },

    #[error("argument '{key}' could not be coerced: {reason}")]
    CoercionFailed { key: String, reason: String },
}

impl ValidationError {
    /// A missing schema is a wiring problem rather than a bad call.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, ValidationError::NoSchema(_))
    }
}

/// Validated arguments handed to a tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments(Map<String, Value>);

impl ToolArguments {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_str())
    }

    /// Get a required string argument, failing the tool run when absent.
    pub fn require_str(&self, key: &str) -> Result<&str, ToolExecutionError> {
        self.get_str(key).ok_or_else(|| {
            ToolExecutionError::invalid_argument(format!("'{}' must be a string", key))
        })
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(|v| v.as_f64())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// Argument schema for a single tool.
#[derive(Debug, Clone)]
pub struct ToolSchema {
    tool_name: String,
    required: BTreeSet<String>,
    types: BTreeMap<String, ParamType>,
    coercions: BTreeMap<String, Coercion>,
}

impl ToolSchema {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            required: BTreeSet::new(),
            types: BTreeMap::new(),
            coercions: BTreeMap::new(),
        }
    }

    pub fn required(mut self, key: impl Into<String>, param_type: ParamType) -> Self {
        let key = key.into();
        self.required.insert(key.clone());
        self.types.insert(key, param_type);
        self
    }

    pub fn optional(mut self, key: impl Into<String>, param_type: ParamType) -> Self {
        self.types.insert(key.into(), param_type);
        self
    }

    pub fn with_coercion(mut self, key: impl Into<String>, coercion: Coercion) -> Self {
        self.coercions.insert(key.into(), coercion);
        self
    }

    /// Derive a schema from a tool definition's parameter list.
    pub fn from_definition(definition: &ToolDefinition) -> Self {
        definition
            .parameters
            .iter()
            .fold(Self::new(&definition.name), |schema, param| {
                let schema = if param.required {
                    schema.required(&param.name, param.param_type)
                } else {
                    schema.optional(&param.name, param.param_type)
                };
                match param.coercion {
                    Some(coercion) => schema.with_coercion(&param.name, coercion),
                    None => schema,
                }
            })
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn required_keys(&self) -> impl Iterator<Item = &str> {
        self.required.iter().map(|k| k.as_str())
    }

    pub fn validate(
        &self,
        args: &HashMap<String, Value>,
    ) -> Result<ToolArguments, ValidationError> {
        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|key| !args.contains_key(key.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingArguments(missing));
        }

        let mut normalized = Map::new();
        for (key, expected) in &self.types {
            let Some(raw) = args.get(key) else {
                continue;
            };
            if raw.is_null() {
                normalized.insert(key.clone(), Value::Null);
                continue;
            }

            let coercion = self.coercions.get(key).copied();

            // Numeric strings must become numbers before the type check.
            let value = match (coercion, raw) {
                (Some(Coercion::NumberFromString), Value::String(s)) => parse_number(key, s)?,
                _ => raw.clone(),
            };

            if !expected.accepts(&value) {
                return Err(ValidationError::TypeMismatch {
                    key: key.clone(),
                    expected: *expected,
                    actual: ParamType::name_of(&value),
                });
            }

            let value = match (coercion, value) {
                (Some(Coercion::Trim), Value::String(s)) => Value::String(s.trim().to_string()),
                (Some(Coercion::Uppercase), Value::String(s)) => {
                    Value::String(s.trim().to_uppercase())
                }
                (_, value) => value,
            };
            normalized.insert(key.clone(), value);
        }

        Ok(ToolArguments(normalized))
    }
}

fn parse_number(key: &str, raw: &str) -> Result<Value, ValidationError> {
    let trimmed = raw.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Ok(Value::from(int));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| ValidationError::CoercionFailed {
            key: key.to_string(),
            reason: format!("'{}' is not a number", raw),
        })
}

/// Per-tool schema registry used at dispatch time.
#[derive(Debug, Clone, Default)]
pub struct ArgumentValidator {
    schemas: HashMap<String, ToolSchema>,
}

impl ArgumentValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, schema: ToolSchema) -> Self {
        self.schemas.insert(schema.tool_name.clone(), schema);
        self
    }

    /// One schema per tool in the spec.
    pub fn from_spec(spec: &ToolSpec) -> Self {
        spec.all()
            .fold(Self::new(), |v, def| v.register(ToolSchema::from_definition(def)))
    }

    pub fn has_schema(&self, tool_name: &str) -> bool {
        self.schemas.contains_key(tool_name)
    }

    pub fn validate(
        &self,
        tool_name: &str,
        args: &HashMap<String, Value>,
    ) -> Result<ToolArguments, ValidationError> {
        self.schemas
            .get(tool_name)
            .ok_or_else(|| ValidationError::NoSchema(tool_name.to_string()))?
            .validate(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ToolParameter;
    use serde_json::json;

    fn args(value: Value) -> HashMap<String, Value> {
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => HashMap::new(),
        }
    }

    fn exchange_schema() -> ToolSchema {
        ToolSchema::new("get_exchange_rate")
            .required("source_currency", ParamType::String)
            .required("target_currency", ParamType::String)
            .with_coercion("source_currency", Coercion::Uppercase)
            .with_coercion("target_currency", Coercion::Uppercase)
    }

    #[test]
    fn test_valid_arguments_are_normalized() {
        let validator = ArgumentValidator::new().register(exchange_schema());
        let result = validator
            .validate(
                "get_exchange_rate",
                &args(json!({"source_currency": " usd", "target_currency": "ngn"})),
            )
            .unwrap();

        assert_eq!(result.get_str("source_currency"), Some("USD"));
        assert_eq!(result.get_str("target_currency"), Some("NGN"));
    }

    #[test]
    fn test_no_schema_is_configuration_error() {
        let validator = ArgumentValidator::new();
        let err = validator
            .validate("get_exchange_rate", &HashMap::new())
            .unwrap_err();

        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("no schema registered"));
    }

    #[test]
    fn test_missing_keys_reported_sorted() {
        let schema = ToolSchema::new("t")
            .required("zeta", ParamType::String)
            .required("alpha", ParamType::String)
            .required("mid", ParamType::String);

        let err = schema.validate(&args(json!({"mid": "x"}))).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingArguments(vec!["alpha".to_string(), "zeta".to_string()])
        );
        assert_eq!(err.to_string(), "missing required arguments: alpha, zeta");
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_type_mismatch_names_key_and_types() {
        let err = exchange_schema()
            .validate(&args(json!({"source_currency": 1, "target_currency": "EUR"})))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "argument 'source_currency' expected string, got integer"
        );
    }

    #[test]
    fn test_null_counts_as_present_and_skips_type_check() {
        let result = exchange_schema()
            .validate(&args(json!({"source_currency": null, "target_currency": "eur"})))
            .unwrap();

        assert_eq!(result.get("source_currency"), Some(&Value::Null));
        assert_eq!(result.get_str("target_currency"), Some("EUR"));
    }

    #[test]
    fn test_extra_arguments_are_dropped() {
        let result = exchange_schema()
            .validate(&args(json!({
                "source_currency": "USD",
                "target_currency": "EUR",
                "amount": 5
            })))
            .unwrap();

        assert_eq!(result.len(), 2);
        assert!(!result.contains("amount"));
    }

    #[test]
    fn test_number_from_string_coercion() {
        let schema = ToolSchema::new("convert")
            .required("amount", ParamType::Number)
            .with_coercion("amount", Coercion::NumberFromString);

        let result = schema.validate(&args(json!({"amount": "100"}))).unwrap();
        assert_eq!(result.get("amount"), Some(&json!(100)));

        let result = schema.validate(&args(json!({"amount": "2.5"}))).unwrap();
        assert_eq!(result.get_f64("amount"), Some(2.5));

        let err = schema.validate(&args(json!({"amount": "lots"}))).unwrap_err();
        assert!(matches!(err, ValidationError::CoercionFailed { .. }));
    }

    #[test]
    fn test_no_implicit_coercion() {
        let schema = ToolSchema::new("convert").required("amount", ParamType::Number);
        let err = schema.validate(&args(json!({"amount": "100"}))).unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { .. }));
    }

    #[test]
    fn test_optional_argument_may_be_absent() {
        let schema = ToolSchema::new("search")
            .required("query", ParamType::String)
            .optional("limit", ParamType::Integer);

        let result = schema.validate(&args(json!({"query": "cash flow"}))).unwrap();
        assert!(!result.contains("limit"));

        let err = schema
            .validate(&args(json!({"query": "cash flow", "limit": 2.5})))
            .unwrap_err();
        assert!(err.to_string().contains("expected integer"));
    }

    #[test]
    fn test_from_spec_derives_schemas() {
        let spec = ToolSpec::new().register(
            ToolDefinition::new("verify_company_registry", "Registry lookup").with_parameter(
                ToolParameter::new("company_name", "Company", true).with_coercion(Coercion::Trim),
            ),
        );
        let validator = ArgumentValidator::from_spec(&spec);

        assert!(validator.has_schema("verify_company_registry"));
        let result = validator
            .validate(
                "verify_company_registry",
                &args(json!({"company_name": "  Tesla  "})),
            )
            .unwrap();
        assert_eq!(result.get_str("company_name"), Some("Tesla"));

        let err = validator
            .validate("verify_company_registry", &HashMap::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "missing required arguments: company_name");
    }

    #[test]
    fn test_require_str() {
        let args = ToolArguments::new().with("user_query", "cash flow");
        assert_eq!(args.require_str("user_query").unwrap(), "cash flow");
        assert!(args.require_str("missing").is_err());
    }
}
