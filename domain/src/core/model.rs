//! Model value object representing an LLM model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Known LLM models (Value Object)
///
/// Unknown identifiers are carried as [`Model::Custom`], so any model a
/// provider accepts can be configured.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    // Groq-hosted models
    Llama33Versatile,
    Llama31Instant,
    Groq1,
    // Gemini models
    Gemini25Flash,
    Gemini25Pro,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Llama33Versatile => "llama-3.3-70b-versatile",
            Model::Llama31Instant => "llama-3.1-8b-instant",
            Model::Groq1 => "groq-1.0",
            Model::Gemini25Flash => "gemini-2.5-flash",
            Model::Gemini25Pro => "gemini-2.5-pro",
            Model::Custom(s) => s,
        }
    }

    /// Lighter-weight models tried, in order, when Groq rate-limits a request
    pub fn groq_rate_limit_fallbacks() -> Vec<Model> {
        vec![Model::Llama31Instant, Model::Llama33Versatile, Model::Groq1]
    }

    /// Check if this is a Gemini model (by identifier, including custom ones)
    pub fn is_gemini(&self) -> bool {
        match self {
            Model::Gemini25Flash | Model::Gemini25Pro => true,
            Model::Custom(s) => s.to_ascii_lowercase().contains("gemini"),
            _ => false,
        }
    }
}

impl Default for Model {
    /// Returns the default model (llama-3.3-70b-versatile)
    fn default() -> Self {
        Model::Llama33Versatile
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "llama-3.3-70b-versatile" => Model::Llama33Versatile,
            "llama-3.1-8b-instant" => Model::Llama31Instant,
            "groq-1.0" => Model::Groq1,
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Model::from(s.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_roundtrip() {
        for model in Model::groq_rate_limit_fallbacks() {
            let s = model.to_string();
            let parsed: Model = s.parse().unwrap();
            assert_eq!(model, parsed);
        }
    }

    #[test]
    fn test_custom_model() {
        let model: Model = "mixtral-8x7b".parse().unwrap();
        assert_eq!(model, Model::Custom("mixtral-8x7b".to_string()));
        assert_eq!(model.to_string(), "mixtral-8x7b");
    }

    #[test]
    fn test_gemini_detection() {
        assert!(Model::Gemini25Flash.is_gemini());
        assert!(Model::from("Gemini-1.5-pro").is_gemini());
        assert!(!Model::Llama33Versatile.is_gemini());
        assert!(!Model::from("llama-3.1-8b-instant").is_gemini());
    }

    #[test]
    fn test_model_default() {
        assert_eq!(Model::default(), Model::Llama33Versatile);
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Model::Gemini25Flash).unwrap();
        assert_eq!(json, "\"gemini-2.5-flash\"");
        let parsed: Model = serde_json::from_str("\"groq-1.0\"").unwrap();
        assert_eq!(parsed, Model::Groq1);
    }
}
