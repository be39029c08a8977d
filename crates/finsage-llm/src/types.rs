//! Common types for backend interactions

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while talking to a backend.
///
/// These stay internal to the crate: the public answer operations absorb
/// every failure into a descriptive reply string.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("request failed: {message}")]
    RequestFailed { message: String },

    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("network error: {message}")]
    NetworkError { message: String },
}

pub type Result<T> = std::result::Result<T, LlmError>;

/// Default cap on generated tokens for a single answer.
pub const DEFAULT_MAX_NEW_TOKENS: u32 = 300;
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// A fully assembled prompt headed for a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
    /// The assembled instruction prompt.
    pub prompt: String,
    /// Model override (honored by the inference backend only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Cap on generated tokens.
    pub max_new_tokens: u32,
    /// Sampling temperature (0.0-2.0).
    pub temperature: f32,
}

impl AnswerRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: None,
            max_new_tokens: DEFAULT_MAX_NEW_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Backend kind for routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Hosted language-model inference endpoint (Granite)
    Granite,
    /// Dialogue-session assistant service (Watson)
    Watson,
}

impl BackendKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "granite" | "huggingface" | "hf" | "inference" => Some(Self::Granite),
            "watson" | "assistant" => Some(Self::Watson),
            _ => None,
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Granite => write!(f, "granite"),
            Self::Watson => write!(f, "watson"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_request_defaults() {
        let request = AnswerRequest::new("prompt");
        assert_eq!(request.max_new_tokens, DEFAULT_MAX_NEW_TOKENS);
        assert_eq!(request.temperature, DEFAULT_TEMPERATURE);
        assert!(request.model.is_none());
    }

    #[test]
    fn test_answer_request_builders() {
        let request = AnswerRequest::new("prompt")
            .with_model("ibm-granite/granite-3.3-8b-instruct")
            .with_max_new_tokens(400)
            .with_temperature(0.7);
        assert_eq!(request.model.as_deref(), Some("ibm-granite/granite-3.3-8b-instruct"));
        assert_eq!(request.max_new_tokens, 400);
        assert_eq!(request.temperature, 0.7);
    }

    #[test]
    fn test_backend_kind_parsing() {
        assert_eq!(BackendKind::from_str("granite"), Some(BackendKind::Granite));
        assert_eq!(BackendKind::from_str("hf"), Some(BackendKind::Granite));
        assert_eq!(BackendKind::from_str("Watson"), Some(BackendKind::Watson));
        assert_eq!(BackendKind::from_str("assistant"), Some(BackendKind::Watson));
        assert_eq!(BackendKind::from_str("unknown"), None);
    }
}
