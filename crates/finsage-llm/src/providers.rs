//! Chat backend implementations

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::*;

/// Trait for remote chat backends
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Get the backend name
    fn name(&self) -> &'static str;

    /// Get the backend kind
    fn kind(&self) -> BackendKind;

    /// Whether the credentials this backend needs are present
    fn is_configured(&self) -> bool;

    /// Answer an assembled prompt.
    ///
    /// Never fails: missing configuration, network trouble, and undecodable
    /// replies all come back as descriptive text in place of an answer.
    async fn answer(&self, request: AnswerRequest) -> String;
}

// ============================================================================
// Granite Backend (hosted inference endpoint)
// ============================================================================

/// Model served when no override is configured.
pub const DEFAULT_GRANITE_MODEL: &str = "ibm-granite/granite-3.3-2b-instruct";

const INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Single-attempt bound on the generation request.
const INFERENCE_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the Granite inference backend
#[derive(Debug, Clone)]
pub struct GraniteConfig {
    pub api_token: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl Default for GraniteConfig {
    fn default() -> Self {
        Self {
            api_token: std::env::var("HUGGINGFACE_API_TOKEN").ok(),
            base_url: INFERENCE_BASE_URL.to_string(),
            model: std::env::var("GRANITE_MODEL")
                .unwrap_or_else(|_| DEFAULT_GRANITE_MODEL.to_string()),
        }
    }
}

/// Hosted language-model inference backend
pub struct GraniteBackend {
    config: GraniteConfig,
    client: reqwest::Client,
}

impl GraniteBackend {
    pub fn new(config: GraniteConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(GraniteConfig::default())
    }

    /// Send one generation request and extract the generated text.
    ///
    /// All failure paths return a readable string in place of the answer.
    pub async fn generate(&self, request: &AnswerRequest) -> String {
        let token = match self.config.api_token.as_deref() {
            Some(token) => token,
            None => return "ERROR: HUGGINGFACE API token not set.".to_string(),
        };

        match self.try_generate(token, request).await {
            Ok(text) => text,
            Err(e) => {
                warn!("granite call absorbed a failure: {}", e);
                format!("Exception calling Hugging Face Inference API: {}", e)
            }
        }
    }

    async fn try_generate(&self, token: &str, request: &AnswerRequest) -> Result<String> {
        let model = request.model.as_deref().unwrap_or(&self.config.model);
        let url = format!("{}/{}", self.config.base_url, model);

        let payload = InferenceRequest {
            inputs: &request.prompt,
            parameters: InferenceParameters {
                max_new_tokens: request.max_new_tokens,
                temperature: request.temperature,
            },
            options: InferenceOptions { use_cache: false },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&payload)
            .timeout(INFERENCE_TIMEOUT)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::RequestFailed {
                message: format!("HTTP {}", status),
            });
        }

        let body: serde_json::Value =
            response.json().await.map_err(|e| LlmError::InvalidResponse {
                message: e.to_string(),
            })?;

        Ok(extract_generated_text(body))
    }
}

#[async_trait]
impl ChatBackend for GraniteBackend {
    fn name(&self) -> &'static str {
        "Granite"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Granite
    }

    fn is_configured(&self) -> bool {
        self.config.api_token.is_some()
    }

    async fn answer(&self, request: AnswerRequest) -> String {
        self.generate(&request).await
    }
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct InferenceOptions {
    use_cache: bool,
}

/// The two documented reply shapes, plus a fallback for everything else.
#[derive(Deserialize)]
#[serde(untagged)]
enum InferenceReply {
    Batch(Vec<Generation>),
    Single(Generation),
    Other(serde_json::Value),
}

#[derive(Deserialize)]
struct Generation {
    generated_text: String,
}

/// Pull generated text out of either documented reply shape.
///
/// Anything that matches neither shape comes back as the raw serialized
/// body, so no data is silently dropped.
fn extract_generated_text(body: serde_json::Value) -> String {
    match serde_json::from_value::<InferenceReply>(body.clone()) {
        Ok(InferenceReply::Batch(generations)) => generations
            .into_iter()
            .next()
            .map(|generation| generation.generated_text)
            .unwrap_or_else(|| body.to_string()),
        Ok(InferenceReply::Single(generation)) => generation.generated_text,
        _ => body.to_string(),
    }
}

// ============================================================================
// Watson Backend (dialogue-session service)
// ============================================================================

/// Pinned Assistant API version date.
const WATSON_API_VERSION: &str = "2024-10-01";

/// Basic-auth username the Assistant service expects.
const WATSON_AUTH_USER: &str = "apikey";

/// Bound on session creation and message exchange.
const SESSION_TIMEOUT: Duration = Duration::from_secs(20);
/// Bound on the best-effort session teardown.
const TEARDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the Watson Assistant backend
#[derive(Debug, Clone, Default)]
pub struct WatsonConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub assistant_id: Option<String>,
}

impl WatsonConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("WATSON_APIKEY").ok(),
            base_url: std::env::var("WATSON_URL").ok(),
            assistant_id: std::env::var("WATSON_ASSISTANT_ID").ok(),
        }
    }

    /// All three values, or `None` if any is missing.
    fn credentials(&self) -> Option<(&str, &str, &str)> {
        Some((
            self.api_key.as_deref()?,
            self.base_url.as_deref()?,
            self.assistant_id.as_deref()?,
        ))
    }
}

/// Dialogue-session backend (Assistant v2 REST surface)
pub struct WatsonBackend {
    config: WatsonConfig,
    client: reqwest::Client,
}

impl WatsonBackend {
    pub fn new(config: WatsonConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(WatsonConfig::from_env())
    }

    /// Run one create-session / message / teardown exchange.
    ///
    /// All failure paths return a readable string in place of the answer.
    pub async fn send_message(&self, message: &str) -> String {
        let (api_key, base_url, assistant_id) = match self.config.credentials() {
            Some(credentials) => credentials,
            None => return "Watson not configured.".to_string(),
        };

        match self.try_send(api_key, base_url, assistant_id, message).await {
            Ok(text) => text,
            Err(e) => {
                warn!("watson call absorbed a failure: {}", e);
                format!("Exception calling Watson Assistant: {}", e)
            }
        }
    }

    async fn try_send(
        &self,
        api_key: &str,
        base_url: &str,
        assistant_id: &str,
        message: &str,
    ) -> Result<String> {
        let session_id = self.create_session(api_key, base_url, assistant_id).await?;
        debug!("watson session created: {}", session_id);

        let body = self
            .post_message(api_key, base_url, assistant_id, &session_id, message)
            .await?;

        // Best-effort teardown; the outcome is not part of the contract.
        self.delete_session(api_key, base_url, assistant_id, &session_id)
            .await;

        Ok(collect_text_segments(&body))
    }

    async fn create_session(
        &self,
        api_key: &str,
        base_url: &str,
        assistant_id: &str,
    ) -> Result<String> {
        let url = format!(
            "{}/v2/assistants/{}/sessions?version={}",
            base_url, assistant_id, WATSON_API_VERSION
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(WATSON_AUTH_USER, Some(api_key))
            .timeout(SESSION_TIMEOUT)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::RequestFailed {
                message: format!("HTTP {} creating session", status),
            });
        }

        let body: serde_json::Value =
            response.json().await.map_err(|e| LlmError::InvalidResponse {
                message: e.to_string(),
            })?;

        body.get("session_id")
            .and_then(|id| id.as_str())
            .map(|id| id.to_string())
            .ok_or_else(|| LlmError::InvalidResponse {
                message: "session response carried no session_id".to_string(),
            })
    }

    async fn post_message(
        &self,
        api_key: &str,
        base_url: &str,
        assistant_id: &str,
        session_id: &str,
        message: &str,
    ) -> Result<serde_json::Value> {
        let url = format!(
            "{}/v2/assistants/{}/sessions/{}/message?version={}",
            base_url, assistant_id, session_id, WATSON_API_VERSION
        );

        let payload = MessageRequest {
            input: MessageInput {
                message_type: "text",
                text: message,
            },
        };

        let response = self
            .client
            .post(&url)
            .basic_auth(WATSON_AUTH_USER, Some(api_key))
            .json(&payload)
            .timeout(SESSION_TIMEOUT)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlmError::RequestFailed {
                message: format!("HTTP {} sending message", status),
            });
        }

        response.json().await.map_err(|e| LlmError::InvalidResponse {
            message: e.to_string(),
        })
    }

    /// Fire-and-forget DELETE; failures are logged and discarded.
    async fn delete_session(
        &self,
        api_key: &str,
        base_url: &str,
        assistant_id: &str,
        session_id: &str,
    ) {
        let url = format!(
            "{}/v2/assistants/{}/sessions/{}?version={}",
            base_url, assistant_id, session_id, WATSON_API_VERSION
        );

        let result = self
            .client
            .delete(&url)
            .basic_auth(WATSON_AUTH_USER, Some(api_key))
            .timeout(TEARDOWN_TIMEOUT)
            .send()
            .await;

        if let Err(e) = result {
            debug!("watson session teardown ignored: {}", e);
        }
    }
}

#[async_trait]
impl ChatBackend for WatsonBackend {
    fn name(&self) -> &'static str {
        "Watson Assistant"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Watson
    }

    fn is_configured(&self) -> bool {
        self.config.credentials().is_some()
    }

    /// Model and sampling options are managed server-side by the assistant;
    /// only the prompt text travels.
    async fn answer(&self, request: AnswerRequest) -> String {
        self.send_message(&request.prompt).await
    }
}

#[derive(Serialize)]
struct MessageRequest<'a> {
    input: MessageInput<'a>,
}

#[derive(Serialize)]
struct MessageInput<'a> {
    message_type: &'a str,
    text: &'a str,
}

/// Keep plain-text generic entries in reply order, newline-joined.
///
/// A reply with no text entries comes back as the raw serialized body.
fn collect_text_segments(body: &serde_json::Value) -> String {
    let texts: Vec<&str> = body
        .get("output")
        .and_then(|output| output.get("generic"))
        .and_then(|generic| generic.as_array())
        .map(|entries| {
            entries
                .iter()
                .filter(|entry| {
                    entry.get("response_type").and_then(|t| t.as_str()) == Some("text")
                })
                .map(|entry| entry.get("text").and_then(|t| t.as_str()).unwrap_or(""))
                .collect()
        })
        .unwrap_or_default();

    if texts.is_empty() {
        body.to_string()
    } else {
        texts.join("\n")
    }
}
