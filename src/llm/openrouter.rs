//! OpenRouter chat-completion client
//!
//! One POST per prompt, bearer-token auth, no retries and no streaming. The API
//! key is validated once when the [`OpenRouterConfig`] is built, so a client
//! can never reach the network without one.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;

use crate::error::{PromptError, Result};
use crate::llm::client::LlmClient;
use crate::llm::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::llm::types::{ChatRequest, ChatResponse, CompletionRequest};

/// OpenRouter chat-completion endpoint
pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model to use
pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-70b-instruct";

/// Sampling temperature sent with every request
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Read when [`API_KEY_ENV`] is unset
pub const API_KEY_ENV_FALLBACK: &str = "OPENROUTER_KEY";

/// Optional environment override for [`DEFAULT_MODEL`]
pub const MODEL_ENV: &str = "OPENROUTER_MODEL";

/// A non-empty API key
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Trim surrounding whitespace, then any leading/trailing `"` and `'`.
    ///
    /// Values copied out of `.env` files often keep their quotes.
    pub fn parse(raw: &str) -> Result<Self> {
        let key = raw.trim().trim_matches('"').trim_matches('\'');
        if key.is_empty() {
            return Err(missing_key_error(API_KEY_ENV));
        }
        Ok(Self(key.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

fn missing_key_error(env_var: &str) -> PromptError {
    PromptError::Configuration(format!(
        "{env_var} is not set. Add it to a .env file in this directory, e.g.:\n  \
         {env_var}=sk-or-v1-your-key-here\n\
         Get a key at https://openrouter.ai/keys"
    ))
}

/// Configuration for the OpenRouter client
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    pub api_key: ApiKey,
    pub model: String,
    pub endpoint: String,
    pub temperature: f64,
    pub timeout: Duration,
}

impl OpenRouterConfig {
    /// Config with default model, endpoint, temperature and timeout
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            endpoint: OPENROUTER_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup
    ///
    /// The key comes from `OPENROUTER_API_KEY`, falling back to `OPENROUTER_KEY`
    /// only when the first is unset. `OPENROUTER_MODEL` overrides the default model.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup_with_key_env(API_KEY_ENV, lookup)
    }

    /// Same as [`OpenRouterConfig::from_lookup`] with the key read from `key_env`.
    ///
    /// `OPENROUTER_KEY` is only consulted when `key_env` is `OPENROUTER_API_KEY`;
    /// a missing key is reported under `key_env`.
    pub fn from_lookup_with_key_env<F>(key_env: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = match lookup(key_env) {
            Some(raw) => raw,
            None if key_env == API_KEY_ENV => lookup(API_KEY_ENV_FALLBACK).unwrap_or_default(),
            None => String::new(),
        };
        let api_key = ApiKey::parse(&raw).map_err(|_| missing_key_error(key_env))?;
        let mut config = Self::new(api_key);

        if let Some(model) = lookup(MODEL_ENV).map(|m| m.trim().to_string())
            && !model.is_empty()
        {
            config.model = model;
        }
        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// OpenRouter API client
pub struct OpenRouterClient<T: HttpTransport = ReqwestTransport> {
    transport: T,
    config: OpenRouterConfig,
}

impl OpenRouterClient<ReqwestTransport> {
    /// Create a client backed by reqwest
    pub fn new(config: OpenRouterConfig) -> Result<Self> {
        Ok(Self::with_transport(config, ReqwestTransport::new()?))
    }

    /// Create a client from the process environment
    pub fn from_env() -> Result<Self> {
        Self::new(OpenRouterConfig::from_env()?)
    }
}

impl<T: HttpTransport> OpenRouterClient<T> {
    /// Create a client with an explicit transport
    pub fn with_transport(config: OpenRouterConfig, transport: T) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the request body for the chat-completion endpoint
    fn build_request(&self, prompt: &str, model: Option<&str>) -> ChatRequest {
        let model = model.unwrap_or(self.config.model.as_str());
        ChatRequest::user(model, prompt, self.config.temperature)
    }

    fn build_http_request(&self, chat: &ChatRequest) -> Result<HttpRequest> {
        Ok(HttpRequest {
            url: self.config.endpoint.clone(),
            headers: vec![
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", self.config.api_key.expose()),
                ),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body: serde_json::to_value(chat)?,
            timeout: self.config.timeout,
        })
    }

    /// Send `prompt` as a single user message and return the first completion
    pub async fn prompt(&self, prompt: &str, model: Option<&str>) -> Result<String> {
        let chat = self.build_request(prompt, model);
        debug!(
            "Sending chat completion: model={} prompt_len={}",
            chat.model,
            prompt.len()
        );

        let response = self.transport.post_json(self.build_http_request(&chat)?).await?;
        parse_response(response)
    }
}

/// Turn a raw HTTP response into the completion text
fn parse_response(response: HttpResponse) -> Result<String> {
    if !response.is_success() {
        let detail = error_detail(&response);
        warn!("Chat completion failed with status {}: {}", response.status, detail);
        return Err(PromptError::RequestFailed {
            status: Some(response.status),
            detail,
        });
    }

    let parsed: ChatResponse = serde_json::from_str(&response.body)
        .map_err(|e| PromptError::MalformedResponse(format!("unexpected response body: {}", e)))?;

    let content = parsed.first_content().ok_or_else(|| {
        PromptError::MalformedResponse("response missing choices[0].message.content".to_string())
    })?;

    debug!("Received completion ({} bytes)", content.len());
    Ok(content.to_string())
}

/// Server-provided error detail: JSON when it parses, raw text otherwise
fn error_detail(response: &HttpResponse) -> String {
    if response.body.trim().is_empty() {
        return reqwest::StatusCode::from_u16(response.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown error")
            .to_string();
    }

    match serde_json::from_str::<Value>(&response.body) {
        Ok(Value::String(text)) => text,
        Ok(json) => json.to_string(),
        Err(_) => response.body.clone(),
    }
}

#[async_trait]
impl<T: HttpTransport> LlmClient for OpenRouterClient<T> {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.prompt(&request.prompt, request.model.as_deref()).await
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

impl<T: HttpTransport> fmt::Debug for OpenRouterClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("model", &self.config.model)
            .field("endpoint", &self.config.endpoint)
            .finish()
    }
}
