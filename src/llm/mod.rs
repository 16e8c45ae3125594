//! LLM Client Layer - OpenRouter chat-completion integration
//!
//! This module provides:
//! - Request/response types for the chat-completion endpoint
//! - LlmClient trait for API abstraction
//! - OpenRouterClient implementation over a pluggable HTTP transport
//! - Helpers for parsing JSON out of completion text

pub mod client;
pub mod openrouter;
pub mod parse;
pub mod transport;
pub mod types;

pub use client::{LlmClient, MockLlmClient};
pub use openrouter::{
    API_KEY_ENV, API_KEY_ENV_FALLBACK, ApiKey, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT, MODEL_ENV,
    OPENROUTER_URL, OpenRouterClient, OpenRouterConfig,
};
pub use parse::{parse_json_response, strip_code_fence};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{ChatRequest, ChatResponse, CompletionRequest, Message, Role};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_exports() {
        let _role = Role::User;
        let _request = CompletionRequest::new("hi");
        assert_eq!(DEFAULT_TEMPERATURE, 0.7);
    }
}
