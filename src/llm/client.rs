//! LLM client trait and a mock implementation for tests

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::Result;
use crate::llm::types::CompletionRequest;

/// Stateless LLM client - each call is independent (fresh context)
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one prompt and return the completion text
    async fn complete(&self, request: CompletionRequest) -> Result<String>;

    /// Model used when a request does not name one
    fn model(&self) -> &str;
}

/// Mock client that returns a fixed reply and records every request
#[derive(Debug)]
pub struct MockLlmClient {
    reply: String,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new("mock response")
    }
}

impl MockLlmClient {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).push(request);
        Ok(self.reply.clone())
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_requests() {
        let mock = MockLlmClient::new("hello");
        assert_eq!(mock.call_count(), 0);

        let reply = mock.complete(CompletionRequest::new("hi")).await.unwrap();
        assert_eq!(reply, "hello");
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.requests()[0].prompt, "hi");
    }

    #[test]
    fn test_mock_model() {
        assert_eq!(MockLlmClient::default().model(), "mock-model");
    }
}
