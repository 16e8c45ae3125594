//! End-to-end prompt flow tests
//!
//! Exercises template loading, substitution and the OpenRouter client against
//! a counting mock transport, plus the file helpers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use promptllm::error::Result;
use promptllm::files::{read_json, read_text, write_json, write_text};
use promptllm::llm::{
    ApiKey, HttpRequest, HttpResponse, HttpTransport, OpenRouterClient, OpenRouterConfig, parse_json_response,
};
use promptllm::prompt::{PromptLoader, PromptVars};
use promptllm::{PromptError, PromptRunner};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Transport that answers every call with the same response
struct CountingTransport {
    response: HttpResponse,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl HttpTransport for CountingTransport {
    async fn post_json(&self, _request: HttpRequest) -> Result<HttpResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

fn runner_with(prompts_dir: &std::path::Path, status: u16, body: &str) -> (PromptRunner, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let transport = CountingTransport {
        response: HttpResponse::new(status, body),
        calls: calls.clone(),
    };
    let config = OpenRouterConfig::new(ApiKey::parse("sk-or-v1-test").unwrap());
    let client = OpenRouterClient::with_transport(config, transport);
    (PromptRunner::new(PromptLoader::new(prompts_dir), Arc::new(client)), calls)
}

#[tokio::test]
async fn test_template_to_completion() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("dinner.txt"),
        "Give me {{count}} dinners with {{protein}}. Avoid: {{avoid}}.",
    )
    .unwrap();

    let (runner, calls) = runner_with(temp_dir.path(), 200, r#"{"choices":[{"message":{"content":"hello"}}]}"#);
    let vars = PromptVars::new()
        .with("count", 3)
        .with("protein", "chicken")
        .with("avoid", Vec::<String>::new());

    let reply = runner.run_template("dinner.txt", &vars, None).await.unwrap();
    assert_eq!(reply, "hello");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_template_never_reaches_network() {
    let temp_dir = TempDir::new().unwrap();
    let (runner, calls) = runner_with(temp_dir.path(), 200, "{}");

    let err = runner
        .run_template("nope.txt", &PromptVars::new(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, PromptError::NotFound(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_missing_api_key_fails_before_any_request() {
    let calls = Arc::new(AtomicUsize::new(0));
    let result = OpenRouterConfig::from_lookup(|_| None).map(|config| {
        OpenRouterClient::with_transport(
            config,
            CountingTransport {
                response: HttpResponse::new(200, "{}"),
                calls: calls.clone(),
            },
        )
    });

    let err = result.unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unauthorized_reports_status_and_detail() {
    let temp_dir = TempDir::new().unwrap();
    let (runner, calls) = runner_with(temp_dir.path(), 401, r#"{"error":"invalid key"}"#);

    let err = runner.run("hi", None).await.unwrap_err();
    assert!(err.is_request_failed());
    assert!(err.to_string().contains("401"));
    assert!(err.to_string().contains("invalid key"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_completion_json_saved_and_reloaded() {
    let temp_dir = TempDir::new().unwrap();
    let completion = "```json\n[{\"day\": \"Monday\", \"dinner\": \"Chicken tacos\"}]\n```";
    let body = json!({ "choices": [{ "message": { "content": completion } }] }).to_string();
    let (runner, _calls) = runner_with(temp_dir.path(), 200, &body);

    let reply = runner.run("plan my week", None).await.unwrap();
    let plan = parse_json_response(&reply).unwrap();

    let path = temp_dir.path().join("plan.json");
    write_json(&path, &plan).unwrap();
    let restored: Value = read_json(&path).unwrap();
    assert_eq!(restored, json!([{ "day": "Monday", "dinner": "Chicken tacos" }]));
}

#[test]
fn test_text_helpers_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("response.txt");
    write_text(&path, "Lemon garlic chicken\nChicken fried rice").unwrap();
    assert_eq!(read_text(&path).unwrap(), "Lemon garlic chicken\nChicken fried rice");
}

#[test]
fn test_bundled_templates_load() {
    let loader = PromptLoader::default();
    let available = loader.list_available().unwrap();
    assert!(available.contains(&"dinner_ideas.txt".to_string()));

    let template = loader.load("dinner_ideas.txt").unwrap();
    assert!(template.contains("{{protein}}"));
    assert_eq!(template, template.trim());
}
