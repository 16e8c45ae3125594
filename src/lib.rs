//! promptllm - prompt templates and an OpenRouter chat-completion client
//!
//! Loads `{{placeholder}}` templates from a prompts directory, fills them in
//! with typed values and sends the result to a chat-completion endpoint. Also
//! carries small helpers for reading and writing text and JSON files.

pub mod error;
pub mod files;
pub mod llm;
pub mod prompt;
pub mod runner;

pub use error::{PromptError, Result};
pub use runner::PromptRunner;
