//! Prompt System - Template loading and rendering
//!
//! This module provides functionality for loading prompt templates from files
//! and substituting `{{key}}` placeholders with typed values.

mod loader;
mod render;

pub use loader::{PROMPTS_DIR_NAME, PromptLoader};
pub use render::{EMPTY_LIST_TEXT, PromptValue, PromptVars, placeholders, substitute};
