//! Prompt runner - load a template, fill it in, send it to the LLM

use std::sync::Arc;

use log::info;

use crate::error::Result;
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompt::{PromptLoader, PromptVars, substitute};

/// Composes the prompt loader, substitution and an LLM client
pub struct PromptRunner {
    loader: PromptLoader,
    llm: Arc<dyn LlmClient>,
}

impl PromptRunner {
    pub fn new(loader: PromptLoader, llm: Arc<dyn LlmClient>) -> Self {
        Self { loader, llm }
    }

    pub fn loader(&self) -> &PromptLoader {
        &self.loader
    }

    /// Load `filename` and substitute `vars`, without calling the LLM
    pub fn render_template(&self, filename: &str, vars: &PromptVars) -> Result<String> {
        let template = self.loader.load(filename)?;
        Ok(substitute(&template, vars))
    }

    /// Send a ready-made prompt
    pub async fn run(&self, prompt: &str, model: Option<&str>) -> Result<String> {
        let mut request = CompletionRequest::new(prompt);
        if let Some(model) = model {
            request = request.with_model(model);
        }
        self.llm.complete(request).await
    }

    /// Load `filename`, substitute `vars` and send the result
    pub async fn run_template(&self, filename: &str, vars: &PromptVars, model: Option<&str>) -> Result<String> {
        let prompt = self.render_template(filename, vars)?;
        info!(
            "Running template {} with model {}",
            filename,
            model.unwrap_or(self.llm.model())
        );
        self.run(&prompt, model).await
    }
}
