use eyre::{Context, Result};
use promptllm::llm::{API_KEY_ENV, OPENROUTER_URL, OpenRouterConfig};
use promptllm::prompt::PromptLoader;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub llm: LlmConfig,
    pub prompts: PromptsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Falls back to OPENROUTER_MODEL, then the built-in default, when unset
    pub model: Option<String>,
    pub endpoint: String,
    pub temperature: f64,
    pub timeout_ms: u64,
    /// Environment variable the API key is read from
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: None,
            endpoint: OPENROUTER_URL.to_string(),
            temperature: 0.7,
            timeout_ms: 30000,
            api_key_env: API_KEY_ENV.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Defaults to the prompts/ directory shipped with the crate
    pub dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            llm: LlmConfig::default(),
            prompts: PromptsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Environment variable the API key is read from
    pub fn api_key_env(&self) -> &str {
        let name = self.llm.api_key_env.trim();
        if name.is_empty() { API_KEY_ENV } else { name }
    }

    /// Prompt loader for the configured (or built-in) prompts directory
    pub fn prompt_loader(&self) -> PromptLoader {
        match &self.prompts.dir {
            Some(dir) => PromptLoader::new(dir),
            None => PromptLoader::default(),
        }
    }

    /// Client configuration from this file plus the process environment
    pub fn openrouter_config(&self) -> promptllm::Result<OpenRouterConfig> {
        self.openrouter_config_with(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::openrouter_config`] with an explicit variable lookup.
    ///
    /// Fails with a configuration error when no API key is available.
    pub fn openrouter_config_with<F>(&self, lookup: F) -> promptllm::Result<OpenRouterConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = OpenRouterConfig::from_lookup_with_key_env(self.api_key_env(), lookup)?
            .with_endpoint(self.llm.endpoint.clone())
            .with_temperature(self.llm.temperature)
            .with_timeout(Duration::from_millis(self.llm.timeout_ms));

        if let Some(model) = &self.llm.model {
            config = config.with_model(model.clone());
        }
        Ok(config)
    }
}
