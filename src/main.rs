use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use promptllm::PromptError;
use promptllm::PromptRunner;
use promptllm::llm::OpenRouterClient;

mod cli;
mod config;

use cli::Cli;
use cli::commands::{Commands, VarArgs};
use config::Config;

const DEMO_PROMPT: &str = "Give me three quick dinner ideas using chicken.";

fn setup_logging(level: Option<&str>) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("promptllm")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("promptllm.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var_os("RUST_LOG").is_none()
        && let Some(level) = level
    {
        builder.parse_filters(level);
    }
    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Build the runner; fails with a configuration error when no API key is set
fn build_runner(config: &Config) -> promptllm::Result<PromptRunner> {
    let client = OpenRouterClient::new(config.openrouter_config()?)?;
    Ok(PromptRunner::new(config.prompt_loader(), Arc::new(client)))
}

async fn run_application(cli: &Cli, config: &Config) -> promptllm::Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let model = cli.model.as_deref();
    match &cli.command {
        None => handle_ask_command(DEMO_PROMPT, model, config).await,
        Some(Commands::Ask { prompt }) => handle_ask_command(prompt, model, config).await,
        Some(Commands::Template { file, vars }) => handle_template_command(file, vars, model, config).await,
        Some(Commands::Render { file, vars }) => handle_render_command(file, vars, config),
        Some(Commands::List) => handle_list_command(config),
    }
}

async fn handle_ask_command(prompt: &str, model: Option<&str>, config: &Config) -> promptllm::Result<()> {
    info!("Sending prompt ({} bytes)", prompt.len());
    let runner = build_runner(config)?;
    let response = runner.run(prompt, model).await?;
    println!("{} {}", "Prompt:".green(), prompt);
    println!("{} {}", "Response:".green(), response);
    Ok(())
}

async fn handle_template_command(
    file: &str,
    vars: &VarArgs,
    model: Option<&str>,
    config: &Config,
) -> promptllm::Result<()> {
    info!("Running template: {}", file);
    let runner = build_runner(config)?;
    let vars = vars.to_prompt_vars();
    let prompt = runner.render_template(file, &vars)?;
    println!("{} {}", "Prompt:".green(), prompt);
    let response = runner.run_template(file, &vars, model).await?;
    println!("{} {}", "Response:".green(), response);
    Ok(())
}

fn handle_render_command(file: &str, vars: &VarArgs, config: &Config) -> promptllm::Result<()> {
    info!("Rendering template: {}", file);
    let template = config.prompt_loader().load(file)?;
    println!("{}", promptllm::prompt::substitute(&template, &vars.to_prompt_vars()));
    Ok(())
}

fn handle_list_command(config: &Config) -> promptllm::Result<()> {
    let loader = config.prompt_loader();
    info!("Listing templates in {}", loader.prompts_dir().display());
    println!("{} {}", "Templates in".cyan(), loader.prompts_dir().display());
    for name in loader.list_available()? {
        println!("  {}", name);
    }
    Ok(())
}

/// Lines shown to the user for a failure; the first one carries the category
fn error_lines(err: &PromptError, key_env: &str) -> Vec<String> {
    if err.is_configuration() {
        return vec![format!("Configuration error: {}", err)];
    }
    if err.is_request_failed() || matches!(err, PromptError::MalformedResponse(_)) {
        let mut lines = vec![format!("Request failed: {}", err)];
        if err.status() == Some(401) {
            lines.push(format!(
                "Hint: Check that {} in .env is correct. Get a key at https://openrouter.ai/keys",
                key_env
            ));
        }
        return lines;
    }
    vec![format!("Error: {}", err)]
}

fn report_error(err: &PromptError, key_env: &str) {
    for line in error_lines(err, key_env) {
        match line.split_once(": ") {
            Some((label, rest)) if label == "Hint" => eprintln!("{} {}", "Hint:".yellow(), rest),
            Some((label, rest)) => eprintln!("{} {}", format!("{}:", label).red(), rest),
            None => eprintln!("{}", line),
        }
    }
}

/// `.env` locations tried in order: next to the crate, then the working directory
fn dotenv_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![Path::new(env!("CARGO_MANIFEST_DIR")).join(".env")];
    if let Ok(cwd) = std::env::current_dir() {
        let local = cwd.join(".env");
        if !candidates.contains(&local) {
            candidates.push(local);
        }
    }
    candidates
}

fn load_dotenv() {
    for path in dotenv_candidates() {
        if dotenvy::from_path(&path).is_ok() {
            return;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the environment may already carry the key
    load_dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(config.log_level.as_deref()).context("Failed to setup logging")?;
    info!("Starting with config from: {:?}", cli.config);

    if let Err(err) = run_application(&cli, &config).await {
        log::error!("Application failed: {}", err);
        report_error(&err, config.api_key_env());
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_lines() {
        let err = PromptError::Configuration("OPENROUTER_API_KEY is not set".to_string());
        let lines = error_lines(&err, "OPENROUTER_API_KEY");
        assert_eq!(lines, vec!["Configuration error: OPENROUTER_API_KEY is not set".to_string()]);
    }

    #[test]
    fn test_unauthorized_lines_include_key_hint() {
        let err = PromptError::RequestFailed {
            status: Some(401),
            detail: "invalid key".to_string(),
        };
        let lines = error_lines(&err, "MY_ROUTER_KEY");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Request failed: OpenRouter request failed (401): invalid key");
        assert!(lines[1].starts_with("Hint: Check that MY_ROUTER_KEY in .env"));
    }

    #[test]
    fn test_server_error_lines_have_no_hint() {
        let err = PromptError::RequestFailed {
            status: Some(500),
            detail: "upstream exploded, see ticket 401".to_string(),
        };
        let lines = error_lines(&err, "OPENROUTER_API_KEY");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Request failed: "));
    }

    #[test]
    fn test_malformed_response_is_request_failure() {
        let err = PromptError::MalformedResponse("missing choices".to_string());
        let lines = error_lines(&err, "OPENROUTER_API_KEY");
        assert_eq!(lines, vec!["Request failed: Malformed response: missing choices".to_string()]);
    }

    #[test]
    fn test_not_found_lines() {
        let err = PromptError::NotFound(PathBuf::from("/tmp/prompts/missing.txt"));
        let lines = error_lines(&err, "OPENROUTER_API_KEY");
        assert_eq!(lines, vec!["Error: Prompt file not found: /tmp/prompts/missing.txt".to_string()]);
    }

    #[test]
    fn test_dotenv_prefers_crate_directory() {
        let candidates = dotenv_candidates();
        assert_eq!(candidates[0], Path::new(env!("CARGO_MANIFEST_DIR")).join(".env"));
        assert!(candidates.iter().all(|path| path.is_absolute() && path.ends_with(".env")));
    }
}
