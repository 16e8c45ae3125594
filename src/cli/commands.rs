//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - ask: send a prompt as-is
//! - template: render a prompt template and send it
//! - render: print a rendered template without calling the API
//! - list: list available templates

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use promptllm::prompt::{PromptValue, PromptVars};

/// promptllm - prompt templates against an OpenRouter model
#[derive(Parser, Debug)]
#[command(name = "promptllm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Model to use instead of the configured default
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Subcommand to execute (runs the demo prompt when omitted)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a prompt to the model
    Ask {
        /// Prompt text
        prompt: String,
    },

    /// Render a template from the prompts directory and send it
    Template {
        /// Template file name (e.g. dinner_ideas.txt)
        file: String,

        #[command(flatten)]
        vars: VarArgs,
    },

    /// Print a rendered template without calling the model
    Render {
        /// Template file name
        file: String,

        #[command(flatten)]
        vars: VarArgs,
    },

    /// List templates in the prompts directory
    List,
}

/// Placeholder values supplied on the command line
#[derive(Args, Debug, Default)]
pub struct VarArgs {
    /// Text value, as key=value (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub vars: Vec<(String, String)>,

    /// List value, as key=a,b,c (repeatable; key= gives an empty list)
    #[arg(long = "list", value_name = "KEY=A,B", value_parser = parse_key_value)]
    pub lists: Vec<(String, String)>,
}

impl VarArgs {
    pub fn to_prompt_vars(&self) -> PromptVars {
        let mut vars = PromptVars::new();
        for (key, value) in &self.vars {
            vars.insert(key.clone(), value.as_str());
        }
        for (key, value) in &self.lists {
            let items: Vec<String> = value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect();
            vars.insert(key.clone(), PromptValue::List(items));
        }
        vars
    }
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}
