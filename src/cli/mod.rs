//! CLI module for promptllm - command-line interface and subcommands.
//!
//! With no subcommand the binary runs a single demo prompt; subcommands send
//! ad-hoc prompts or render templates from the prompts directory.

pub mod commands;

pub use commands::Cli;
