use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `lexa` binary.
#[derive(Debug, Parser)]
#[command(name = "lexa", version, about = "Lexa - legal research over a local citation lake")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: text, json, raw
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Max citations to return (overrides the configured limits)
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Dotenv file to load instead of `./.env`
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            env_file: self.env_file.clone(),
        }
    }
}
