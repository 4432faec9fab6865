//! Command-line arguments and subcommand handlers.

use clap::{Args, Parser, Subcommand};
use explorer::ExplorerConfig;
use explorer_core::{GenerationParameters, LogFormat, UploadedAsset};
use explorer_error::ExplorerResult;
use std::path::PathBuf;

pub mod ask;
pub mod chat;
pub mod terminal;

/// Ask topic-aware questions of a Gemini model.
#[derive(Parser, Debug)]
#[command(name = "explorer", about = "Knowledge Explorer - topic-aware Gemini chat")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Log output format (pretty or json).
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Path to a TOML configuration file.
    #[arg(short, long, global = true, env = "EXPLORER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Model name override.
    #[arg(long, global = true, env = "EXPLORER_MODEL")]
    pub model: Option<String>,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask a single question and print the answer.
    Ask(AskArgs),
    /// Start an interactive chat session.
    Chat(ChatArgs),
    /// List the available topics.
    Topics,
}

/// Arguments for `explorer ask`.
#[derive(Args, Debug)]
pub struct AskArgs {
    /// Topic to ask under (see `explorer topics`).
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Attach an image or PDF (repeatable).
    #[arg(short, long = "file")]
    pub files: Vec<PathBuf>,

    /// Wait for the whole answer instead of streaming it.
    #[arg(long)]
    pub no_stream: bool,

    /// Sampling controls.
    #[command(flatten)]
    pub sampling: SamplingArgs,

    /// The question.
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,
}

/// Arguments for `explorer chat`.
#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Topic to start the conversation under.
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Sampling controls.
    #[command(flatten)]
    pub sampling: SamplingArgs,
}

/// Per-request sampling overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct SamplingArgs {
    /// Sampling temperature (0.0 to 2.0).
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Nucleus sampling threshold (0.0 to 1.0).
    #[arg(long)]
    pub top_p: Option<f32>,

    /// Number of highest-probability tokens considered.
    #[arg(long)]
    pub top_k: Option<u32>,
}

impl SamplingArgs {
    /// Apply the overrides on top of the configured defaults.
    pub fn resolve(&self, defaults: &GenerationParameters) -> GenerationParameters {
        GenerationParameters::new(
            self.temperature.unwrap_or(*defaults.temperature()),
            self.top_p.unwrap_or(*defaults.top_p()),
            self.top_k.unwrap_or(*defaults.top_k()),
        )
    }
}

/// Topic from the command line, or the configured default.
pub fn resolve_topic(topic: Option<&str>, config: &ExplorerConfig) -> String {
    topic
        .map(str::to_string)
        .unwrap_or_else(|| config.default_topic().clone())
}

/// Load every attachment, stopping at the first that cannot be read.
pub fn load_attachments(paths: &[PathBuf]) -> ExplorerResult<Vec<UploadedAsset>> {
    paths
        .iter()
        .map(|path| UploadedAsset::from_path(path).map_err(Into::into))
        .collect()
}

/// Print the topic labels in selection order.
pub fn print_topics() {
    for label in explorer_core::Topic::sorted_labels() {
        println!("{}", label);
    }
}
