//! CLI module for Svar.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Svar - Video Transcript Q&A
///
/// A CLI tool for asking questions about a video, answered only from its
/// transcript. The name "Svar" comes from the Norwegian word for "answer."
#[derive(Parser, Debug)]
#[command(name = "svar")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a video and ask questions about it interactively
    Chat {
        /// YouTube URL or video ID
        input: String,

        /// Number of transcript chunks to retrieve per question
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// LLM model to use for answer generation
        #[arg(short, long)]
        model: Option<String>,

        /// Keep the indexed collection after the session ends
        #[arg(long)]
        keep: bool,
    },

    /// Ingest a video and ask a single question
    Ask {
        /// YouTube URL or video ID
        input: String,

        /// The question to ask
        question: String,

        /// Number of transcript chunks to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// LLM model to use for answer generation
        #[arg(short, long)]
        model: Option<String>,

        /// Keep the indexed collection after answering
        #[arg(long)]
        keep: bool,
    },

    /// List kept collections
    List,

    /// Delete a kept collection
    Drop {
        /// Collection identifier to delete
        collection_id: String,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
