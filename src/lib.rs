//! Svar - Video Transcript Q&A
//!
//! A CLI tool for asking questions about a video, answered from its transcript.
//!
//! The name "Svar" comes from the Norwegian word for "answer."
//!
//! # Overview
//!
//! Svar allows you to:
//! - Fetch the transcript of a YouTube video
//! - Index it into a uniquely identified vector collection
//! - Ask questions and get answers grounded only in retrieved transcript passages
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration, prompt templates, and API credentials
//! - `transcript` - Transcript fetching from video sources
//! - `chunking` - Sliding-window transcript chunking
//! - `embedding` - Embedding generation
//! - `vector_store` - Collection-scoped vector database abstraction
//! - `rag` - Retrieval and answer generation
//! - `orchestrator` - Ingest pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use svar::config::{Credentials, Settings};
//! use svar::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let credentials = Credentials::from_env()?;
//!     let orchestrator = Orchestrator::new(settings, credentials)?;
//!
//!     // Ingest a video's transcript into a fresh collection
//!     let ingest = orchestrator.ingest("dQw4w9WgXcQ").await?;
//!     println!("Indexed {} chunks as {}", ingest.chunks_indexed, ingest.collection_id);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod transcript;
pub mod vector_store;

pub use error::{Result, SvarError};
