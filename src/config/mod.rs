//! Configuration module for Svar.
//!
//! Handles loading and managing application settings, prompt templates,
//! and the API credential passed explicitly to collaborator clients.

mod credentials;
mod prompts;
mod settings;

pub use credentials::Credentials;
pub use prompts::{Prompts, QaPrompts, REFUSAL_SENTENCE};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, GenerationSettings, GeneralSettings, PromptSettings,
    RetrievalSettings, Settings, StoreSettings, TranscriptSettings,
};
