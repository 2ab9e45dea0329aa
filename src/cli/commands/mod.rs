//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod doctor;
mod drop;
mod list;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use doctor::run_doctor;
pub use drop::run_drop;
pub use list::run_list;

use crate::config::Settings;
use crate::error::{Result, SvarError};
use crate::vector_store::{MemoryVectorStore, SqliteVectorStore, VectorStore};
use std::sync::Arc;

/// Open the configured vector store without touching API credentials.
///
/// List and drop only need storage access, so they must not require the
/// OpenAI key the way ingest and answering do.
pub(crate) fn open_store(settings: &Settings) -> Result<Arc<dyn VectorStore>> {
    match settings.store.provider.as_str() {
        "sqlite" => Ok(Arc::new(SqliteVectorStore::new(&settings.sqlite_path())?)),
        "memory" => Ok(Arc::new(MemoryVectorStore::new())),
        other => Err(SvarError::Config(format!(
            "Unknown store provider: {}",
            other
        ))),
    }
}
