//! Drop command: delete a kept collection.

use super::open_store;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::{Result, SvarError};
use crate::vector_store::CollectionId;

/// Run the drop command.
pub async fn run_drop(collection_id: &str, settings: Settings) -> Result<()> {
    let store = open_store(&settings)?;

    let id = CollectionId::parse(collection_id)?;

    if store.get_collection(&id).await?.is_none() {
        return Err(SvarError::CollectionNotFound(collection_id.to_string()));
    }

    let removed = store.delete_collection(&id).await?;
    Output::success(&format!(
        "Deleted collection {} ({} chunks)",
        collection_id, removed
    ));

    Ok(())
}
