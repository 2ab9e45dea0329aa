//! List command implementation.

use super::open_store;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;

/// Run the list command.
pub async fn run_list(settings: Settings) -> Result<()> {
    let store = open_store(&settings)?;

    let collections = store.list_collections().await?;

    if collections.is_empty() {
        Output::info("No kept collections. Use 'svar chat <url> --keep' to retain one.");
        return Ok(());
    }

    Output::header(&format!("Kept Collections ({})", collections.len()));
    println!();

    for collection in &collections {
        Output::collection_info(
            &collection.id.to_string(),
            &collection.locator,
            collection.chunk_count,
            &collection.created_at.format("%Y-%m-%d %H:%M").to_string(),
        );
    }

    let total_chunks: u32 = collections.iter().map(|c| c.chunk_count).sum();
    println!();
    Output::kv("Total collections", &collections.len().to_string());
    Output::kv("Total chunks", &total_chunks.to_string());

    Ok(())
}
