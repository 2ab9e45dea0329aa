//! Sliding-window chunking for breaking transcripts into retrieval units.

mod window;

pub use window::WindowChunker;

use serde::{Deserialize, Serialize};

/// A chunk of transcript text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextChunk {
    /// Text content of this chunk.
    pub content: String,
    /// Character offset of this chunk in the full transcript text.
    pub offset: usize,
    /// Order of this chunk in the transcript.
    pub order: i32,
}

impl TextChunk {
    /// Create a new text chunk.
    pub fn new(content: String, offset: usize, order: i32) -> Self {
        Self {
            content,
            offset,
            order,
        }
    }

    /// Length of this chunk in characters.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}
