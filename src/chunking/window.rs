//! Fixed-size sliding-window chunker.
//!
//! Splits transcript text into consecutive character windows of a maximum
//! length, each window after the first overlapping its predecessor by a fixed
//! number of characters.

use super::TextChunk;
use crate::error::{Result, SvarError};
use crate::transcript::{full_text, TranscriptSegment};

/// Sliding-window chunker.
///
/// Windows are measured in characters, not bytes, so multi-byte text never
/// splits inside a scalar value. Construction validates
/// `0 < max_chars` and `overlap < max_chars`; `split` itself cannot fail.
#[derive(Debug, Clone)]
pub struct WindowChunker {
    max_chars: usize,
    overlap: usize,
}

impl WindowChunker {
    /// Create a new chunker with the given window size and overlap.
    pub fn new(max_chars: usize, overlap: usize) -> Result<Self> {
        if max_chars == 0 {
            return Err(SvarError::Config(
                "chunking.max_chars must be greater than zero".to_string(),
            ));
        }
        if overlap >= max_chars {
            return Err(SvarError::Config(format!(
                "chunking.overlap ({}) must be less than chunking.max_chars ({})",
                overlap, max_chars
            )));
        }

        Ok(Self { max_chars, overlap })
    }

    /// The distance between consecutive window starts.
    pub fn stride(&self) -> usize {
        self.max_chars - self.overlap
    }

    /// Split transcript segments into ordered chunks.
    ///
    /// Segment texts are concatenated (single-space joined) before windowing.
    pub fn split(&self, segments: &[TranscriptSegment]) -> Vec<TextChunk> {
        self.split_text(&full_text(segments))
    }

    /// Split raw text into ordered chunks.
    ///
    /// Text no longer than `max_chars` yields exactly one chunk equal to the
    /// full text. Empty text yields no chunks.
    pub fn split_text(&self, text: &str) -> Vec<TextChunk> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }

        let stride = self.stride();
        let mut chunks = Vec::new();
        let mut start = 0usize;
        let mut order = 0i32;

        loop {
            let end = (start + self.max_chars).min(chars.len());
            let content: String = chars[start..end].iter().collect();
            chunks.push(TextChunk::new(content, start, order));

            if end == chars.len() {
                break;
            }
            start += stride;
            order += 1;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(max_chars: usize, overlap: usize) -> WindowChunker {
        WindowChunker::new(max_chars, overlap).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(WindowChunker::new(0, 0).is_err());
        assert!(WindowChunker::new(10, 10).is_err());
        assert!(WindowChunker::new(10, 15).is_err());
        assert!(WindowChunker::new(10, 9).is_ok());
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = chunker(100, 20).split_text("a short transcript");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "a short transcript");
        assert_eq!(chunks[0].offset, 0);
        assert_eq!(chunks[0].order, 0);
    }

    #[test]
    fn test_empty_text_no_chunks() {
        assert!(chunker(100, 20).split_text("").is_empty());
    }

    #[test]
    fn test_window_boundaries() {
        // 31 characters, max 20, overlap 5 -> stride 15, two chunks
        let text = "chunk one text. chunk two text.";
        let chunks = chunker(20, 5).split_text(text);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "chunk one text. chun");
        assert_eq!(chunks[0].offset, 0);
        assert_eq!(chunks[1].content, " chunk two text.");
        assert_eq!(chunks[1].offset, 15);
    }

    #[test]
    fn test_prefixes_reconstruct_original() {
        let text = "The quick brown fox jumps over the lazy dog, again and again and again.";
        let c = chunker(16, 7);
        let chunks = c.split_text(text);
        assert!(chunks.len() > 2);

        let mut rebuilt = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i + 1 < chunks.len() {
                rebuilt.extend(chunk.content.chars().take(c.stride()));
            } else {
                rebuilt.push_str(&chunk.content);
            }
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_length_bound_and_count_formula() {
        let text: String = std::iter::repeat("abcdefghij").take(25).collect(); // 250 chars
        let max_chars = 40;
        let overlap = 10;
        let chunks = chunker(max_chars, overlap).split_text(&text);

        for chunk in &chunks {
            assert!(chunk.char_len() <= max_chars);
        }

        // ceil((len - overlap) / (max - overlap)) for text longer than max
        let stride = max_chars - overlap;
        let expected = (text.len() - overlap).div_ceil(stride);
        assert_eq!(chunks.len(), expected);
    }

    #[test]
    fn test_neighbors_share_overlap() {
        let text = "one two three four five six seven eight nine ten eleven twelve";
        let c = chunker(20, 8);
        let chunks = c.split_text(text);

        for pair in chunks.windows(2) {
            let tail: String = pair[0]
                .content
                .chars()
                .skip(c.stride())
                .collect();
            assert!(pair[1].content.starts_with(&tail));
        }
    }

    #[test]
    fn test_multibyte_text() {
        let text = "æøå blåbærsyltetøy på brødskiva, takk og farvel";
        let chunks = chunker(10, 3).split_text(text);

        for chunk in &chunks {
            assert!(chunk.char_len() <= 10);
        }

        // Reconstruction also holds for multi-byte input
        let c = chunker(10, 3);
        let mut rebuilt = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i + 1 < chunks.len() {
                rebuilt.extend(chunk.content.chars().take(c.stride()));
            } else {
                rebuilt.push_str(&chunk.content);
            }
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn test_split_joins_segments() {
        use crate::transcript::TranscriptSegment;

        let segments = vec![
            TranscriptSegment::new("chunk one text.".to_string(), 0.0, 2.0),
            TranscriptSegment::new("chunk two text.".to_string(), 2.0, 2.0),
        ];

        let chunks = chunker(20, 5).split(&segments);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].content, "chunk one text. chun");
    }
}
