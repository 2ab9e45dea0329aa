//! Transcript fetching for Svar.
//!
//! Provides a trait-based interface for transcript sources. The only source
//! currently implemented fetches YouTube caption tracks.

mod youtube;

pub use youtube::YoutubeTranscripts;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single segment of a fetched transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Transcribed text content.
    pub text: String,
    /// Start time in seconds.
    pub start_seconds: f64,
    /// Duration in seconds.
    pub duration_seconds: f64,
}

impl TranscriptSegment {
    /// Create a new transcript segment.
    pub fn new(text: String, start_seconds: f64, duration_seconds: f64) -> Self {
        Self {
            text,
            start_seconds,
            duration_seconds,
        }
    }
}

/// Join segment texts into the full transcript text.
pub fn full_text(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trait for transcript source providers.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the transcript for a video locator (URL or bare ID).
    ///
    /// Returns one or more ordered text segments. Fails with
    /// `TranscriptUnavailable` when the service has no transcript for the
    /// video and `TranscriptFetch` on network or service errors.
    async fn load(&self, locator: &str) -> Result<Vec<TranscriptSegment>>;

    /// Check if this source can handle the given locator.
    fn can_handle(&self, locator: &str) -> bool;
}
