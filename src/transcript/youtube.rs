//! YouTube caption track source.
//!
//! Fetches transcripts from YouTube's caption service: the watch page lists
//! available caption tracks, and each track is fetched in `json3` format.

use super::{TranscriptSegment, TranscriptSource};
use crate::error::{Result, SvarError};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

const WATCH_URL: &str = "https://www.youtube.com/watch";

// YouTube serves different markup to unidentified clients; a desktop UA keeps
// the caption track list present in the page payload.
const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/124.0.0.0 Safari/537.36";

/// A caption track entry from the watch page player response.
#[derive(Debug, Clone, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
    /// "asr" marks auto-generated tracks.
    #[serde(default)]
    kind: Option<String>,
}

/// YouTube transcript source.
pub struct YoutubeTranscripts {
    client: reqwest::Client,
    video_id_regex: Regex,
    language: String,
}

impl YoutubeTranscripts {
    /// Create a new YouTube transcript source.
    pub fn new(language: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SvarError::Config(format!("Failed to create HTTP client: {}", e)))?;

        // Matches various YouTube URL formats and bare video IDs
        let video_id_regex = Regex::new(
            r"(?x)
            (?:
                # Full YouTube URLs
                (?:https?://)?
                (?:www\.)?
                (?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/)
                ([a-zA-Z0-9_-]{11})
            )
            |
            # Bare video ID (11 characters)
            ^([a-zA-Z0-9_-]{11})$
        ",
        )
        .expect("Invalid regex");

        Ok(Self {
            client,
            video_id_regex,
            language: language.to_string(),
        })
    }

    /// Extract video ID from a YouTube URL or bare ID.
    pub fn extract_video_id(&self, input: &str) -> Option<String> {
        let caps = self.video_id_regex.captures(input.trim())?;

        // Try group 1 (URL format) then group 2 (bare ID)
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_string())
    }

    /// Fetch the caption track list for a video.
    async fn fetch_caption_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>> {
        let response = self
            .client
            .get(WATCH_URL)
            .query(&[("v", video_id)])
            .send()
            .await
            .map_err(|e| SvarError::TranscriptFetch(format!("Watch page request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SvarError::TranscriptFetch(format!(
                "Watch page returned status {} for video {}",
                response.status(),
                video_id
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| SvarError::TranscriptFetch(format!("Failed to read watch page: {}", e)))?;

        let tracks = extract_caption_tracks(&html)?;
        if tracks.is_empty() {
            return Err(SvarError::TranscriptUnavailable(format!(
                "Video {} has no caption tracks",
                video_id
            )));
        }

        Ok(tracks)
    }

    /// Pick the best track for the configured language.
    ///
    /// Manually authored tracks win over auto-generated ones; falls back to
    /// the first track of any language.
    fn select_track<'a>(&self, tracks: &'a [CaptionTrack]) -> &'a CaptionTrack {
        tracks
            .iter()
            .find(|t| t.language_code == self.language && t.kind.as_deref() != Some("asr"))
            .or_else(|| tracks.iter().find(|t| t.language_code == self.language))
            .unwrap_or(&tracks[0])
    }

    /// Fetch and parse one caption track.
    async fn fetch_track(&self, track: &CaptionTrack) -> Result<Vec<TranscriptSegment>> {
        let mut url = url::Url::parse(&track.base_url)
            .map_err(|e| SvarError::TranscriptFetch(format!("Invalid track URL: {}", e)))?;
        url.query_pairs_mut().append_pair("fmt", "json3");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SvarError::TranscriptFetch(format!("Track request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SvarError::TranscriptFetch(format!(
                "Caption track returned status {}",
                response.status()
            )));
        }

        let payload = response
            .text()
            .await
            .map_err(|e| SvarError::TranscriptFetch(format!("Failed to read track: {}", e)))?;

        parse_json3(&payload)
    }
}

#[async_trait]
impl TranscriptSource for YoutubeTranscripts {
    #[instrument(skip(self))]
    async fn load(&self, locator: &str) -> Result<Vec<TranscriptSegment>> {
        let video_id = self.extract_video_id(locator).ok_or_else(|| {
            SvarError::InvalidInput(format!("Invalid YouTube video ID or URL: {}", locator))
        })?;

        let tracks = self.fetch_caption_tracks(&video_id).await?;
        let track = self.select_track(&tracks);
        debug!(
            "Using caption track lang={} kind={:?}",
            track.language_code, track.kind
        );

        let segments = self.fetch_track(track).await?;
        if segments.is_empty() {
            return Err(SvarError::TranscriptUnavailable(format!(
                "Caption track for video {} is empty",
                video_id
            )));
        }

        debug!("Fetched {} transcript segments", segments.len());
        Ok(segments)
    }

    fn can_handle(&self, locator: &str) -> bool {
        self.extract_video_id(locator).is_some()
    }
}

/// Extract the `captionTracks` array from the watch page markup.
fn extract_caption_tracks(html: &str) -> Result<Vec<CaptionTrack>> {
    let marker = "\"captionTracks\":";
    let start = match html.find(marker) {
        Some(pos) => pos + marker.len(),
        None => return Ok(Vec::new()),
    };

    let json = balanced_array(&html[start..]).ok_or_else(|| {
        SvarError::TranscriptFetch("Malformed caption track list in watch page".to_string())
    })?;

    serde_json::from_str(json)
        .map_err(|e| SvarError::TranscriptFetch(format!("Failed to parse caption tracks: {}", e)))
}

/// Return the leading balanced `[...]` slice of `text`, respecting strings.
fn balanced_array(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'[') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// A json3 caption payload: a list of timed events, each holding text runs.
#[derive(Debug, Deserialize)]
struct Json3Payload {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(rename = "tStartMs", default)]
    start_ms: u64,
    #[serde(rename = "dDurationMs", default)]
    duration_ms: u64,
    #[serde(default)]
    segs: Option<Vec<Json3Seg>>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Parse a `json3` caption payload into transcript segments.
fn parse_json3(payload: &str) -> Result<Vec<TranscriptSegment>> {
    let parsed: Json3Payload = serde_json::from_str(payload)
        .map_err(|e| SvarError::TranscriptFetch(format!("Failed to parse caption data: {}", e)))?;

    let segments = parsed
        .events
        .into_iter()
        .filter_map(|event| {
            let segs = event.segs?;
            let text = segs
                .iter()
                .map(|s| s.utf8.as_str())
                .collect::<String>()
                .replace('\n', " ")
                .trim()
                .to_string();

            if text.is_empty() {
                return None;
            }

            Some(TranscriptSegment::new(
                text,
                event.start_ms as f64 / 1000.0,
                event.duration_ms as f64 / 1000.0,
            ))
        })
        .collect();

    Ok(segments)
}
