use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod youtube;

pub use youtube::YoutubeDataClient;

/// A channel returned by a channel-type search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSearchHit {
    pub channel_id: String,
}

/// One page of a playlist listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistPage {
    /// Ids of the videos referenced by the page's items
    pub video_ids: Vec<String>,

    /// Continuation token, absent on the last page
    pub next_page_token: Option<String>,
}

/// Metadata of one video as returned by a batched lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub id: String,
    pub title: String,
    pub published_at: Option<String>,
    pub thumbnail_url: Option<String>,
    /// ISO-8601 duration, e.g. `PT1M30S`
    pub duration: String,
    /// `None` when the owner hides the view counter
    pub view_count: Option<u64>,
}

/// Errors raised by a video platform call
#[derive(thiserror::Error, Debug)]
pub enum PlatformError {
    #[error("YouTube API error {status}: {message}")]
    Http {
        status: u16,
        reason: Option<String>,
        message: String,
    },

    #[error("YouTube API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Failed to parse YouTube API response: {0}")]
    Decode(String),
}

impl PlatformError {
    /// Best guess at what went wrong, phrased for a human
    pub fn diagnostic(&self) -> String {
        match self {
            PlatformError::Http { status, reason, message } => {
                let reason = reason.as_deref().unwrap_or_default();
                let hint = match (*status, reason) {
                    (_, "quotaExceeded" | "dailyLimitExceeded") => "YouTube API quota exceeded",
                    (_, "rateLimitExceeded" | "userRateLimitExceeded") | (429, _) => {
                        "YouTube API rate limit hit"
                    }
                    (400, "keyInvalid") | (400, "badRequest") if message.contains("API key") => {
                        "YouTube API key rejected"
                    }
                    (403, _) => "Access forbidden (check the API key restrictions, or the channel is private)",
                    (404, _) => "Uploads playlist not found (channel may be private, deleted or have no uploads)",
                    (s, _) if s >= 500 => "YouTube API is unavailable",
                    _ => "Unexpected YouTube API response",
                };
                format!("{}: {}", hint, message)
            }
            PlatformError::Request(e) if e.is_timeout() => format!("Request timed out: {}", e),
            PlatformError::Request(e) => format!("Network error talking to YouTube: {}", e),
            PlatformError::Decode(msg) => format!("Unexpected response shape: {}", msg),
        }
    }
}

/// Read-only access to the video platform's catalogue
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Search channels by free text (usually a handle)
    async fn search_channels(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<ChannelSearchHit>, PlatformError>;

    /// List one page of a playlist
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<String>,
        max_results: u32,
    ) -> Result<PlaylistPage, PlatformError>;

    /// Look up statistics, snippet and content details for up to 50 videos
    async fn list_videos(&self, ids: &[String]) -> Result<Vec<VideoDetails>, PlatformError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, reason: Option<&str>, message: &str) -> PlatformError {
        PlatformError::Http {
            status,
            reason: reason.map(str::to_string),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_diagnostics_name_the_likely_cause() {
        assert!(http(403, Some("quotaExceeded"), "quota").diagnostic().starts_with("YouTube API quota exceeded"));
        assert!(http(403, Some("forbidden"), "nope").diagnostic().starts_with("Access forbidden"));
        assert!(http(404, Some("playlistNotFound"), "gone").diagnostic().starts_with("Uploads playlist not found"));
        assert!(http(400, Some("badRequest"), "API key not valid. Please pass a valid API key.")
            .diagnostic()
            .starts_with("YouTube API key rejected"));
        assert!(http(503, None, "backend").diagnostic().starts_with("YouTube API is unavailable"));
        assert!(PlatformError::Decode("missing items".to_string()).diagnostic().contains("missing items"));
    }
}
