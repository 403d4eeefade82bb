use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::platform::VideoDetails;

pub mod duration;
pub mod enumerator;
pub mod ranking;

pub use duration::{is_short, parse_duration_secs, SHORT_MAX_SECONDS};
pub use enumerator::{EnumerationLimits, UploadEnumerator};
pub use ranking::top_n;

/// One uploaded video, as seen at fetch time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    /// Popularity metric used for ranking
    pub view_count: u64,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    /// ISO-8601 runtime, e.g. `PT45S`
    pub duration: String,
    pub url: String,
}

impl VideoRecord {
    /// Build a record from looked-up details.
    ///
    /// Returns `None` when the view count is hidden, since such a video cannot be ranked.
    pub fn from_details(details: VideoDetails) -> Option<Self> {
        let view_count = details.view_count?;
        let published_at = details
            .published_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Some(Self {
            url: shorts_url(&details.id),
            id: details.id,
            title: details.title,
            view_count,
            published_at,
            thumbnail_url: details.thumbnail_url.unwrap_or_default(),
            duration: details.duration,
        })
    }

    pub fn duration_secs(&self) -> Option<u64> {
        parse_duration_secs(&self.duration)
    }
}

/// Playback URL of a Short
pub fn shorts_url(video_id: &str) -> String {
    format!("https://www.youtube.com/shorts/{}", video_id)
}

/// A short with its 1-based position in the viral ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedShort {
    pub rank: usize,
    #[serde(flatten)]
    pub video: VideoRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(view_count: Option<u64>) -> VideoDetails {
        VideoDetails {
            id: "abc123".to_string(),
            title: "Cat jumps".to_string(),
            published_at: Some("2024-03-01T12:00:00Z".to_string()),
            thumbnail_url: None,
            duration: "PT42S".to_string(),
            view_count,
        }
    }

    #[test]
    fn test_from_details() {
        let record = VideoRecord::from_details(details(Some(10))).unwrap();
        assert_eq!(record.url, "https://www.youtube.com/shorts/abc123");
        assert_eq!(record.view_count, 10);
        assert_eq!(record.thumbnail_url, "");
        assert_eq!(record.duration_secs(), Some(42));
        assert_eq!(record.published_at.unwrap().to_rfc3339(), "2024-03-01T12:00:00+00:00");
    }

    #[test]
    fn test_hidden_views_are_skipped() {
        assert!(VideoRecord::from_details(details(None)).is_none());
    }

    #[test]
    fn test_ranked_short_serializes_flat() {
        let ranked = RankedShort {
            rank: 1,
            video: VideoRecord::from_details(details(Some(10))).unwrap(),
        };
        let json = serde_json::to_value(&ranked).unwrap();
        assert_eq!(json["rank"], 1);
        assert_eq!(json["viewCount"], 10);
        assert_eq!(json["thumbnail"], "");
    }
}
