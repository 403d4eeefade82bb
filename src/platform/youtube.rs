use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::{ChannelSearchHit, PlatformError, PlaylistPage, VideoDetails, VideoPlatform};

/// Well-known public video used by the connectivity check
const PROBE_VIDEO_ID: &str = "dQw4w9WgXcQ";

/// YouTube Data API v3 client authenticated with an API key
#[derive(Clone)]
pub struct YoutubeDataClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    snippet: Option<SearchSnippet>,
}

#[derive(Debug, Deserialize)]
struct SearchSnippet {
    #[serde(rename = "channelId")]
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    #[serde(rename = "contentDetails")]
    content_details: Option<PlaylistItemContentDetails>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemContentDetails {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: Option<String>,
    snippet: Option<VideoSnippet>,
    statistics: Option<VideoStatistics>,
    #[serde(rename = "contentDetails")]
    content_details: Option<VideoContentDetails>,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    #[serde(default)]
    title: String,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct VideoStatistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoContentDetails {
    #[serde(default)]
    duration: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    reason: Option<String>,
}

impl VideoItem {
    /// Items without an id are dropped
    fn into_details(self) -> Option<VideoDetails> {
        let id = self.id.filter(|id| !id.is_empty())?;
        let snippet = self.snippet;
        let thumbnail_url = snippet
            .as_ref()
            .and_then(|s| s.thumbnails.as_ref())
            .and_then(|t| t.high.as_ref().or(t.medium.as_ref()).or(t.default.as_ref()))
            .map(|t| t.url.clone());

        Some(VideoDetails {
            id,
            title: snippet.as_ref().map(|s| s.title.clone()).unwrap_or_default(),
            published_at: snippet.and_then(|s| s.published_at),
            thumbnail_url,
            duration: self.content_details.map(|c| c.duration).unwrap_or_default(),
            view_count: self
                .statistics
                .and_then(|s| s.view_count)
                .and_then(|v| v.parse::<u64>().ok()),
        })
    }
}

/// Turn a non-success response body into a `PlatformError::Http`
fn http_error(status: u16, body: &str) -> PlatformError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => PlatformError::Http {
            status,
            reason: envelope.error.errors.into_iter().find_map(|e| e.reason),
            message: envelope.error.message,
        },
        Err(_) => PlatformError::Http {
            status,
            reason: None,
            message: body.chars().take(200).collect(),
        },
    }
}

impl YoutubeDataClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Result<Self, PlatformError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Issue a GET against an API resource and decode the JSON body
    async fn get<T: DeserializeOwned>(&self, resource: &str, query: &[(&str, &str)]) -> Result<T, PlatformError> {
        let url = format!("{}/{}", self.base_url, resource);
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = http_error(status.as_u16(), &body);
            tracing::error!("YouTube API {} failed: {}", resource, err);
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| PlatformError::Decode(format!("{}: {}", resource, e)))
    }

    /// Run a few cheap calls to verify the key and connectivity.
    ///
    /// Returns one entry per step with either a short success note or the error.
    pub async fn check_connectivity(&self) -> Vec<(&'static str, Result<String, PlatformError>)> {
        let mut steps = Vec::new();

        let search = self
            .get::<ListResponse<serde_json::Value>>(
                "search",
                &[("part", "snippet"), ("q", "test"), ("type", "video"), ("maxResults", "1")],
            )
            .await
            .map(|r| format!("{} video(s) found", r.items.len()));
        let search_ok = search.is_ok();
        steps.push(("Simple search", search));

        if search_ok {
            let details = self
                .list_videos(&[PROBE_VIDEO_ID.to_string()])
                .await
                .map(|videos| match videos.first() {
                    Some(video) => format!("duration {}", video.duration),
                    None => "no video returned".to_string(),
                });
            steps.push(("Video details", details));
        }

        steps
    }
}

#[async_trait]
impl VideoPlatform for YoutubeDataClient {
    async fn search_channels(&self, query: &str, max_results: u32) -> Result<Vec<ChannelSearchHit>, PlatformError> {
        let max_results = max_results.to_string();
        let response: ListResponse<SearchItem> = self
            .get(
                "search",
                &[("part", "snippet"), ("q", query), ("type", "channel"), ("maxResults", max_results.as_str())],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| item.snippet.and_then(|s| s.channel_id))
            .map(|channel_id| ChannelSearchHit { channel_id })
            .collect())
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<String>,
        max_results: u32,
    ) -> Result<PlaylistPage, PlatformError> {
        let max_results = max_results.to_string();
        let mut query = vec![
            ("part", "contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token.as_deref() {
            query.push(("pageToken", token));
        }

        let response: ListResponse<PlaylistItem> = self.get("playlistItems", &query).await?;

        Ok(PlaylistPage {
            video_ids: response
                .items
                .into_iter()
                .filter_map(|item| item.content_details.and_then(|c| c.video_id))
                .filter(|id| !id.is_empty())
                .collect(),
            next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    async fn list_videos(&self, ids: &[String]) -> Result<Vec<VideoDetails>, PlatformError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let joined = ids.join(",");
        let response: ListResponse<VideoItem> = self
            .get(
                "videos",
                &[("part", "statistics,snippet,contentDetails"), ("id", joined.as_str())],
            )
            .await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(VideoItem::into_details)
            .collect())
    }
}
