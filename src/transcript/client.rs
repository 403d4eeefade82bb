use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::{ProviderResponse, TranscriptProvider};
use crate::Result;

/// TranscriptAPI client (bearer authenticated, plain text transcripts)
#[derive(Clone)]
pub struct TranscriptApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TranscriptApiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> std::result::Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

/// Pull the transcript text out of a success body.
///
/// `format=text` answers with a string; segment lists are joined as a fallback.
fn transcript_text(body: &Value) -> Option<String> {
    match body.get("transcript")? {
        Value::String(text) => Some(text.clone()),
        Value::Array(segments) => {
            let joined = segments
                .iter()
                .filter_map(|segment| segment.get("text").and_then(Value::as_str))
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            Some(joined)
        }
        _ => None,
    }
}

#[async_trait]
impl TranscriptProvider for TranscriptApiClient {
    async fn fetch_transcript(&self, video_id: &str) -> Result<ProviderResponse> {
        tracing::debug!("Attempting to fetch transcript for video: {}", video_id);

        let response = self
            .client
            .get(format!("{}/youtube/transcript", self.base_url))
            .query(&[("video_url", video_id), ("format", "text")])
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("Transcript request failed")?;

        let status = response.status();
        if !status.is_success() {
            return Ok(ProviderResponse {
                status,
                transcript: None,
            });
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse transcript response")?;

        Ok(ProviderResponse {
            status,
            transcript: transcript_text(&body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_transcript() {
        let body = json!({ "video_id": "abc", "transcript": "hello there" });
        assert_eq!(transcript_text(&body).as_deref(), Some("hello there"));
    }

    #[test]
    fn test_segment_transcript_is_joined() {
        let body = json!({
            "transcript": [
                { "text": "hello ", "start": 0.0 },
                { "text": "", "start": 1.0 },
                { "text": "there", "start": 1.5 }
            ]
        });
        assert_eq!(transcript_text(&body).as_deref(), Some("hello there"));
    }

    #[test]
    fn test_missing_transcript() {
        assert_eq!(transcript_text(&json!({ "detail": "ok" })), None);
        assert_eq!(transcript_text(&json!({ "transcript": null })), None);
    }
}
