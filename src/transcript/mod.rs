use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::shorts::RankedShort;
use crate::Result;

pub mod client;
pub mod enricher;

pub use client::TranscriptApiClient;
pub use enricher::TranscriptEnricher;

/// Raw answer of the transcript provider for one video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub status: StatusCode,
    /// Transcript text, only read on success
    pub transcript: Option<String>,
}

/// Source of verbatim transcripts, keyed by video id
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// Request the transcript of one video.
    ///
    /// Non-success HTTP statuses are returned as a response, not as an error; `Err` is
    /// reserved for transport and decoding failures.
    async fn fetch_transcript(&self, video_id: &str) -> Result<ProviderResponse>;
}

/// Which outcome produced a short's transcript field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptStatus {
    Available,
    NotFound,
    CreditsExhausted,
    RateLimited,
    ServiceError,
    Empty,
    FetchFailed,
    NotConfigured,
}

pub const NOT_FOUND_SENTINEL: &str = "Transcript not available (may be disabled by creator)";
pub const CREDITS_EXHAUSTED_SENTINEL: &str = "Transcript service credits exhausted";
pub const RATE_LIMITED_SENTINEL: &str = "Transcript service rate limited";
pub const EMPTY_SENTINEL: &str = "No transcript available for this video";
pub const FETCH_FAILED_SENTINEL: &str = "Error fetching transcript";
pub const NOT_CONFIGURED_SENTINEL: &str = "Transcript API not configured";

impl TranscriptStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, TranscriptStatus::Available)
    }
}

/// Map a provider outcome to the transcript field and its status
pub fn resolve_transcript(outcome: Result<ProviderResponse>) -> (String, TranscriptStatus) {
    let response = match outcome {
        Ok(response) => response,
        Err(_) => return (FETCH_FAILED_SENTINEL.to_string(), TranscriptStatus::FetchFailed),
    };

    match response.status {
        StatusCode::NOT_FOUND => (NOT_FOUND_SENTINEL.to_string(), TranscriptStatus::NotFound),
        StatusCode::PAYMENT_REQUIRED => (
            CREDITS_EXHAUSTED_SENTINEL.to_string(),
            TranscriptStatus::CreditsExhausted,
        ),
        StatusCode::TOO_MANY_REQUESTS => (RATE_LIMITED_SENTINEL.to_string(), TranscriptStatus::RateLimited),
        status if !status.is_success() => (
            format!("Transcript service error ({})", status.as_u16()),
            TranscriptStatus::ServiceError,
        ),
        _ => match response.transcript {
            Some(text) if !text.trim().is_empty() => (text, TranscriptStatus::Available),
            _ => (EMPTY_SENTINEL.to_string(), TranscriptStatus::Empty),
        },
    }
}

/// A ranked short with its transcript, or a sentinel explaining why there is none
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedShort {
    #[serde(flatten)]
    pub short: RankedShort,
    pub transcript: String,
    pub transcript_status: TranscriptStatus,
}

impl EnrichedShort {
    pub fn new(short: RankedShort, outcome: Result<ProviderResponse>) -> Self {
        let (transcript, transcript_status) = resolve_transcript(outcome);
        Self {
            short,
            transcript,
            transcript_status,
        }
    }

    pub fn without_provider(short: RankedShort) -> Self {
        Self {
            short,
            transcript: NOT_CONFIGURED_SENTINEL.to_string(),
            transcript_status: TranscriptStatus::NotConfigured,
        }
    }

    pub fn rank(&self) -> usize {
        self.short.rank
    }
}
