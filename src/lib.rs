//! Shorts Harvester - find the most viral YouTube Shorts of a channel and fetch their transcripts
//!
//! The library exposes the harvesting pipeline (channel resolution, upload enumeration,
//! ranking and transcript enrichment) so it can be embedded behind any transport; the
//! `shorts` binary is a standalone front-end over the same pipeline.

pub mod channel;
pub mod cli;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod platform;
pub mod shorts;
pub mod transcript;
pub mod utils;

use serde::Serialize;

pub use channel::ChannelId;
pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use pipeline::{HarvestReport, HarvestRequest, ShortsPipeline};
pub use platform::{PlatformError, VideoPlatform};
pub use shorts::{RankedShort, VideoRecord};
pub use transcript::{EnrichedShort, TranscriptProvider, TranscriptStatus};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Machine-checkable category of a fatal harvest failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    ConfigurationMissing,
    InvalidRequest,
    ChannelNotFound,
    NoShortsFound,
    UpstreamFailure,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::ConfigurationMissing => "configuration_missing",
            ErrorCategory::InvalidRequest => "invalid_request",
            ErrorCategory::ChannelNotFound => "channel_not_found",
            ErrorCategory::NoShortsFound => "no_shorts_found",
            ErrorCategory::UpstreamFailure => "upstream_failure",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal errors of a harvest request.
///
/// Everything up to and including enumeration fails the whole request; transcript
/// problems never show up here, they are folded into each short's transcript field.
#[derive(thiserror::Error, Debug)]
pub enum HarvestError {
    #[error("{0} is not configured")]
    ConfigurationMissing(&'static str),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Could not extract channel ID from the provided URL")]
    ChannelNotFound { reference: String },

    #[error("No shorts found for this channel")]
    NoShortsFound { channel_id: ChannelId },

    #[error("Failed to extract shorts: {source}")]
    Upstream {
        #[source]
        source: PlatformError,
    },
}

impl HarvestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            HarvestError::ConfigurationMissing(_) => ErrorCategory::ConfigurationMissing,
            HarvestError::InvalidRequest(_) => ErrorCategory::InvalidRequest,
            HarvestError::ChannelNotFound { .. } => ErrorCategory::ChannelNotFound,
            HarvestError::NoShortsFound { .. } => ErrorCategory::NoShortsFound,
            HarvestError::Upstream { .. } => ErrorCategory::UpstreamFailure,
        }
    }

    /// HTTP status a transport layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            HarvestError::ConfigurationMissing(_) => 500,
            HarvestError::InvalidRequest(_) | HarvestError::ChannelNotFound { .. } => 400,
            HarvestError::NoShortsFound { .. } => 404,
            HarvestError::Upstream { .. } => 502,
        }
    }

    /// Human-readable hint at the likely cause, for debugging without retries
    pub fn diagnostic(&self) -> String {
        match self {
            HarvestError::ConfigurationMissing(what) => {
                format!("{} is missing from the config file and environment", what)
            }
            HarvestError::InvalidRequest(reason) => reason.clone(),
            HarvestError::ChannelNotFound { reference } => {
                format!("Tried URL patterns and handle search for: {}", reference)
            }
            HarvestError::NoShortsFound { channel_id } => format!(
                "Channel ID {} returned 0 shorts. This could mean: 1) No shorts exist, 2) API quota exceeded, 3) Private channel",
                channel_id
            ),
            HarvestError::Upstream { source } => source.diagnostic(),
        }
    }
}

impl From<PlatformError> for HarvestError {
    fn from(source: PlatformError) -> Self {
        HarvestError::Upstream { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_and_status_codes() {
        let err = HarvestError::ConfigurationMissing("YouTube API key");
        assert_eq!(err.category(), ErrorCategory::ConfigurationMissing);
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_string(), "YouTube API key is not configured");

        let err = HarvestError::ChannelNotFound { reference: "@nobody".to_string() };
        assert_eq!(err.category().as_str(), "channel_not_found");
        assert_eq!(err.status_code(), 400);
        assert!(err.diagnostic().contains("@nobody"));

        let channel_id = ChannelId::parse("UCX6OQ3DkcsbYNE6H8uQQuVA").unwrap();
        let err = HarvestError::NoShortsFound { channel_id };
        assert_eq!(err.status_code(), 404);
        assert!(err.diagnostic().contains("API quota exceeded"));
    }

    #[test]
    fn test_upstream_diagnostic_comes_from_platform_error() {
        let err: HarvestError = PlatformError::Http {
            status: 403,
            reason: Some("quotaExceeded".to_string()),
            message: "The request cannot be completed because you have exceeded your quota.".to_string(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::UpstreamFailure);
        assert!(err.diagnostic().contains("quota"));
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorCategory::NoShortsFound).unwrap();
        assert_eq!(json, "\"no_shorts_found\"");
    }
}
