use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::channel::{self, ChannelId};
use crate::config::Config;
use crate::platform::{PlatformError, VideoPlatform, YoutubeDataClient};
use crate::shorts::{top_n, EnumerationLimits, UploadEnumerator};
use crate::transcript::{EnrichedShort, TranscriptApiClient, TranscriptEnricher, TranscriptProvider};
use crate::HarvestError;

pub const DEFAULT_LIMIT: u32 = 25;
pub const MAX_LIMIT: u32 = 100;

/// What the caller asks for: a channel and how many of its top shorts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestRequest {
    pub channel_reference: String,
    pub limit: u32,
}

impl HarvestRequest {
    pub fn new(channel_reference: impl Into<String>, limit: Option<u32>) -> Result<Self, HarvestError> {
        let channel_reference = channel_reference.into().trim().to_string();
        if channel_reference.is_empty() {
            return Err(HarvestError::InvalidRequest("Channel URL is required".to_string()));
        }

        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(HarvestError::InvalidRequest(format!(
                "limit must be between 1 and {}, got {}",
                MAX_LIMIT, limit
            )));
        }

        Ok(Self { channel_reference, limit })
    }
}

/// Ranked, transcript-enriched shorts of one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestReport {
    pub channel_id: ChannelId,
    /// Shorts seen during enumeration, before truncation to the limit
    pub total_shorts_found: usize,
    pub shorts: Vec<EnrichedShort>,
}

/// Steps a harvest request goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolvingChannel,
    Enumerating,
    Ranking,
    Enriching,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ResolvingChannel => "resolving channel",
            Stage::Enumerating => "enumerating uploads",
            Stage::Ranking => "ranking shorts",
            Stage::Enriching => "fetching transcripts",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Resolve → enumerate → rank → enrich, one request at a time
pub struct ShortsPipeline {
    platform: Box<dyn VideoPlatform>,
    transcripts: Option<Box<dyn TranscriptProvider>>,
    limits: EnumerationLimits,
    max_concurrent_transcripts: usize,
    show_progress: bool,
}

impl ShortsPipeline {
    pub fn new(platform: Box<dyn VideoPlatform>, transcripts: Option<Box<dyn TranscriptProvider>>) -> Self {
        Self {
            platform,
            transcripts,
            limits: EnumerationLimits::default(),
            max_concurrent_transcripts: 10,
            show_progress: false,
        }
    }

    /// Build the HTTP clients described by the configuration.
    ///
    /// Fails with `ConfigurationMissing` when no YouTube key is available.
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let api_key = config.youtube_api_key()?;
        let platform = YoutubeDataClient::new(api_key, &config.youtube.base_url, config.request_timeout())?;

        let transcripts = match config.transcript_api_key() {
            Some(key) => {
                let client = TranscriptApiClient::new(key, &config.transcript.base_url, config.request_timeout())
                    .map_err(PlatformError::from)?;
                Some(Box::new(client) as Box<dyn TranscriptProvider>)
            }
            None => {
                tracing::warn!("TRANSCRIPT_API_KEY not found, transcripts will not be fetched");
                None
            }
        };

        Ok(Self::new(Box::new(platform), transcripts)
            .with_limits(config.app.enumeration)
            .with_max_concurrent_transcripts(config.app.max_concurrent_transcripts))
    }

    pub fn with_limits(mut self, limits: EnumerationLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_max_concurrent_transcripts(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent_transcripts = max_concurrent.max(1);
        self
    }

    /// Show spinners and a transcript progress bar on the terminal
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn spinner(&self, message: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let progress = ProgressBar::new_spinner();
        progress.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        progress.set_message(message.to_string());
        progress.enable_steady_tick(std::time::Duration::from_millis(120));
        progress
    }

    fn transcript_bar(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let progress = ProgressBar::new(0);
        progress.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        progress.set_message("Fetching transcripts...");
        progress
    }

    /// Run one harvest request to completion.
    ///
    /// Resolution and enumeration failures end the request; transcript failures only
    /// mark the affected shorts.
    pub async fn run(&self, request: &HarvestRequest) -> Result<HarvestReport, HarvestError> {
        let mut stage = Stage::ResolvingChannel;
        tracing::info!("Stage: {} ({})", stage, request.channel_reference);

        let spinner = self.spinner("Resolving channel...");
        let channel_id = channel::resolve(&*self.platform, &request.channel_reference).await;
        let Some(channel_id) = channel_id else {
            spinner.finish_and_clear();
            tracing::error!("Stage: {} while {}: no channel ID for {}", Stage::Failed, stage, request.channel_reference);
            return Err(HarvestError::ChannelNotFound {
                reference: request.channel_reference.clone(),
            });
        };
        tracing::info!("Resolved channel ID: {}", channel_id);

        stage = Stage::Enumerating;
        tracing::info!("Stage: {}", stage);
        spinner.set_message("Fetching uploads...");
        let enumerated = UploadEnumerator::new(&*self.platform, self.limits)
            .enumerate(&channel_id)
            .await;
        spinner.finish_and_clear();

        let shorts = enumerated.map_err(|e| {
            tracing::error!("Stage: {} while {}: {}", Stage::Failed, stage, e);
            HarvestError::from(e)
        })?;

        if shorts.is_empty() {
            tracing::warn!("Stage: {} while {}: channel {} returned 0 shorts", Stage::Failed, stage, channel_id);
            return Err(HarvestError::NoShortsFound { channel_id });
        }

        stage = Stage::Ranking;
        tracing::info!("Stage: {} (top {} of {})", stage, request.limit, shorts.len());
        let ranked = top_n(&shorts, request.limit as usize);

        stage = Stage::Enriching;
        tracing::info!("Stage: {} for {} shorts", stage, ranked.len());
        let enriched = TranscriptEnricher::new(self.transcripts.as_deref(), self.max_concurrent_transcripts)
            .with_progress(self.transcript_bar())
            .enrich(ranked)
            .await;

        stage = Stage::Done;
        tracing::info!("Stage: {} ({} shorts returned)", stage, enriched.len());

        Ok(HarvestReport {
            channel_id,
            total_shorts_found: shorts.len(),
            shorts: enriched,
        })
    }
}
