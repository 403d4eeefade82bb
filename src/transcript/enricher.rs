use futures_util::stream::{self, StreamExt};
use indicatif::ProgressBar;

use super::{EnrichedShort, TranscriptProvider, TranscriptStatus};
use crate::shorts::RankedShort;

/// Attaches transcripts to ranked shorts with a bounded number of requests in flight
pub struct TranscriptEnricher<'a> {
    provider: Option<&'a dyn TranscriptProvider>,
    max_concurrent: usize,
    progress: ProgressBar,
}

impl<'a> TranscriptEnricher<'a> {
    pub fn new(provider: Option<&'a dyn TranscriptProvider>, max_concurrent: usize) -> Self {
        Self {
            provider,
            max_concurrent: max_concurrent.max(1),
            progress: ProgressBar::hidden(),
        }
    }

    /// Report each finished transcript on the given progress bar
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Fetch a transcript for every short.
    ///
    /// The output has the input's length and order; a failed fetch only changes that
    /// short's transcript field.
    pub async fn enrich(&self, ranked: Vec<RankedShort>) -> Vec<EnrichedShort> {
        self.progress.set_length(ranked.len() as u64);

        let Some(provider) = self.provider else {
            tracing::warn!("Transcript API key not configured, skipping {} transcripts", ranked.len());
            self.progress.finish_and_clear();
            return ranked.into_iter().map(EnrichedShort::without_provider).collect();
        };

        let progress = &self.progress;
        let enriched: Vec<EnrichedShort> = stream::iter(ranked)
            .map(|short| async move {
                let outcome = provider.fetch_transcript(&short.video.id).await;
                let enriched = EnrichedShort::new(short, outcome);
                log_outcome(&enriched);
                progress.inc(1);
                enriched
            })
            .buffered(self.max_concurrent)
            .collect()
            .await;

        progress.finish_and_clear();

        let available = enriched
            .iter()
            .filter(|short| short.transcript_status.is_available())
            .count();
        tracing::info!("Fetched {}/{} transcripts", available, enriched.len());

        enriched
    }
}

fn log_outcome(short: &EnrichedShort) {
    let id = &short.short.video.id;
    match short.transcript_status {
        TranscriptStatus::Available => {
            tracing::debug!("Fetched transcript for {} ({} chars)", id, short.transcript.len())
        }
        TranscriptStatus::NotFound | TranscriptStatus::Empty => {
            tracing::info!("No transcript for {}: {}", id, short.transcript)
        }
        _ => tracing::warn!("Transcript for {} failed: {}", id, short.transcript),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shorts::{shorts_url, VideoRecord};
    use crate::transcript::{MockTranscriptProvider, ProviderResponse, NOT_FOUND_SENTINEL};
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn ranked(count: usize) -> Vec<RankedShort> {
        (0..count)
            .map(|i| RankedShort {
                rank: i + 1,
                video: VideoRecord {
                    id: format!("v{}", i + 1),
                    title: format!("Short {}", i + 1),
                    view_count: (1000 - i) as u64,
                    published_at: None,
                    thumbnail_url: String::new(),
                    duration: "PT30S".to_string(),
                    url: shorts_url(&format!("v{}", i + 1)),
                },
            })
            .collect()
    }

    #[tokio::test]
    async fn test_one_failure_does_not_affect_others() {
        let mut provider = MockTranscriptProvider::new();
        provider.expect_fetch_transcript().times(25).returning(|id| {
            let status = if id == "v3" { StatusCode::NOT_FOUND } else { StatusCode::OK };
            Ok(ProviderResponse {
                status,
                transcript: Some(format!("transcript of {}", id)),
            })
        });

        let enriched = TranscriptEnricher::new(Some(&provider), 10).enrich(ranked(25)).await;

        assert_eq!(enriched.len(), 25);
        for (i, short) in enriched.iter().enumerate() {
            assert_eq!(short.rank(), i + 1);
            if short.rank() == 3 {
                assert_eq!(short.transcript, NOT_FOUND_SENTINEL);
                assert_eq!(short.transcript_status, TranscriptStatus::NotFound);
            } else {
                assert_eq!(short.transcript, format!("transcript of v{}", i + 1));
            }
        }
    }

    #[tokio::test]
    async fn test_every_failure_kind_still_yields_all_items() {
        let mut provider = MockTranscriptProvider::new();
        provider.expect_fetch_transcript().returning(|id| match id {
            "v1" => Err(anyhow::anyhow!("connection refused")),
            "v2" => Ok(ProviderResponse { status: StatusCode::PAYMENT_REQUIRED, transcript: None }),
            "v3" => Ok(ProviderResponse { status: StatusCode::TOO_MANY_REQUESTS, transcript: None }),
            "v4" => Ok(ProviderResponse { status: StatusCode::INTERNAL_SERVER_ERROR, transcript: None }),
            _ => Ok(ProviderResponse { status: StatusCode::OK, transcript: Some(String::new()) }),
        });

        let enriched = TranscriptEnricher::new(Some(&provider), 2).enrich(ranked(5)).await;
        let statuses: Vec<TranscriptStatus> = enriched.iter().map(|s| s.transcript_status).collect();
        assert_eq!(
            statuses,
            [
                TranscriptStatus::FetchFailed,
                TranscriptStatus::CreditsExhausted,
                TranscriptStatus::RateLimited,
                TranscriptStatus::ServiceError,
                TranscriptStatus::Empty,
            ]
        );
        assert_eq!(enriched[3].transcript, "Transcript service error (500)");
    }

    #[tokio::test]
    async fn test_missing_provider_marks_every_item() {
        let enriched = TranscriptEnricher::new(None, 10).enrich(ranked(3)).await;
        assert_eq!(enriched.len(), 3);
        assert!(enriched
            .iter()
            .all(|s| s.transcript_status == TranscriptStatus::NotConfigured));
    }

    /// Provider that sleeps longer for earlier ranks and tracks concurrency
    struct SlowProvider {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl TranscriptProvider for SlowProvider {
        async fn fetch_transcript(&self, video_id: &str) -> crate::Result<ProviderResponse> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let n: u64 = video_id[1..].parse()?;
            tokio::time::sleep(Duration::from_millis(50 - n * 4)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(ProviderResponse {
                status: StatusCode::OK,
                transcript: Some(video_id.to_string()),
            })
        }
    }

    #[tokio::test]
    async fn test_order_is_kept_and_concurrency_is_bounded() {
        let provider = SlowProvider {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        };

        let enriched = TranscriptEnricher::new(Some(&provider), 3)
            .enrich(ranked(10))
            .await;

        let transcripts: Vec<&str> = enriched.iter().map(|s| s.transcript.as_str()).collect();
        let expected: Vec<String> = (1..=10).map(|i| format!("v{}", i)).collect();
        assert_eq!(transcripts, expected);
        assert!(provider.peak.load(Ordering::SeqCst) <= 3);
        assert!(provider.peak.load(Ordering::SeqCst) >= 2);
    }
}
