use serde::{Deserialize, Serialize};

use super::{is_short, VideoRecord};
use crate::channel::ChannelId;
use crate::platform::{PlatformError, VideoPlatform};

/// Bounds on how much of a channel's upload history is walked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationLimits {
    /// Playlist items requested per page (the API caps this at 50)
    pub page_size: u32,

    /// Stop once this many uploads have been examined
    pub max_videos_examined: usize,

    /// Stop once this many shorts have been collected
    pub max_shorts_collected: usize,
}

impl Default for EnumerationLimits {
    fn default() -> Self {
        Self {
            page_size: 50,
            max_videos_examined: 500,
            max_shorts_collected: 100,
        }
    }
}

/// Why the playlist walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Exhausted,
    ExaminedLimit,
    ShortsLimit,
}

/// Walks a channel's uploads playlist and keeps the Shorts
pub struct UploadEnumerator<'a> {
    platform: &'a dyn VideoPlatform,
    limits: EnumerationLimits,
}

impl<'a> UploadEnumerator<'a> {
    pub fn new(platform: &'a dyn VideoPlatform, limits: EnumerationLimits) -> Self {
        Self { platform, limits }
    }

    /// Collect the short-form uploads of a channel, in playlist order.
    ///
    /// Any failed call aborts the walk; there are no partial results.
    pub async fn enumerate(&self, channel_id: &ChannelId) -> Result<Vec<VideoRecord>, PlatformError> {
        let playlist_id = channel_id.uploads_playlist_id();
        tracing::info!("Enumerating uploads playlist {} for channel {}", playlist_id, channel_id);

        let mut shorts = Vec::new();
        let mut examined = 0usize;
        let mut page_token: Option<String> = None;

        let reason = loop {
            tracing::debug!(
                "Fetching page... examined so far: {}, shorts found: {}",
                examined,
                shorts.len()
            );

            let page = self
                .platform
                .list_playlist_items(&playlist_id, page_token.take(), self.limits.page_size)
                .await?;

            if page.video_ids.is_empty() {
                break StopReason::Exhausted;
            }

            examined += page.video_ids.len();

            let details = self.platform.list_videos(&page.video_ids).await?;
            for video in details {
                if !is_short(&video.duration) {
                    continue;
                }
                let duration = video.duration.clone();
                match VideoRecord::from_details(video) {
                    Some(record) => {
                        tracing::debug!(
                            "Found short: {} ({}, {} views)",
                            record.title,
                            duration,
                            record.view_count
                        );
                        shorts.push(record);
                    }
                    None => tracing::debug!("Skipping short with hidden view count"),
                }
            }

            if examined >= self.limits.max_videos_examined {
                break StopReason::ExaminedLimit;
            }
            if shorts.len() >= self.limits.max_shorts_collected {
                break StopReason::ShortsLimit;
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break StopReason::Exhausted,
            }
        };

        tracing::info!(
            "Enumeration finished ({:?}): {} shorts out of {} videos",
            reason,
            shorts.len(),
            examined
        );

        Ok(shorts)
    }
}
