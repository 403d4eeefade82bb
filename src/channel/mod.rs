use serde::{Deserialize, Serialize};
use std::fmt;

use crate::platform::VideoPlatform;

const CHANNEL_PREFIX: &str = "UC";
const UPLOADS_PREFIX: &str = "UU";
const CHANNEL_ID_LEN: usize = 24;

/// Canonical YouTube channel identifier (`UC` followed by 22 URL-safe characters)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    /// Parse a string that must already be a canonical channel id
    pub fn parse(raw: &str) -> Option<Self> {
        if Self::is_canonical(raw) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    fn is_canonical(raw: &str) -> bool {
        raw.len() == CHANNEL_ID_LEN
            && raw.starts_with(CHANNEL_PREFIX)
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of the playlist YouTube maintains with every public upload of the channel
    pub fn uploads_playlist_id(&self) -> String {
        format!("{}{}", UPLOADS_PREFIX, &self.0[CHANNEL_PREFIX.len()..])
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip scheme, query string and fragment, leaving the `/`-separated path part
fn path_part(reference: &str) -> &str {
    let without_scheme = reference
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(reference);

    without_scheme
        .split(['?', '#'])
        .next()
        .unwrap_or(without_scheme)
}

/// Find a canonical channel id in any path segment of the reference
pub fn extract_channel_id(reference: &str) -> Option<ChannelId> {
    path_part(reference.trim())
        .split('/')
        .find_map(ChannelId::parse)
}

/// Handle to search for when the reference does not carry a channel id
pub fn extract_handle(reference: &str) -> Option<String> {
    let trimmed = reference.trim();
    let segments: Vec<&str> = path_part(trimmed)
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    // `/@handle/shorts` style URLs name the handle before the tab
    let segment = segments
        .iter()
        .find(|segment| segment.starts_with('@') || segment.starts_with("%40"))
        .or_else(|| segments.last())
        .copied()
        .unwrap_or(trimmed);

    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());

    let handle = decoded.trim_start_matches('@').trim();
    if handle.is_empty() {
        None
    } else {
        Some(handle.to_string())
    }
}

/// Resolve a user supplied channel reference (URL, handle or id) to a channel id.
///
/// Makes at most one search call; a failed search resolves to `None`.
pub async fn resolve(platform: &dyn VideoPlatform, reference: &str) -> Option<ChannelId> {
    if let Some(channel_id) = extract_channel_id(reference) {
        tracing::debug!("Found channel ID in reference: {}", channel_id);
        return Some(channel_id);
    }

    let handle = extract_handle(reference)?;
    tracing::debug!("No channel ID in reference, searching for handle: {}", handle);

    let hits = match platform.search_channels(&handle, 1).await {
        Ok(hits) => hits,
        Err(e) => {
            tracing::warn!("Channel search for '{}' failed: {}", handle, e);
            return None;
        }
    };

    let hit = hits.into_iter().next()?;
    match ChannelId::parse(&hit.channel_id) {
        Some(channel_id) => Some(channel_id),
        None => {
            tracing::warn!(
                "Channel search for '{}' returned a malformed channel ID: {}",
                handle,
                hit.channel_id
            );
            None
        }
    }
}
