use super::{RankedShort, VideoRecord};

/// Rank shorts by view count, most viewed first, keeping the top `n`.
///
/// The sort is stable, so equally viewed shorts keep their enumeration order.
pub fn top_n(shorts: &[VideoRecord], n: usize) -> Vec<RankedShort> {
    let mut sorted: Vec<&VideoRecord> = shorts.iter().collect();
    sorted.sort_by(|a, b| b.view_count.cmp(&a.view_count));

    sorted
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, video)| RankedShort {
            rank: i + 1,
            video: video.clone(),
        })
        .collect()
}
