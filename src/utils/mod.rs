use chrono::{DateTime, Utc};

/// Format a view count the way YouTube abbreviates it
pub fn format_view_count(views: u64) -> String {
    if views >= 1_000_000_000 {
        format!("{:.1}B views", views as f64 / 1_000_000_000.0)
    } else if views >= 1_000_000 {
        format!("{:.1}M views", views as f64 / 1_000_000.0)
    } else if views >= 1_000 {
        format!("{:.1}K views", views as f64 / 1_000.0)
    } else {
        format!("{} views", views)
    }
}

/// Format duration in human-readable format
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

pub fn format_published_date(published_at: &DateTime<Utc>) -> String {
    published_at.format("%Y-%m-%d").to_string()
}

/// Quote a CSV field when it contains a separator, quote or line break
pub fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Default export file name, e.g. `youtube-shorts-transcripts-20240301_120000.json`
pub fn default_export_filename(extension: &str) -> String {
    format!(
        "youtube-shorts-transcripts-{}.{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        extension
    )
}

/// Mask all but the first characters of a key for display
pub fn mask_key(key: &str, visible: usize) -> String {
    format!("{}...", key.chars().take(visible).collect::<String>())
}
