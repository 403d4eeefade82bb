use anyhow::Result;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::pipeline::HarvestReport;

pub mod formatters;

pub use formatters::*;

fn render(report: &HarvestReport, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_as_text(report)),
        OutputFormat::Json => format_as_json(report),
        OutputFormat::Csv => format_as_csv(report),
    }
}

/// Save the harvest report to file
pub async fn save_to_file(report: &HarvestReport, path: &Path, format: &OutputFormat) -> Result<()> {
    let content = match format {
        // Files get no terminal styling
        OutputFormat::Text => console::strip_ansi_codes(&format_as_text(report)).into_owned(),
        _ => render(report, format)?,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(path, content)?;
    Ok(())
}

/// Print the harvest report to console
pub fn print_to_console(report: &HarvestReport, format: &OutputFormat) -> Result<()> {
    println!("{}", render(report, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelId;
    use crate::shorts::{shorts_url, RankedShort, VideoRecord};
    use crate::transcript::{EnrichedShort, ProviderResponse};
    use reqwest::StatusCode;

    fn report() -> HarvestReport {
        let short = |rank: usize, id: &str, status: StatusCode, text: &str| {
            EnrichedShort::new(
                RankedShort {
                    rank,
                    video: VideoRecord {
                        id: id.to_string(),
                        title: format!("Title {}", id),
                        view_count: 1_500_000 / rank as u64,
                        published_at: None,
                        thumbnail_url: String::new(),
                        duration: "PT30S".to_string(),
                        url: shorts_url(id),
                    },
                },
                Ok(ProviderResponse {
                    status,
                    transcript: Some(text.to_string()),
                }),
            )
        };

        HarvestReport {
            channel_id: ChannelId::parse("UCX6OQ3DkcsbYNE6H8uQQuVA").unwrap(),
            total_shorts_found: 40,
            shorts: vec![
                short(1, "a", StatusCode::OK, "He said, \"hi\"\nthen left"),
                short(2, "b", StatusCode::NOT_FOUND, ""),
            ],
        }
    }

    #[test]
    fn test_csv_export() {
        let csv = format_as_csv(&report()).unwrap();
        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(lines[0], "Shorts Link,Transcript");
        assert_eq!(lines[1], "https://www.youtube.com/shorts/a,\"He said, \"\"hi\"\"\nthen left\"");
        assert_eq!(
            lines[2],
            "https://www.youtube.com/shorts/b,Transcript not available (may be disabled by creator)"
        );
    }

    #[test]
    fn test_json_export() {
        let json: serde_json::Value = serde_json::from_str(&format_as_json(&report()).unwrap()).unwrap();
        assert_eq!(json["totalShortsFound"], 40);
        assert_eq!(json["shorts"][0]["rank"], 1);
        assert_eq!(json["shorts"][0]["url"], "https://www.youtube.com/shorts/a");
        assert_eq!(json["shorts"][1]["transcriptStatus"], "not_found");
    }

    #[test]
    fn test_text_listing() {
        let text = console::strip_ansi_codes(&format_as_text(&report())).into_owned();
        assert!(text.contains("1. Title a"));
        assert!(text.contains("1.5M views"));
        assert!(text.contains("2. Title b"));
        assert!(text.contains("of 40 found"));
    }

    #[test]
    fn test_error_json() {
        let err = crate::HarvestError::ChannelNotFound { reference: "@nobody".to_string() };
        let json: serde_json::Value = serde_json::from_str(&format_error_as_json(&err)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["category"], "channel_not_found");
        assert_eq!(json["error"], "Could not extract channel ID from the provided URL");
    }

    #[tokio::test]
    async fn test_save_to_file_writes_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exports").join("shorts.txt");

        save_to_file(&report(), &path, &OutputFormat::Text).await.unwrap();

        let written = fs_err::read_to_string(&path).unwrap();
        assert!(written.contains("Title a"));
        assert!(!written.contains('\u{1b}'));
    }
}
