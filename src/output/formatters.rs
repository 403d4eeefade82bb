use anyhow::Result;
use console::style;

use crate::pipeline::HarvestReport;
use crate::HarvestError;
use crate::utils::{csv_field, format_duration, format_published_date, format_view_count};

/// Console listing: one block per short, most viewed first
pub fn format_as_text(report: &HarvestReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{} {} shorts (of {} found) from channel {}\n\n",
        style("Extracted").green().bold(),
        report.shorts.len(),
        report.total_shorts_found,
        report.channel_id
    ));

    for short in &report.shorts {
        let video = &short.short.video;
        out.push_str(&format!("{}. {}\n", short.rank(), style(&video.title).bold()));

        let mut meta = vec![format_view_count(video.view_count)];
        if let Some(secs) = video.duration_secs() {
            meta.push(format_duration(secs));
        }
        if let Some(published_at) = &video.published_at {
            meta.push(format_published_date(published_at));
        }
        out.push_str(&format!("   {}\n", meta.join(" | ")));
        out.push_str(&format!("   {}\n", style(&video.url).cyan()));

        let transcript = if short.transcript_status.is_available() {
            style(short.transcript.as_str())
        } else {
            style(short.transcript.as_str()).dim().italic()
        };
        out.push_str(&format!("   Transcript: {}\n\n", transcript));
    }

    out
}

/// The whole report, pretty printed
pub fn format_as_json(report: &HarvestReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Error body for `--format json`: `{success, error, category, debug}`
pub fn format_error_as_json(err: &HarvestError) -> String {
    serde_json::json!({
        "success": false,
        "error": err.to_string(),
        "category": err.category(),
        "debug": err.diagnostic(),
    })
    .to_string()
}

/// Two spreadsheet columns, `Shorts Link` and `Transcript`
pub fn format_as_csv(report: &HarvestReport) -> Result<String> {
    let mut out = String::from("Shorts Link,Transcript\r\n");
    for short in &report.shorts {
        out.push_str(&csv_field(&short.short.video.url));
        out.push(',');
        out.push_str(&csv_field(&short.transcript));
        out.push_str("\r\n");
    }
    Ok(out)
}
