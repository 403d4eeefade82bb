use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{TRANSCRIPT_API_KEY_ENV, YOUTUBE_API_KEY_ENV};

#[derive(Parser)]
#[command(
    name = "shorts",
    about = "Shorts Harvester - Extract transcripts from the most viral Shorts of any YouTube channel",
    version,
    long_about = "Finds the highest-viewed YouTube Shorts of a channel and fetches their transcripts. Accepts channel URLs, @handles or raw channel IDs, and exports the ranked result as text, JSON or CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// YouTube Data API key (overrides the config file)
    #[arg(long, global = true, env = YOUTUBE_API_KEY_ENV, hide_env_values = true)]
    pub youtube_api_key: Option<String>,

    /// TranscriptAPI key (overrides the config file)
    #[arg(long, global = true, env = TRANSCRIPT_API_KEY_ENV, hide_env_values = true)]
    pub transcript_api_key: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the top Shorts of a channel with their transcripts
    Extract {
        /// Channel URL, @handle or channel ID
        #[arg(value_name = "CHANNEL")]
        channel: String,

        /// Number of Shorts to return (1-100, default from config)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=100))]
        limit: Option<u32>,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Verify that the YouTube API key works
    Check,

    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human readable listing
    Text,
    /// Full report as JSON
    Json,
    /// Shorts link and transcript columns, for spreadsheets
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_extract_arguments() {
        let cli = Cli::try_parse_from(["shorts", "extract", "@mkbhd", "--limit", "10", "-f", "csv"]).unwrap();
        match cli.command {
            Commands::Extract { channel, limit, output, format } => {
                assert_eq!(channel, "@mkbhd");
                assert_eq!(limit, Some(10));
                assert_eq!(output, None);
                assert_eq!(format, OutputFormat::Csv);
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn test_limit_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["shorts", "extract", "@mkbhd", "--limit", "0"]).is_err());
        assert!(Cli::try_parse_from(["shorts", "extract", "@mkbhd", "--limit", "101"]).is_err());
    }
}
