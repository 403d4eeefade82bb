use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::shorts::EnumerationLimits;
use crate::utils::mask_key;
use crate::HarvestError;

pub const YOUTUBE_API_KEY_ENV: &str = "YOUTUBE_API_KEY";
pub const TRANSCRIPT_API_KEY_ENV: &str = "TRANSCRIPT_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// YouTube Data API settings
    pub youtube: YoutubeConfig,

    /// Transcript provider settings
    pub transcript: TranscriptConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeConfig {
    /// API key for the YouTube Data API v3
    pub api_key: Option<String>,

    /// Base URL of the Data API
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Bearer token for TranscriptAPI
    pub api_key: Option<String>,

    /// Base URL of the transcript API
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Number of shorts returned when no limit is given
    pub default_limit: u32,

    /// Maximum transcript requests in flight
    pub max_concurrent_transcripts: usize,

    /// Timeout applied to every HTTP request
    pub request_timeout_secs: u64,

    /// How far back the upload history is walked
    pub enumeration: EnumerationLimits,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
        }
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://transcriptapi.com/api/v2".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_limit: 25,
            max_concurrent_transcripts: 10,
            request_timeout_secs: 30,
            enumeration: EnumerationLimits::default(),
        }
    }
}

/// Treat blank strings as unset
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from file or create default, then apply environment overrides
    pub async fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        let mut config = if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)
                .context("Failed to read config file")?;

            serde_yaml::from_str::<Config>(&content)
                .context("Failed to parse config file")?
        } else {
            let config = Self::default();
            config.save().await?;
            config
        };

        config.apply_env(
            std::env::var(YOUTUBE_API_KEY_ENV).ok(),
            std::env::var(TRANSCRIPT_API_KEY_ENV).ok(),
        );
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("shorts-harvester").join("config.yaml"))
    }

    /// Keys from the environment (or CLI flags) win over the file
    pub fn apply_env(&mut self, youtube_api_key: Option<String>, transcript_api_key: Option<String>) {
        if let Some(key) = non_blank(youtube_api_key) {
            self.youtube.api_key = Some(key);
        }
        if let Some(key) = non_blank(transcript_api_key) {
            self.transcript.api_key = Some(key);
        }
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.app.default_limit == 0 || self.app.default_limit > 100 {
            anyhow::bail!("app.default_limit must be between 1 and 100");
        }
        if self.app.enumeration.page_size == 0 || self.app.enumeration.page_size > 50 {
            anyhow::bail!("app.enumeration.page_size must be between 1 and 50");
        }
        if self.app.max_concurrent_transcripts == 0 {
            anyhow::bail!("app.max_concurrent_transcripts must be at least 1");
        }
        for (name, value) in [
            ("youtube.base_url", &self.youtube.base_url),
            ("transcript.base_url", &self.transcript.base_url),
        ] {
            Url::parse(value).with_context(|| format!("{} is not a valid URL: {}", name, value))?;
        }

        Ok(())
    }

    /// The YouTube key, required before any harvesting starts
    pub fn youtube_api_key(&self) -> std::result::Result<&str, HarvestError> {
        self.youtube
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(HarvestError::ConfigurationMissing("YouTube API key"))
    }

    /// The transcript key; without it transcripts are skipped
    pub fn transcript_api_key(&self) -> Option<&str> {
        self.transcript
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.app.request_timeout_secs)
    }

    /// Display current configuration
    pub fn display(&self) {
        let masked = |key: Option<&str>| key.map(|k| mask_key(k, 10)).unwrap_or_else(|| "(not set)".to_string());

        println!("Current Configuration:");
        println!("  YouTube API Key: {}", masked(self.youtube.api_key.as_deref()));
        println!("  YouTube API URL: {}", self.youtube.base_url);
        println!("  Transcript API Key: {}", masked(self.transcript_api_key()));
        println!("  Transcript API URL: {}", self.transcript.base_url);
        println!("  Default Limit: {}", self.app.default_limit);
        println!("  Concurrent Transcripts: {}", self.app.max_concurrent_transcripts);
        println!("  Request Timeout: {}s", self.app.request_timeout_secs);
        println!(
            "  Enumeration: {} per page, up to {} videos / {} shorts",
            self.app.enumeration.page_size,
            self.app.enumeration.max_videos_examined,
            self.app.enumeration.max_shorts_collected
        );
    }

    /// Interactive configuration setup
    pub async fn interactive_setup(&self) -> Result<()> {
        println!("Interactive configuration setup coming soon!");
        println!("For now, please edit the config file manually:");
        println!("  {}", Self::config_path()?.display());
        println!("or set {} and {} in the environment.", YOUTUBE_API_KEY_ENV, TRANSCRIPT_API_KEY_ENV);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "youtube:\n  api_key: AIzaSyExample\napp:\n  max_concurrent_transcripts: 4\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.youtube.api_key.as_deref(), Some("AIzaSyExample"));
        assert_eq!(config.youtube.base_url, "https://www.googleapis.com/youtube/v3");
        assert_eq!(config.app.max_concurrent_transcripts, 4);
        assert_eq!(config.app.default_limit, 25);
        assert_eq!(config.app.enumeration, EnumerationLimits::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::default();
        config.youtube.api_key = Some("from-file".to_string());

        config.apply_env(Some("from-env".to_string()), Some("  ".to_string()));
        assert_eq!(config.youtube_api_key().unwrap(), "from-env");
        assert_eq!(config.transcript_api_key(), None);
    }

    #[test]
    fn test_missing_youtube_key_is_configuration_missing() {
        let config = Config::default();
        let err = config.youtube_api_key().unwrap_err();
        assert_eq!(err.category(), crate::ErrorCategory::ConfigurationMissing);
    }

    #[test]
    fn test_validation_rejects_bad_limits() {
        let mut config = Config::default();
        config.app.default_limit = 101;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.app.enumeration.page_size = 51;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.transcript.base_url = "transcriptapi.com".to_string();
        assert!(config.validate().is_err());
    }
}
