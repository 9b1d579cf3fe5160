//! Configuration management for alttext.
//!
//! Configuration is loaded once at startup from a TOML file (when present),
//! then handed to every component explicitly. Nothing downstream reads
//! process-wide state on its own.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input directory settings
    pub input: InputConfig,

    /// Resize targets
    pub resize: ResizeConfig,

    /// Vision API settings
    pub api: ApiConfig,

    /// Retry policy
    pub retry: RetryConfig,

    /// Report output
    pub report: ReportConfig,

    /// Scratch storage for resized copies
    pub scratch: ScratchConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.alttext.alttext/config.toml
    /// - Linux: ~/.config/alttext/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\alttext\config\config.toml
    ///
    /// Falls back to ~/.alttext/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "alttext", "alttext")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".alttext").join("config.toml")
            })
    }

    /// Resolved input directory (with ~ expansion).
    pub fn input_dir(&self) -> PathBuf {
        expand(&self.input.dir)
    }

    /// Resolved report path (with ~ expansion).
    pub fn report_path(&self) -> PathBuf {
        expand(&self.report.path)
    }

    /// Resolved scratch parent directory, if one is configured.
    pub fn scratch_dir(&self) -> Option<PathBuf> {
        self.scratch.dir.as_deref().map(expand)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&path_str).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.resize.widths, vec![700, 500, 300, 200, 100, 50, 25, 10]);
        assert_eq!(config.retry.attempts, 3);
        assert_eq!(config.retry.delay_ms, 1000);
        assert_eq!(config.api.max_tokens, 300);
        assert_eq!(config.api.model, "gpt-4o-mini");
        assert_eq!(config.report.on_failure, FailurePolicy::Marker);
        assert_eq!(config.report.format, ReportFormat::Csv);
    }

    #[test]
    fn test_default_supported_formats() {
        let config = Config::default();
        for ext in ["png", "jpg", "jpeg", "webp", "gif", "avif"] {
            assert!(config.input.supported_formats.iter().any(|f| f == ext));
        }
        assert_eq!(config.input.supported_formats.len(), 6);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[input]"));
        assert!(toml.contains("[resize]"));
        assert!(toml.contains("[api]"));
        assert!(toml.contains("[retry]"));
        assert!(toml.contains("[report]"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [resize]
            widths = [640, 320]

            [report]
            on_failure = "skip"
            format = "jsonl"
            "#,
        )
        .unwrap();
        assert_eq!(config.resize.widths, vec![640, 320]);
        assert_eq!(config.resize.filter, ResampleFilter::Lanczos3);
        assert_eq!(config.report.on_failure, FailurePolicy::Skip);
        assert_eq!(config.report.format, ReportFormat::Jsonl);
        assert_eq!(config.retry.attempts, 3);
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[retry]\nattempts = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("retry.attempts"));
    }

    #[test]
    fn test_load_from_roundtrips_default_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, Config::default().to_toml().unwrap()).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api.endpoint, ApiConfig::default().endpoint);
    }

    #[test]
    fn test_tilde_expansion() {
        let mut config = Config::default();
        config.report.path = PathBuf::from("~/reports/alt.csv");
        assert!(!config.report_path().to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_report_format_from_toml() {
        let config: Config = toml::from_str("[report]\nformat = \"jsonl\"").unwrap();
        assert_eq!(config.report.format, ReportFormat::Jsonl);
        assert_eq!(Config::default().report.format, ReportFormat::Csv);
    }

    #[test]
    fn test_decode_timeout_default_is_generous() {
        // Large photos on slow builds must not be skipped as timeouts
        assert_eq!(Config::default().limits.decode_timeout_ms, 30_000);
    }
}
