//! Sub-configuration structs and their defaults.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Input directory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory scanned for images
    pub dir: PathBuf,

    /// Supported input extensions (matched case-insensitively)
    pub supported_formats: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./images"),
            supported_formats: ["png", "jpg", "jpeg", "webp", "gif", "avif"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Resize settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    /// Target widths in processing order
    pub widths: Vec<u32>,

    /// Resampling filter name
    pub filter: ResampleFilter,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            widths: vec![700, 500, 300, 200, 100, 50, 25, 10],
            filter: ResampleFilter::default(),
        }
    }
}

/// Resampling filters exposed in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(filter: ResampleFilter) -> Self {
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Vision API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Chat-completions endpoint
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,

    /// Completion token cap
    pub max_tokens: u32,

    /// Per-request transport timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: "${OPENAI_API_KEY}".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 300,
            timeout_ms: 60_000,
        }
    }
}

/// Retry settings for API calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per (image, size), including the first
    pub attempts: u32,

    /// Fixed delay between failed attempts in milliseconds
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay_ms: 1000,
        }
    }
}

/// Report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output file, truncated on every run
    pub path: PathBuf,

    /// Output format
    pub format: ReportFormat,

    /// What to record when retries are exhausted
    pub on_failure: FailurePolicy,

    /// Alt text written for failed rows under `FailurePolicy::Marker`
    pub failure_marker: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./alt_text_report.csv"),
            format: ReportFormat::default(),
            on_failure: FailurePolicy::default(),
            failure_marker: "error".to_string(),
        }
    }
}

/// Report file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Comma-separated with an `Image,Size,Alt Text` header
    #[default]
    Csv,
    /// One JSON object per line
    Jsonl,
}

/// Row policy for an (image, size) pair whose retries were all used up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Append a row carrying the failure marker
    #[default]
    Marker,
    /// Leave the pair out of the report
    Skip,
}

/// Scratch storage for resized copies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScratchConfig {
    /// Parent directory for the per-run scratch dir (system temp when unset)
    pub dir: Option<PathBuf>,

    /// Keep resized copies after the run instead of deleting them
    pub keep: bool,
}

/// Resource limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Decode timeout in milliseconds. Files that take longer are skipped.
    pub decode_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            decode_timeout_ms: 30_000,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
