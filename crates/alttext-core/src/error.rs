//! Error types for the alt-text pipeline.
//!
//! Errors are organized by stage so that messages carry the context a user
//! needs to act on them (file paths, HTTP status, response bodies).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for alttext operations.
#[derive(Error, Debug)]
pub enum AltTextError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Report writing errors
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input directory is missing or unreadable
    #[error("Cannot read input directory {path}: {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Unsupported image format
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// Operation timed out
    #[error("Timeout in {stage} stage for {path} after {timeout_ms}ms")]
    Timeout {
        path: PathBuf,
        stage: String,
        timeout_ms: u64,
    },

    /// The resized copy could not be written to scratch storage
    #[error("Scratch file error for {path}: {message}")]
    Scratch { path: PathBuf, message: String },

    /// The API answered with a non-200 status
    #[error("API request failed with status {status}: {body}")]
    Request { status: u16, body: String },

    /// The API answered 200 but the body is not a usable completion
    #[error("Unexpected response format: {message}")]
    ResponseFormat { message: String },

    /// The request never produced an HTTP response (connect, DNS, timeout)
    #[error("Transport error: {message}")]
    Transport { message: String },
}

impl PipelineError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PipelineError::Request { status, .. } => Some(*status),
            PipelineError::ResponseFormat { .. } => Some(200),
            _ => None,
        }
    }
}

/// Errors raised while writing the report file.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The report file could not be created or written
    #[error("Failed to write report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing serialized rows failed
    #[error("Failed to write report data: {0}")]
    Write(#[from] std::io::Error),

    /// CSV serialization failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for alttext results.
pub type Result<T> = std::result::Result<T, AltTextError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
