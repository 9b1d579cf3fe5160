//! Core data types produced by the alt-text pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::llm::AltTextOutcome;

/// One report record: an image, a size label and the alt text generated at
/// that size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// File name of the source image
    #[serde(rename = "Image")]
    pub image: String,

    /// Size label, e.g. "700px"
    #[serde(rename = "Size")]
    pub size: String,

    /// Generated alt text, or the failure marker
    #[serde(rename = "Alt Text")]
    pub alt_text: String,
}

impl ReportRow {
    pub fn new(image: impl Into<String>, width: u32, alt_text: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            size: size_label(width),
            alt_text: alt_text.into(),
        }
    }
}

/// Size label used in reports and status lines.
pub fn size_label(width: u32) -> String {
    format!("{width}px")
}

/// Progress event for one finished (image, size) pair.
#[derive(Debug, Clone)]
pub struct SizeProcessed<'a> {
    /// File name of the source image
    pub image: &'a str,
    /// Target width
    pub width: u32,
    /// Outcome after retries
    pub outcome: &'a AltTextOutcome,
    /// Whether a row was appended to the report
    pub recorded: bool,
}

/// Counters for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Images decoded and processed
    pub images: u64,
    /// Files discovered but skipped (decode failure)
    pub skipped_files: u64,
    /// (image, size) pairs that produced alt text
    pub succeeded: u64,
    /// (image, size) pairs that exhausted their retries
    pub failed: u64,
    /// Rows written to the report
    pub rows: u64,
    /// Wall-clock duration
    pub elapsed: Duration,
}
