//! alttext core - batch accessibility alt-text generation.
//!
//! Every image in a directory is resized to a fixed list of widths and each
//! copy is described by a vision-capable chat-completion API. The results
//! land in a single report so description quality can be compared across
//! resolutions.
//!
//! # Architecture
//!
//! ```text
//! Discover → Decode → Resize (per width) → Scratch PNG → API (with retry) → Rows → CSV
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use alttext_core::{AltTextPipeline, Config};
//!
//! #[tokio::main]
//! async fn main() -> alttext_core::Result<()> {
//!     let config = Config::load()?;
//!     let pipeline = AltTextPipeline::new(config);
//!
//!     let stats = pipeline.run(|_| {}).await?;
//!     println!("Wrote {} rows", stats.rows);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod report;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{AltTextError, ConfigError, PipelineError, PipelineResult, ReportError, Result};
pub use llm::{AltTextOutcome, AltTextProvider, ChatCompletionsProvider, FailureKind, RetryPolicy};
pub use pipeline::{AltTextPipeline, DiscoveredFile, RunOutput};
pub use report::{write_report, ReportWriter};
pub use types::{size_label, ReportRow, RunStats, SizeProcessed};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_pipeline_new_keeps_config() {
        let mut config = Config::default();
        config.resize.widths = vec![64];
        let pipeline = AltTextPipeline::new(config);
        assert_eq!(pipeline.config().resize.widths, vec![64]);
    }
}
