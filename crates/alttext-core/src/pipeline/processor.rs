//! Pipeline orchestration: images × sizes → alt text → report rows.
//!
//! Work is strictly sequential. Each (image, size) pair is resized, written
//! to scratch storage, described under the retry policy and recorded before
//! the next pair starts.

use std::time::Instant;

use crate::config::{Config, FailurePolicy};
use crate::error::{PipelineResult, Result};
use crate::llm::{
    describe_with_retry, AltTextOutcome, AltTextProvider, AltTextRequest, ChatCompletionsProvider,
    ImageInput, RetryPolicy,
};
use crate::report::write_report;
use crate::types::{ReportRow, RunStats, SizeProcessed};

use super::decode::ImageDecoder;
use super::discovery::{DiscoveredFile, FileDiscovery};
use super::resize::Resizer;
use super::scratch::ScratchDir;

/// Rows collected by a run, in processing order, with their counters.
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    pub rows: Vec<ReportRow>,
    pub stats: RunStats,
}

/// The batch driver that wires discovery, resizing, the API and the report.
pub struct AltTextPipeline {
    config: Config,
    discovery: FileDiscovery,
    decoder: ImageDecoder,
    resizer: Resizer,
    provider: Box<dyn AltTextProvider>,
    policy: RetryPolicy,
}

impl AltTextPipeline {
    /// Create a pipeline that talks to the configured Chat Completions endpoint.
    pub fn new(config: Config) -> Self {
        let provider = ChatCompletionsProvider::from_config(&config.api);
        Self::with_provider(config, Box::new(provider))
    }

    /// Create a pipeline with an explicit provider.
    pub fn with_provider(config: Config, provider: Box<dyn AltTextProvider>) -> Self {
        Self {
            discovery: FileDiscovery::new(config.input.clone()),
            decoder: ImageDecoder::new(config.limits.clone()),
            resizer: Resizer::new(&config.resize),
            policy: RetryPolicy::from(&config.retry),
            provider,
            config,
        }
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Discover supported images in the configured input directory.
    pub fn discover(&self) -> PipelineResult<Vec<DiscoveredFile>> {
        self.discovery.discover(&self.config.input_dir())
    }

    /// Run every (image, size) pair for `files` and collect report rows.
    ///
    /// `on_size` is called once per pair after its outcome is known. Files
    /// that fail to decode are logged and skipped. Scratch and filesystem
    /// failures abort the run.
    pub async fn process_files<F>(
        &self,
        files: &[DiscoveredFile],
        mut on_size: F,
    ) -> PipelineResult<RunOutput>
    where
        F: FnMut(&SizeProcessed<'_>),
    {
        let start = Instant::now();
        let scratch_parent = self.config.scratch_dir();
        let scratch = ScratchDir::create(&self.config.scratch, scratch_parent.as_deref())?;
        let mut output = RunOutput::default();

        for file in files {
            let decoded = match self.decoder.decode(&file.path).await {
                Ok(decoded) => decoded,
                Err(e) => {
                    tracing::error!("Skipping {}: {e}", file.file_name);
                    output.stats.skipped_files += 1;
                    continue;
                }
            };
            tracing::debug!(
                "Decoded {} ({:?}, {}x{})",
                file.file_name,
                decoded.format,
                decoded.width,
                decoded.height
            );
            output.stats.images += 1;

            for &width in &self.config.resize.widths {
                let resized = self.resizer.resize(&decoded.image, width);
                let outcome = {
                    let persisted = scratch.persist(&resized, file.stem(), width)?;
                    let request = AltTextRequest::new(
                        ImageInput::png(persisted.bytes()),
                        self.config.api.max_tokens,
                    );
                    describe_with_retry(self.provider.as_ref(), &request, self.policy).await
                };

                let row = self.row_for(&file.file_name, width, &outcome);
                if outcome.is_success() {
                    output.stats.succeeded += 1;
                } else {
                    output.stats.failed += 1;
                }

                on_size(&SizeProcessed {
                    image: &file.file_name,
                    width,
                    outcome: &outcome,
                    recorded: row.is_some(),
                });

                if let Some(row) = row {
                    output.rows.push(row);
                }
            }
        }

        output.stats.rows = output.rows.len() as u64;
        output.stats.elapsed = start.elapsed();
        Ok(output)
    }

    /// Write collected rows to the configured report path.
    pub fn write_report(&self, rows: &[ReportRow]) -> Result<()> {
        write_report(&self.config.report_path(), self.config.report.format, rows)?;
        Ok(())
    }

    /// Discover, process and write the report in one call.
    pub async fn run<F>(&self, on_size: F) -> Result<RunStats>
    where
        F: FnMut(&SizeProcessed<'_>),
    {
        let files = self.discover()?;
        tracing::info!("Found {} image(s) to process", files.len());
        let output = self.process_files(&files, on_size).await?;
        self.write_report(&output.rows)?;
        Ok(output.stats)
    }

    /// Report row for an outcome, or `None` when failures are skipped.
    fn row_for(&self, image: &str, width: u32, outcome: &AltTextOutcome) -> Option<ReportRow> {
        match outcome {
            AltTextOutcome::Success { text, .. } => {
                Some(ReportRow::new(image, width, text.as_str()))
            }
            AltTextOutcome::Failed { .. } => match self.config.report.on_failure {
                FailurePolicy::Marker => Some(ReportRow::new(
                    image,
                    width,
                    self.config.report.failure_marker.as_str(),
                )),
                FailurePolicy::Skip => None,
            },
        }
    }
}
