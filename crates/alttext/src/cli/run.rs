//! The `alttext run` command: describe every image at every width.

use std::path::PathBuf;

use alttext_core::config::{FailurePolicy, ReportFormat};
use alttext_core::{size_label, AltTextOutcome, AltTextPipeline, Config, RunStats, SizeProcessed};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

/// Arguments for the `run` command. Every flag overrides its config value.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Directory of images to describe [default: ./images]
    pub input: Option<PathBuf>,

    /// Report file [default: ./alt_text_report.csv]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Comma-separated target widths in pixels, in processing order
    #[arg(long, value_delimiter = ',')]
    pub sizes: Option<Vec<u32>>,

    /// Vision model name
    #[arg(long)]
    pub model: Option<String>,

    /// Chat Completions endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// API key sent as a bearer token
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Maximum API calls per image size
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Delay between failed attempts, in milliseconds
    #[arg(long)]
    pub retry_delay_ms: Option<u64>,

    /// What to record when every attempt fails
    #[arg(long, value_enum)]
    pub on_failure: Option<OnFailure>,

    /// Report format
    #[arg(short, long, value_enum)]
    pub format: Option<ReportKind>,

    /// Keep resized copies in the scratch directory
    #[arg(long)]
    pub keep_scratch: bool,
}

/// Report formats accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Comma-separated values with an `Image,Size,Alt Text` header
    Csv,
    /// One JSON object per line
    Jsonl,
}

impl From<ReportKind> for ReportFormat {
    fn from(kind: ReportKind) -> Self {
        match kind {
            ReportKind::Csv => ReportFormat::Csv,
            ReportKind::Jsonl => ReportFormat::Jsonl,
        }
    }
}

/// Failure handling accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OnFailure {
    /// Record a row with the failure marker as its alt text
    Marker,
    /// Leave the failed pair out of the report
    Skip,
}

impl From<OnFailure> for FailurePolicy {
    fn from(mode: OnFailure) -> Self {
        match mode {
            OnFailure::Marker => FailurePolicy::Marker,
            OnFailure::Skip => FailurePolicy::Skip,
        }
    }
}

impl RunArgs {
    /// Fold command-line overrides into `config`.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(input) = &self.input {
            config.input.dir = input.clone();
        }
        if let Some(output) = &self.output {
            config.report.path = output.clone();
        }
        if let Some(sizes) = &self.sizes {
            config.resize.widths = sizes.clone();
        }
        if let Some(model) = &self.model {
            config.api.model = model.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.api.endpoint = endpoint.clone();
        }
        if let Some(key) = &self.api_key {
            config.api.api_key = key.clone();
        }
        if let Some(attempts) = self.attempts {
            config.retry.attempts = attempts;
        }
        if let Some(delay) = self.retry_delay_ms {
            config.retry.delay_ms = delay;
        }
        if let Some(mode) = self.on_failure {
            config.report.on_failure = mode.into();
        }
        if let Some(kind) = self.format {
            config.report.format = kind.into();
        }
        if self.keep_scratch {
            config.scratch.keep = true;
        }
    }
}

/// Execute the run command.
pub async fn execute(args: RunArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply_to(&mut config);
    config.validate()?;

    let pipeline = AltTextPipeline::new(config);
    let files = pipeline.discover()?;
    let widths = pipeline.config().resize.widths.len();
    if files.is_empty() {
        tracing::warn!(
            "No supported image files found in {:?}",
            pipeline.config().input_dir()
        );
    } else {
        tracing::info!(
            "Found {} image(s), {} size(s) each",
            files.len(),
            widths
        );
    }

    let pb = create_progress_bar((files.len() * widths) as u64);
    let output = pipeline
        .process_files(&files, |event| {
            let line = status_line(event);
            pb.suspend(|| println!("{line}"));
            pb.set_message(event.image.to_string());
            pb.inc(1);
        })
        .await?;
    pb.finish_and_clear();

    pipeline.write_report(&output.rows)?;
    print_summary(&output.stats, &pipeline.config().report_path());
    Ok(())
}

/// Console line for one finished (image, size) pair.
fn status_line(event: &SizeProcessed<'_>) -> String {
    let status = event
        .outcome
        .status()
        .map_or_else(|| "-".to_string(), |s| s.to_string());
    let text = match event.outcome {
        AltTextOutcome::Success { text, .. } => text.as_str(),
        AltTextOutcome::Failed { .. } => "error",
    };
    format!(
        "Status Code for {} at {}: {}, Alt Text: {}",
        event.image,
        size_label(event.width),
        status,
        text
    )
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

fn print_summary(stats: &RunStats, report: &std::path::Path) {
    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Images:       {:>8}", stats.images);
    eprintln!("    Succeeded:    {:>8}", stats.succeeded);
    if stats.failed > 0 {
        eprintln!("    Failed:       {:>8}", stats.failed);
    }
    if stats.skipped_files > 0 {
        eprintln!("    Skipped files:{:>8}", stats.skipped_files);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Rows:         {:>8}", stats.rows);
    eprintln!("    Duration:     {:>7.1}s", stats.elapsed.as_secs_f64());
    eprintln!("    Report:       {}", report.display());
    eprintln!("  ====================================");
}
