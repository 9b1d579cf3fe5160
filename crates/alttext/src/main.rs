//! alttext CLI - batch accessibility alt text for images at several widths.
//!
//! Every image in a directory is resized to a list of widths, each copy is
//! sent to a vision model, and the answers are collected into one report.
//!
//! # Usage
//!
//! ```bash
//! # Describe ./images with the default widths
//! alttext run
//!
//! # Custom directory, output and widths
//! alttext run ./photos -o photos.csv --sizes 700,300,50
//!
//! # View configuration
//! alttext config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// alttext - Generate alt text for images across resolutions.
#[derive(Parser, Debug)]
#[command(name = "alttext")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Describe every image at every configured width and write the report
    Run(cli::run::RunArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A local .env may carry OPENAI_API_KEY; it must be loaded before clap reads env.
    if let Some(warning) = dotenv_warning(dotenvy::dotenv()) {
        eprintln!("{warning}");
    }

    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match alttext_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `alttext config path`."
            );
            alttext_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("alttext v{}", alttext_core::VERSION);

    match cli.command {
        Commands::Run(args) => cli::run::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}

/// Warning for a `.env` that exists but could not be loaded. A missing file is fine.
fn dotenv_warning<T>(result: Result<T, dotenvy::Error>) -> Option<String> {
    match result {
        Ok(_) => None,
        Err(e) if e.not_found() => None,
        Err(e) => Some(format!("Warning: Failed to load .env: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_missing_dotenv_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let result = dotenvy::from_path(dir.path().join(".env"));
        assert_eq!(dotenv_warning(result), None);
    }

    #[test]
    fn test_malformed_dotenv_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "OPENAI_API_KEY='unterminated\n").unwrap();

        let warning = dotenv_warning(dotenvy::from_path(&path)).unwrap();
        assert!(warning.starts_with("Warning: Failed to load .env"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["alttext", "run", "-v", "--json-logs"]).unwrap();
        assert!(cli.verbose);
        assert!(cli.json_logs);
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_config_init_force() {
        let cli = Cli::try_parse_from(["alttext", "config", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Config(args) => assert!(matches!(
                args.command,
                cli::config::ConfigCommand::Init { force: true }
            )),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
