//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Otoshidama - holiday gift-money analytics
///
/// Aggregate gift-money records into totals, averages, and per-giver
/// breakdowns. Write a Markdown/JSON/HTML report, or serve the analysis
/// over HTTP with Prometheus metrics.
///
/// Examples:
///   otoshidama
///   otoshidama --data gifts.json --format json --output report.json
///   otoshidama --serve --bind 0.0.0.0:8080
///   otoshidama --bonus
///   otoshidama --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Record file to analyze (.json or .toml)
    ///
    /// Uses the built-in sample data when not given.
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Output file path for the report
    ///
    /// Default: from config or otoshidama_report.md
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json, html)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Start the HTTP server instead of writing a report
    #[arg(long, conflicts_with = "bonus")]
    pub serve: bool,

    /// Address for the HTTP server
    #[arg(long, value_name = "ADDR", env = "OTOSHIDAMA_BIND")]
    pub bind: Option<String>,

    /// Reject records with negative amounts or empty giver names
    #[arg(long)]
    pub strict: bool,

    /// Draw one bonus amount, print it, and exit
    #[arg(long)]
    pub bonus: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .otoshidama.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .otoshidama.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
    /// Standalone HTML page
    Html,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref bind) = self.bind {
            if bind.parse::<std::net::SocketAddr>().is_err() {
                return Err(format!("Invalid bind address: {}", bind));
            }
        }

        // Validate data file if provided
        if let Some(ref data) = self.data {
            if !data.is_file() {
                return Err(format!("Data file does not exist: {}", data.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level from the verbosity flags and the config
    /// file's `verbose` setting. `--quiet` wins over a verbose config.
    pub fn effective_log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            data: None,
            output: None,
            format: None,
            serve: false,
            bind: None,
            strict: false,
            bonus: false,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::parse_from(["otoshidama", "--serve", "--bind", "0.0.0.0:8080", "-v"]);
        assert!(args.serve);
        assert_eq!(args.bind.as_deref(), Some("0.0.0.0:8080"));
        assert!(args.verbose);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_parse_format() {
        let args = Args::parse_from(["otoshidama", "--format", "json"]);
        assert_eq!(args.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_serve_conflicts_with_bonus() {
        assert!(Args::try_parse_from(["otoshidama", "--serve", "--bonus"]).is_err());
    }

    #[test]
    fn test_validation_invalid_bind() {
        let mut args = make_args();
        args.bind = Some("localhost".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_data_file() {
        let mut args = make_args();
        args.data = Some(PathBuf::from("/nonexistent/gifts.json"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.effective_log_level(false), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.effective_log_level(false), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.effective_log_level(false), tracing::Level::ERROR);
    }

    #[test]
    fn test_config_verbose_raises_log_level() {
        let mut args = make_args();
        assert_eq!(args.effective_log_level(false), tracing::Level::INFO);
        assert_eq!(args.effective_log_level(true), tracing::Level::DEBUG);

        args.quiet = true;
        assert_eq!(args.effective_log_level(true), tracing::Level::ERROR);
    }
}
