//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.otoshidama.toml` files.

use crate::bonus::DEFAULT_CANDIDATES;
use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".otoshidama.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Record data settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Bonus settings.
    #[serde(default)]
    pub bonus: BonusConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Default report format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            format: OutputFormat::default(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "otoshidama_report.md".to_string()
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

/// Record data settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// JSON or TOML file with records. Uses the built-in sample when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Reject negative amounts and empty giver names.
    #[serde(default)]
    pub strict: bool,
}

/// Bonus settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusConfig {
    /// Amounts the bonus is drawn from.
    #[serde(default = "default_candidates")]
    pub candidates: Vec<i64>,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            candidates: default_candidates(),
        }
    }
}

fn default_candidates() -> Vec<i64> {
    DEFAULT_CANDIDATES.to_vec()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Include the full record table.
    #[serde(default = "default_true")]
    pub include_records: bool,

    /// Include the per-year totals table.
    #[serde(default = "default_true")]
    pub include_yearly: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            include_records: true,
            include_yearly: true,
        }
    }
}

fn default_title() -> String {
    "お年玉データ分析".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if let Some(ref bind) = args.bind {
            self.server.bind = bind.clone();
        }
        if let Some(ref data) = args.data {
            self.data.path = Some(data.clone());
        }

        // Flags always override
        if args.strict {
            self.data.strict = true;
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
