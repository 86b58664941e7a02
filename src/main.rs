//! Otoshidama - holiday gift-money analytics
//!
//! A CLI tool that aggregates gift-money records into summary statistics
//! and either writes a report or serves the analysis over HTTP.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (config, data file, invalid records, bind failure, etc.)

mod analysis;
mod bonus;
mod cli;
mod config;
mod data;
mod models;
mod report;
mod server;

use anyhow::{Context, Result};
use bonus::BonusPicker;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use models::{Record, Report};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config precedes logging: `[general] verbose` selects the level
    let (mut config, origin) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(args.effective_log_level(config.general.verbose));

    info!("Otoshidama v{}", env!("CARGO_PKG_VERSION"));
    origin.log();
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args, config).await {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .otoshidama.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize the data file, bonus amounts, and more.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Dispatch to the selected mode.
async fn run(args: Args, config: Config) -> Result<()> {
    let picker = BonusPicker::new(config.bonus.candidates.clone())
        .context("Invalid [bonus] configuration")?;
    debug!("Bonus candidates: {:?}", picker.candidates());

    if args.bonus {
        let amount = picker.pick();
        info!("Bonus drawn: {}", amount);
        println!("🎁 Bonus: {}", models::format_yen(amount));
        return Ok(());
    }

    let source = data::source_for(config.data.path.as_deref());
    let source_name = source.describe();
    println!("📥 Loading records from {}", source_name);
    let records = source.load()?;

    if config.data.strict {
        analysis::validate_records(&records)?;
        debug!("All {} records passed validation", records.len());
    }

    if args.serve {
        let metrics = server::Metrics::new().context("Failed to register metrics")?;
        let state = Arc::new(server::AppState {
            records,
            strict: config.data.strict,
            bonus: picker,
            title: config.report.title.clone(),
            metrics,
        });
        return server::serve(state, &config.server.bind).await;
    }

    write_report(&config, &source_name, &records)
}

/// Aggregate the records and write a report in the configured format.
fn write_report(config: &Config, source_name: &str, records: &[Record]) -> Result<()> {
    println!("📝 Generating report...");

    let result = analysis::aggregate(records);
    let output = match config.general.format {
        OutputFormat::Markdown => {
            let report = Report::new(&config.report.title, source_name, result.clone());
            report::generate_markdown_report(&report, report::ReportOptions::from(&config.report))
        }
        OutputFormat::Json => {
            let report = Report::new(&config.report.title, source_name, result.clone());
            report::generate_json_report(&report)?
        }
        OutputFormat::Html => report::render_analysis_page(&config.report.title, &result),
    };

    std::fs::write(&config.general.output, &output)
        .with_context(|| format!("Failed to write report to {}", config.general.output))?;

    println!("\n📊 Summary:");
    println!("   Records: {}", result.count);
    println!("   Total:   {}", models::format_yen(result.total));
    println!("   Average: ¥{:.0}", result.average);
    println!(
        "   Max/Min: {} / {}",
        models::format_yen(result.max),
        models::format_yen(result.min)
    );
    for entry in analysis::giver_ranking(&result) {
        println!("   - {}: {}", entry.giver, models::format_yen(entry.total));
    }
    println!("\n✅ Report saved to: {}", config.general.output);

    Ok(())
}

/// Where the active configuration came from.
enum ConfigOrigin {
    Explicit(PathBuf),
    DefaultFile,
    Defaults,
    Fallback(anyhow::Error),
}

impl ConfigOrigin {
    /// Report the origin once logging is up.
    fn log(&self) {
        match self {
            ConfigOrigin::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigOrigin::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE_NAME),
            ConfigOrigin::Defaults => debug!("No config file found, using defaults"),
            ConfigOrigin::Fallback(e) => warn!("Failed to load config: {}", e),
        }
    }
}

/// Load configuration from file or use defaults.
///
/// Runs before the subscriber is installed, so it only reports its outcome.
fn load_config(args: &Args) -> Result<(Config, ConfigOrigin)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigOrigin::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigOrigin::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigOrigin::Defaults)),
        Err(e) => Ok((Config::default(), ConfigOrigin::Fallback(e))),
    }
}
