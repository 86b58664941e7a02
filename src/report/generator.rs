//! Markdown and JSON report generation.
//!
//! This module generates file reports from aggregated gift-money
//! statistics.

use crate::analysis::{giver_ranking, yearly_totals};
use crate::config::ReportConfig;
use crate::models::{format_yen, AggregateResult, Record, Report, ReportMetadata};
use anyhow::Result;

/// Options controlling which sections are rendered.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub include_records: bool,
    pub include_yearly: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            include_records: true,
            include_yearly: true,
        }
    }
}

impl From<&ReportConfig> for ReportOptions {
    fn from(config: &ReportConfig) -> Self {
        Self {
            include_records: config.include_records,
            include_yearly: config.include_yearly,
        }
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, options: ReportOptions) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", report.metadata.title));
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(&report.result));
    output.push_str(&generate_givers_section(&report.result));

    if options.include_yearly {
        output.push_str(&generate_yearly_section(&report.result.records));
    }
    if options.include_records {
        output.push_str(&generate_records_section(&report.result.records));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records:** {}\n", metadata.record_count));
    section.push('\n');

    section
}

/// Generate the summary statistics table.
fn generate_summary_section(result: &AggregateResult) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");

    if result.is_empty() {
        section.push_str("No records to analyze.\n\n");
        return section;
    }

    section.push_str("| Total | Average | Max | Min | Count |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | ¥{:.0} | {} | {} | {} |\n\n",
        format_yen(result.total),
        result.average,
        format_yen(result.max),
        format_yen(result.min),
        result.count
    ));

    section
}

/// Generate the per-giver totals table.
fn generate_givers_section(result: &AggregateResult) -> String {
    let ranking = giver_ranking(result);
    if ranking.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Totals by Giver\n\n");
    section.push_str("| Giver | Total |\n");
    section.push_str("|:---|---:|\n");

    for entry in ranking {
        section.push_str(&format!(
            "| {} | {} |\n",
            escape_cell(&entry.giver),
            format_yen(entry.total)
        ));
    }
    section.push('\n');

    section
}

/// Generate the per-year totals table.
fn generate_yearly_section(records: &[Record]) -> String {
    let totals = yearly_totals(records);
    if totals.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Totals by Year\n\n");
    section.push_str("| Year | Total | Gifts |\n");
    section.push_str("|:---|---:|:---:|\n");

    for year in totals {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            year.year,
            format_yen(year.total),
            year.count
        ));
    }
    section.push('\n');

    section
}

/// Generate the record table in input order.
fn generate_records_section(records: &[Record]) -> String {
    if records.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Records\n\n");
    section.push_str("| Year | Amount | Giver |\n");
    section.push_str("|:---|---:|:---|\n");

    for record in records {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            record.year,
            format_yen(record.amount),
            escape_cell(&record.giver)
        ));
    }
    section.push('\n');

    section
}

/// Make free text safe inside a Markdown table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

/// Generate the report footer.
fn generate_footer() -> String {
    format!(
        "---\n\n*Report generated by otoshidama v{}*\n",
        env!("CARGO_PKG_VERSION")
    )
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
