//! Data models for gift-money analytics.
//!
//! This module contains the core data structures used throughout
//! the application for representing records, aggregates, and reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single gift-money entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Year the gift was received.
    pub year: i32,
    /// Amount in yen.
    pub amount: i64,
    /// Display name of whoever gave the gift.
    pub giver: String,
}

impl Record {
    pub fn new(year: i32, amount: i64, giver: impl Into<String>) -> Self {
        Self {
            year,
            amount,
            giver: giver.into(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} from {}", self.year, format_yen(self.amount), self.giver)
    }
}

/// Summary statistics derived from a collection of records.
///
/// Serialized field names match the JSON data API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Sum of all amounts.
    #[serde(rename = "total_amount")]
    pub total: i64,
    /// Mean amount (0.0 when there are no records).
    #[serde(rename = "average_amount")]
    pub average: f64,
    /// Largest amount.
    #[serde(rename = "max_amount")]
    pub max: i64,
    /// Smallest amount.
    #[serde(rename = "min_amount")]
    pub min: i64,
    /// Number of records.
    pub count: usize,
    /// Records in input order.
    #[serde(rename = "yearly_data")]
    pub records: Vec<Record>,
    /// Summed amount per giver.
    #[serde(rename = "top_givers")]
    pub giver_totals: HashMap<String, i64>,
}

impl AggregateResult {
    /// Returns true if no records were aggregated.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// One entry of the giver ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiverTotal {
    pub giver: String,
    pub total: i64,
}

/// Totals for a single year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearTotal {
    pub year: i32,
    pub total: i64,
    pub count: usize,
}

/// Response body of the bonus endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusAward {
    pub amount: i64,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report title.
    pub title: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Where the records came from.
    pub source: String,
    /// Number of records that were aggregated.
    pub record_count: usize,
}

/// A complete file report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Metadata about the report.
    pub metadata: ReportMetadata,
    /// The aggregated statistics.
    #[serde(flatten)]
    pub result: AggregateResult,
}

impl Report {
    /// Creates a report stamped with the current time.
    pub fn new(title: impl Into<String>, source: impl Into<String>, result: AggregateResult) -> Self {
        Self {
            metadata: ReportMetadata {
                title: title.into(),
                generated_at: Utc::now(),
                source: source.into(),
                record_count: result.count,
            },
            result,
        }
    }
}

/// Formats an amount as yen with thousands separators, e.g. `¥10,000`.
pub fn format_yen(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-¥{}", grouped)
    } else {
        format!("¥{}", grouped)
    }
}
