//! Record aggregation and statistics.
//!
//! This module provides the aggregation core: summary statistics over a
//! collection of records plus the derived views used by the renderers.

use crate::models::{AggregateResult, GiverTotal, Record, YearTotal};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Errors raised by strict record validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("invalid record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Aggregate records into summary statistics.
///
/// Never fails: empty input yields an all-zero result, and negative
/// amounts are summed as-is. Sums saturate at the `i64` bounds; use
/// [`aggregate_strict`] to reject input whose total does not fit.
pub fn aggregate(records: &[Record]) -> AggregateResult {
    let Some(first) = records.first() else {
        return AggregateResult::default();
    };

    let mut total: i64 = 0;
    let mut max = first.amount;
    let mut min = first.amount;
    let mut giver_totals: HashMap<String, i64> = HashMap::new();

    for record in records {
        total = total.saturating_add(record.amount);
        max = max.max(record.amount);
        min = min.min(record.amount);
        let giver_total = giver_totals.entry(record.giver.clone()).or_default();
        *giver_total = giver_total.saturating_add(record.amount);
    }

    AggregateResult {
        total,
        average: total as f64 / records.len() as f64,
        max,
        min,
        count: records.len(),
        records: records.to_vec(),
        giver_totals,
    }
}

/// Check every record, returning the first violation.
pub fn validate_records(records: &[Record]) -> Result<(), RecordError> {
    let mut total: i64 = 0;

    for (index, record) in records.iter().enumerate() {
        if record.amount < 0 {
            return Err(RecordError::InvalidRecord {
                index,
                reason: format!("amount must not be negative (got {})", record.amount),
            });
        }
        if record.giver.trim().is_empty() {
            return Err(RecordError::InvalidRecord {
                index,
                reason: "giver must not be empty".to_string(),
            });
        }
        // Amounts are non-negative here, so every giver and year subtotal
        // is bounded by the running total.
        total = total
            .checked_add(record.amount)
            .ok_or_else(|| RecordError::InvalidRecord {
                index,
                reason: "running total exceeds the supported range".to_string(),
            })?;
    }

    Ok(())
}

/// Validate, then aggregate.
pub fn aggregate_strict(records: &[Record]) -> Result<AggregateResult, RecordError> {
    validate_records(records)?;
    Ok(aggregate(records))
}

/// Givers sorted by total (highest first), ties broken by name.
pub fn giver_ranking(result: &AggregateResult) -> Vec<GiverTotal> {
    let mut ranking: Vec<GiverTotal> = result
        .giver_totals
        .iter()
        .map(|(giver, total)| GiverTotal {
            giver: giver.clone(),
            total: *total,
        })
        .collect();

    ranking.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.giver.cmp(&b.giver)));
    ranking
}

/// Per-year totals in ascending year order.
pub fn yearly_totals(records: &[Record]) -> Vec<YearTotal> {
    let mut by_year: BTreeMap<i32, (i64, usize)> = BTreeMap::new();

    for record in records {
        let entry = by_year.entry(record.year).or_default();
        entry.0 = entry.0.saturating_add(record.amount);
        entry.1 += 1;
    }

    by_year
        .into_iter()
        .map(|(year, (total, count))| YearTotal { year, total, count })
        .collect()
}
