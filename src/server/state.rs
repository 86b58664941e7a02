use crate::analysis::{aggregate, aggregate_strict, RecordError};
use crate::bonus::BonusPicker;
use crate::models::{AggregateResult, Record};
use crate::server::metrics::Metrics;

/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// Records loaded at startup. Never mutated afterwards.
    pub records: Vec<Record>,

    /// Reject invalid records instead of aggregating them as-is.
    pub strict: bool,

    /// Bonus draw for `/api/bonus`.
    pub bonus: BonusPicker,

    /// Page title.
    pub title: String,

    /// Request counters and latency histograms.
    pub metrics: Metrics,
}

impl AppState {
    /// Aggregate the loaded records. Recomputed on every call.
    pub fn aggregate(&self) -> Result<AggregateResult, RecordError> {
        if self.strict {
            aggregate_strict(&self.records)
        } else {
            Ok(aggregate(&self.records))
        }
    }
}
