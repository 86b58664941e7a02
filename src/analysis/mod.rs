//! Analysis modules.
//!
//! Aggregation of gift-money records into summary statistics.

pub mod aggregator;

pub use aggregator::*;
