//! Ledger ingestion, payer aggregation, and weighted credit rating.
//!
//! Callers materialize tables (rows of [`Cell`](workflows::ledger::Cell) values), feed them
//! through an [`AggregationContext`](workflows::payers::AggregationContext) to build a
//! [`PayerBook`](workflows::payers::PayerBook), and rate a payer against a proposed check
//! amount with [`RatingEngine`](workflows::rating::RatingEngine).

pub mod config;
pub mod dates;
pub mod error;
pub mod telemetry;
pub mod workflows;
