//! Payer aggregation over ledger tables and the snapshot directory that serves it.

mod aggregator;
mod book;
pub mod config;
pub mod directory;
pub mod domain;


pub use aggregator::{AggregationContext, IngestError, IngestWarning};
pub use book::PayerBook;
pub use config::{AggregationConfig, ReturnedCheckPositions, TableNames};
pub use directory::PayerDirectory;
pub use domain::{
    ExternalCreditScore, PayerAggregate, PayerId, PayerSummary, ProcessingStats, ReturnedCheck,
    Transaction,
};
