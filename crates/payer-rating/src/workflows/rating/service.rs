use std::sync::{Arc, Mutex, PoisonError};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{RatingConfig, RatingEngine, RatingError, RatingResult};
use crate::workflows::ledger::{Table, Workbook};
use crate::workflows::payers::{
    AggregationConfig, IngestError, PayerAggregate, PayerDirectory, PayerSummary, ProcessingStats,
};

/// CSV exports for one import; only the transaction ledger is mandatory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportRequest {
    pub transactions_csv: String,
    #[serde(default)]
    pub scores_csv: Option<String>,
    #[serde(default)]
    pub returned_checks_csv: Option<String>,
    /// Reference date for discount days; defaults to the current UTC date.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub payers: usize,
    pub stats: ProcessingStats,
    pub warnings: Vec<String>,
}

/// Service composing the payer directory with the rating engine and retaining the last result.
pub struct RatingService {
    directory: Arc<PayerDirectory>,
    engine: RatingEngine,
    aggregation: AggregationConfig,
    last_calculation: Mutex<Option<RatingResult>>,
}

impl RatingService {
    pub fn new(aggregation: AggregationConfig, rating: RatingConfig) -> Self {
        Self::with_directory(Arc::new(PayerDirectory::new()), aggregation, rating)
    }

    pub fn with_directory(
        directory: Arc<PayerDirectory>,
        aggregation: AggregationConfig,
        rating: RatingConfig,
    ) -> Self {
        Self {
            directory,
            engine: RatingEngine::new(rating),
            aggregation,
            last_calculation: Mutex::new(None),
        }
    }

    pub fn directory(&self) -> &Arc<PayerDirectory> {
        &self.directory
    }

    /// Replaces the payer book from materialized tables. A failed pass keeps the current book.
    pub fn import_workbook(
        &self,
        workbook: &Workbook,
        today: NaiveDate,
    ) -> Result<ImportSummary, RatingServiceError> {
        let book = self
            .directory
            .rebuild(self.aggregation.clone(), today, workbook)?;

        Ok(ImportSummary {
            payers: book.len(),
            stats: book.stats().clone(),
            warnings: book.warnings().iter().map(ToString::to_string).collect(),
        })
    }

    /// Decodes the CSV exports of a request and imports them.
    pub fn import(&self, request: &ImportRequest) -> Result<ImportSummary, RatingServiceError> {
        let workbook = workbook_from_request(request)?;
        let today = request.today.unwrap_or_else(|| Utc::now().date_naive());
        let summary = self.import_workbook(&workbook, today)?;
        info!(
            payers = summary.payers,
            warnings = summary.warnings.len(),
            "ledger imported"
        );
        Ok(summary)
    }

    /// Rates a payer from the current book and keeps the result as the last calculation.
    pub fn rate(
        &self,
        payer_id: &str,
        check_amount: f64,
        as_of: Option<NaiveDate>,
    ) -> Result<RatingResult, RatingServiceError> {
        let book = self.directory.snapshot();
        let as_of = as_of.unwrap_or_else(|| Utc::now().date_naive());
        let result = self.engine.rate(&book, payer_id, check_amount, as_of)?;

        *self
            .last_calculation
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(result.clone());
        Ok(result)
    }

    pub fn last_calculation(&self) -> Option<RatingResult> {
        self.last_calculation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear_last_calculation(&self) {
        *self
            .last_calculation
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
        info!("last calculation cleared");
    }

    pub fn payer(&self, payer_id: &str) -> Option<PayerAggregate> {
        self.directory.snapshot().get(payer_id.trim()).cloned()
    }

    /// Search results for a non-empty term, otherwise every payer ordered by id.
    pub fn payers(&self, search: Option<&str>) -> Vec<PayerSummary> {
        let book = self.directory.snapshot();
        match search.map(str::trim).filter(|term| !term.is_empty()) {
            Some(term) => book.search(term),
            None => book.payers().map(PayerAggregate::summary).collect(),
        }
    }
}

fn workbook_from_request(request: &ImportRequest) -> Result<Workbook, RatingServiceError> {
    let mut workbook = Workbook::new();
    workbook.insert("transactions", parse_csv("transactions", &request.transactions_csv)?);
    if let Some(scores) = request.scores_csv.as_deref() {
        workbook.insert("scores", parse_csv("scores", scores)?);
    }
    if let Some(returned) = request.returned_checks_csv.as_deref() {
        workbook.insert("returned_checks", parse_csv("returned_checks", returned)?);
    }
    Ok(workbook)
}

fn parse_csv(table: &'static str, text: &str) -> Result<Table, RatingServiceError> {
    Table::from_csv_reader(text.as_bytes()).map_err(|source| RatingServiceError::Csv { table, source })
}

/// Error raised by the rating service.
#[derive(Debug, thiserror::Error)]
pub enum RatingServiceError {
    #[error("invalid CSV in {table}: {source}")]
    Csv {
        table: &'static str,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Rating(#[from] RatingError),
}
