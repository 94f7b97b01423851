use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use tracing::info;

use super::aggregator::{AggregationContext, IngestError};
use super::book::PayerBook;
use super::config::AggregationConfig;
use crate::workflows::ledger::Workbook;

/// Current payer book, replaced wholesale after each successful processing pass.
#[derive(Debug, Default)]
pub struct PayerDirectory {
    current: RwLock<Arc<PayerBook>>,
}

impl PayerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<PayerBook> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Builds a new book off to the side; the current one is only replaced on success.
    pub fn rebuild(
        &self,
        config: AggregationConfig,
        today: NaiveDate,
        workbook: &Workbook,
    ) -> Result<Arc<PayerBook>, IngestError> {
        let book = Arc::new(AggregationContext::new(config, today).process_workbook(workbook)?);
        self.replace(Arc::clone(&book));
        Ok(book)
    }

    pub fn replace(&self, book: Arc<PayerBook>) {
        info!(payers = book.len(), "replacing payer book");
        match self.current.write() {
            Ok(mut guard) => *guard = book,
            Err(poisoned) => *poisoned.into_inner() = book,
        }
    }

    pub fn clear(&self) {
        self.replace(Arc::new(PayerBook::default()));
    }
}
