use std::collections::BTreeMap;

use super::aggregator::IngestWarning;
use super::domain::{PayerAggregate, PayerId, PayerSummary, ProcessingStats};
use crate::workflows::ledger::{build_column_map, cell_at, row_has_data, LedgerField, Table, TableProfile};

/// Result of one processing pass: the payer map plus what is needed to audit it.
#[derive(Debug, Clone, Default)]
pub struct PayerBook {
    payers: BTreeMap<PayerId, PayerAggregate>,
    returned_table: Option<Table>,
    returned_profile: Option<TableProfile>,
    stats: ProcessingStats,
    warnings: Vec<IngestWarning>,
}

impl PayerBook {
    pub(crate) fn new(
        payers: BTreeMap<PayerId, PayerAggregate>,
        returned_table: Option<Table>,
        returned_profile: TableProfile,
        stats: ProcessingStats,
        warnings: Vec<IngestWarning>,
    ) -> Self {
        Self {
            payers,
            returned_table,
            returned_profile: Some(returned_profile),
            stats,
            warnings,
        }
    }

    pub fn get(&self, payer_id: &str) -> Option<&PayerAggregate> {
        self.payers.get(&PayerId::from(payer_id))
    }

    /// All payers ordered by id.
    pub fn payers(&self) -> impl Iterator<Item = &PayerAggregate> {
        self.payers.values()
    }

    pub fn len(&self) -> usize {
        self.payers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payers.is_empty()
    }

    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    pub fn warnings(&self) -> &[IngestWarning] {
        &self.warnings
    }

    /// Payers whose name contains `term` (case-insensitive) or whose id contains it, by name.
    pub fn search(&self, term: &str) -> Vec<PayerSummary> {
        let term = term.trim();
        if term.is_empty() {
            return Vec::new();
        }
        let lowered = term.to_lowercase();

        let mut matches: Vec<PayerSummary> = self
            .payers
            .values()
            .filter(|payer| {
                payer.name.to_lowercase().contains(&lowered) || payer.payer_id.as_str().contains(term)
            })
            .map(PayerAggregate::summary)
            .collect();
        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches
    }

    /// Counts rows of the raw returned-check table whose payer id equals `payer_id` exactly.
    ///
    /// Used when a payer has no merged returned checks; the header row is the first row.
    pub fn count_raw_returned_checks(&self, payer_id: &PayerId) -> usize {
        let (Some(table), Some(profile)) = (&self.returned_table, &self.returned_profile) else {
            return 0;
        };
        if table.len() <= 1 {
            return 0;
        }
        let Some(header) = table.row(0) else {
            return 0;
        };
        let Some(id_column) = build_column_map(header, &profile.fields).get(LedgerField::PayerId)
        else {
            return 0;
        };

        let wanted = payer_id.as_str().trim();
        table
            .rows()
            .iter()
            .skip(1)
            .filter(|row| row_has_data(row))
            .filter(|row| cell_at(row, Some(id_column)).as_text() == wanted)
            .count()
    }
}
