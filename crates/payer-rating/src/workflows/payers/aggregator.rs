use std::collections::BTreeMap;
use std::time::Instant;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::book::PayerBook;
use super::config::AggregationConfig;
use super::domain::{
    ExternalCreditScore, PayerAggregate, PayerId, ProcessingStats, ReturnedCheck, Transaction,
};
use crate::dates::{days_between, discount_days};
use crate::workflows::ledger::{
    build_column_map, cell_at, locate_headers, normalize_header, row_has_data, Cell, ColumnMap,
    LedgerField, Table, TableProfile, Workbook,
};

/// Input problems that abort a processing pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("missing required columns: {}", field_list(.fields))]
    MissingColumns { fields: Vec<LedgerField> },
    #[error("no table with transaction data was found")]
    NoTransactionTable,
}

fn field_list(fields: &[LedgerField]) -> String {
    fields
        .iter()
        .map(|field| field.key())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Recoverable problems noticed while processing; the pass carries on.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestWarning {
    UnparsableNumber {
        row: usize,
        field: LedgerField,
        value: String,
    },
    RejectedRow {
        row: usize,
    },
    TableNotFound {
        table: &'static str,
    },
    ColumnNotFound {
        table: &'static str,
        field: LedgerField,
    },
    PositionalFallback {
        field: LedgerField,
        position: usize,
    },
}

impl std::fmt::Display for IngestWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestWarning::UnparsableNumber { row, field, value } => write!(
                f,
                "row {}: could not read {} from '{}', using 0",
                row, field, value
            ),
            IngestWarning::RejectedRow { row } => write!(
                f,
                "row {}: skipped, payer id, payer name and a positive amount are required",
                row
            ),
            IngestWarning::TableNotFound { table } => write!(f, "no {} table found", table),
            IngestWarning::ColumnNotFound { table, field } => {
                write!(f, "{} table has no {} column", table, field)
            }
            IngestWarning::PositionalFallback { field, position } => write!(
                f,
                "returned checks: no {} header, reading column {}",
                field, position
            ),
        }
    }
}

/// Explicit state for one processing pass: the payer map under construction plus the
/// configuration, reference date, warnings and counters that go with it.
pub struct AggregationContext {
    config: AggregationConfig,
    today: NaiveDate,
    payers: BTreeMap<PayerId, PayerAggregate>,
    returned_table: Option<Table>,
    warnings: Vec<IngestWarning>,
    stats: ProcessingStats,
}

impl AggregationContext {
    /// `today` anchors discount-day calculations.
    pub fn new(config: AggregationConfig, today: NaiveDate) -> Self {
        Self {
            config,
            today,
            payers: BTreeMap::new(),
            returned_table: None,
            warnings: Vec::new(),
            stats: ProcessingStats::default(),
        }
    }

    pub fn payers(&self) -> &BTreeMap<PayerId, PayerAggregate> {
        &self.payers
    }

    pub fn warnings(&self) -> &[IngestWarning] {
        &self.warnings
    }

    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    /// Folds every valid ledger row into the payer map and returns how many were accepted.
    pub fn process_transactions(&mut self, table: &Table) -> Result<usize, IngestError> {
        let profile = &self.config.profiles.transactions;
        let location = locate_headers(table, &profile.signals, profile.scan_rows);
        let columns = build_column_map(&location.header_row, &profile.fields);
        debug!(
            header_row = location.header_row_index + 1,
            columns = ?columns.to_indexes(&profile.field_names()),
            "mapped transaction columns"
        );

        let missing = columns.missing(&profile.required);
        if !missing.is_empty() {
            return Err(IngestError::MissingColumns { fields: missing });
        }

        let mut accepted = 0;
        for (index, row) in table.rows().iter().enumerate().skip(location.data_start()) {
            if !row_has_data(row) {
                continue;
            }
            if self.accept_transaction(index + 1, row, &columns) {
                accepted += 1;
            } else {
                self.stats.skipped_rows += 1;
            }
        }

        self.stats.total_transactions += accepted;
        info!(
            accepted,
            skipped = self.stats.skipped_rows,
            payers = self.payers.len(),
            "processed transactions"
        );
        Ok(accepted)
    }

    fn accept_transaction(&mut self, row_number: usize, row: &[Cell], columns: &ColumnMap) -> bool {
        let text = |field| cell_at(row, columns.get(field)).as_text();

        let payer_id = text(LedgerField::PayerId);
        let payer_name = text(LedgerField::PayerName);
        let amount = self.read_amount(row_number, row, columns, LedgerField::Amount);
        let commission = self.read_amount(row_number, row, columns, LedgerField::Commission);

        if payer_id.is_empty() || payer_name.is_empty() || amount <= 0.0 {
            self.push_warning(IngestWarning::RejectedRow { row: row_number });
            return false;
        }

        let formats = &self.config.date_formats;
        let deposited_on = cell_at(row, columns.get(LedgerField::DepositDate)).as_date(formats);
        let due_on = cell_at(row, columns.get(LedgerField::DueDate)).as_date(formats);

        let credit_days = match (deposited_on, due_on) {
            (Some(start), Some(end)) if days_between(start, end) > 0 => days_between(start, end),
            _ => self.config.default_credit_days,
        };
        let discount = due_on.map_or(0, |due| discount_days(due, self.today));

        let status = text(LedgerField::Status);
        let cancelled = self.is_problematic(&status);

        let payer_id = PayerId(payer_id);
        let transaction = Transaction {
            payer_name: payer_name.clone(),
            payer_id: payer_id.clone(),
            amount,
            commission,
            status,
            deposit_date: text(LedgerField::DepositDate),
            due_date: text(LedgerField::DueDate),
            actual_payment: text(LedgerField::ActualPayment),
            credit_days,
            discount_days: discount,
        };

        self.payers
            .entry(payer_id.clone())
            .or_insert_with(|| PayerAggregate::new(payer_id, payer_name))
            .record(transaction, deposited_on, cancelled);
        true
    }

    fn read_amount(
        &mut self,
        row_number: usize,
        row: &[Cell],
        columns: &ColumnMap,
        field: LedgerField,
    ) -> f64 {
        let cell = cell_at(row, columns.get(field));
        if cell.is_empty() {
            return 0.0;
        }
        match cell.as_number() {
            Some(value) => value,
            None => {
                self.push_warning(IngestWarning::UnparsableNumber {
                    row: row_number,
                    field,
                    value: cell.as_text(),
                });
                0.0
            }
        }
    }

    fn is_problematic(&self, status: &str) -> bool {
        let status = normalize_header(status);
        !status.is_empty()
            && self
                .config
                .problematic_statuses
                .iter()
                .map(|fragment| normalize_header(fragment))
                .any(|fragment| !fragment.is_empty() && status.contains(&fragment))
    }

    /// Attaches bureau scores to known payers; unknown ids are ignored.
    pub fn merge_external_scores(&mut self, table: &Table) -> usize {
        let profile = self.config.profiles.scores.clone();
        let Some((start, columns)) = self.map_side_table("scores", table, &profile) else {
            return 0;
        };

        let mut merged = 0;
        for row in table.rows().iter().skip(start) {
            if !row_has_data(row) {
                continue;
            }
            let payer_id = PayerId(cell_at(row, columns.get(LedgerField::PayerId)).as_text());
            let Some(payer) = self.payers.get_mut(&payer_id) else {
                continue;
            };

            let score = cell_at(row, columns.get(LedgerField::Score))
                .as_number()
                .unwrap_or(self.config.default_external_score);
            payer.external_credit_score = Some(ExternalCreditScore {
                score,
                category: cell_at(row, columns.get(LedgerField::Category)).as_text(),
                risk_level: cell_at(row, columns.get(LedgerField::RiskLevel)).as_text(),
            });
            debug!(payer_id = %payer_id, score, "merged external score");
            merged += 1;
        }

        self.stats.external_scores += merged;
        info!(merged, "merged external credit scores");
        merged
    }

    /// Appends returned checks to known payers. Columns without a recognizable header are read
    /// from their legacy fixed positions.
    pub fn merge_returned_checks(&mut self, table: &Table) -> usize {
        self.returned_table = Some(table.clone());

        let profile = self.config.profiles.returned_checks.clone();
        let Some((start, columns)) = self.map_side_table("returned checks", table, &profile) else {
            return 0;
        };

        let positions = self.config.legacy_returned_positions;
        let amount_column = self.column_or_position(&columns, LedgerField::Amount, positions.amount);
        let reason_column = self.column_or_position(&columns, LedgerField::Reason, positions.reason);
        let date_column = self.column_or_position(&columns, LedgerField::Date, positions.date);

        let mut merged = 0;
        for row in table.rows().iter().skip(start) {
            if !row_has_data(row) {
                continue;
            }
            let payer_id = PayerId(cell_at(row, columns.get(LedgerField::PayerId)).as_text());
            let Some(payer) = self.payers.get_mut(&payer_id) else {
                continue;
            };

            payer.add_returned_check(ReturnedCheck {
                amount: cell_at(row, Some(amount_column)).as_number().unwrap_or(0.0),
                reason: cell_at(row, Some(reason_column)).as_text(),
                date: cell_at(row, Some(date_column)).as_text(),
            });
            merged += 1;
        }

        self.stats.returned_checks += merged;
        info!(merged, "merged returned checks");
        merged
    }

    fn column_or_position(&mut self, columns: &ColumnMap, field: LedgerField, position: usize) -> usize {
        match columns.get(field) {
            Some(index) => index,
            None => {
                self.push_warning(IngestWarning::PositionalFallback { field, position });
                position
            }
        }
    }

    /// Header lookup shared by the side tables; `None` when the payer id column is absent.
    fn map_side_table(
        &mut self,
        table_name: &'static str,
        table: &Table,
        profile: &TableProfile,
    ) -> Option<(usize, ColumnMap)> {
        let location = locate_headers(table, &profile.signals, profile.scan_rows);
        let columns = build_column_map(&location.header_row, &profile.fields);
        debug!(
            table = table_name,
            header_row = location.header_row_index + 1,
            columns = ?columns.to_indexes(&profile.field_names()),
            "mapped side table columns"
        );

        let missing = columns.missing(&profile.required);
        if let Some(field) = missing.first() {
            self.push_warning(IngestWarning::ColumnNotFound {
                table: table_name,
                field: *field,
            });
            return None;
        }
        Some((location.data_start(), columns))
    }

    fn push_warning(&mut self, warning: IngestWarning) {
        warn!(%warning, "ingest warning");
        self.warnings.push(warning);
    }

    /// Runs a full pass over a multi-table upload and produces an immutable payer book.
    pub fn process_workbook(mut self, workbook: &Workbook) -> Result<PayerBook, IngestError> {
        let started = Instant::now();
        let names = self.config.table_names.clone();

        let (transactions_name, transactions) =
            select_transactions(workbook, &names.transactions).ok_or(IngestError::NoTransactionTable)?;
        info!(table = transactions_name, "using transaction table");
        self.process_transactions(transactions)?;

        match select_scores(workbook, &names.scores) {
            Some((_, table)) => {
                self.merge_external_scores(table);
            }
            None => self.push_warning(IngestWarning::TableNotFound { table: "scores" }),
        }

        match select_returned_checks(workbook, &names.returned_checks) {
            Some((_, table)) => {
                self.merge_returned_checks(table);
            }
            None => self.push_warning(IngestWarning::TableNotFound {
                table: "returned checks",
            }),
        }

        match find_named(workbook, &names.warnings) {
            Some((name, table)) => info!(
                table = name,
                rows = table.len(),
                "warnings table present; cancellations come from the status column"
            ),
            None => debug!("no separate warnings table"),
        }

        self.stats.processing_time_ms = started.elapsed().as_millis() as u64;
        Ok(self.into_book())
    }

    /// Freezes the context into a book, filling in the final counters.
    pub fn into_book(mut self) -> PayerBook {
        self.stats.unique_payers = self.payers.len();
        info!(
            transactions = self.stats.total_transactions,
            payers = self.stats.unique_payers,
            external_scores = self.stats.external_scores,
            returned_checks = self.stats.returned_checks,
            warnings = self.warnings.len(),
            "processing pass complete"
        );
        PayerBook::new(
            self.payers,
            self.returned_table,
            self.config.profiles.returned_checks,
            self.stats,
            self.warnings,
        )
    }
}

fn find_named<'a>(workbook: &'a Workbook, names: &[String]) -> Option<(&'a str, &'a Table)> {
    names.iter().find_map(|wanted| {
        workbook
            .iter()
            .find(|(name, table)| *name == *wanted && table.len() > 1)
    })
}

/// Configured names first, then the first multi-row table not named like a score sheet.
fn select_transactions<'a>(workbook: &'a Workbook, names: &[String]) -> Option<(&'a str, &'a Table)> {
    find_named(workbook, names).or_else(|| {
        workbook
            .iter()
            .find(|(name, table)| table.len() > 1 && !name.to_lowercase().contains("score"))
    })
}

fn select_scores<'a>(workbook: &'a Workbook, names: &[String]) -> Option<(&'a str, &'a Table)> {
    find_named(workbook, names).or_else(|| {
        workbook
            .iter()
            .find(|(name, table)| table.len() > 1 && name.to_lowercase().contains("score"))
    })
}

fn select_returned_checks<'a>(
    workbook: &'a Workbook,
    names: &[String],
) -> Option<(&'a str, &'a Table)> {
    find_named(workbook, names).or_else(|| {
        workbook.iter().find(|(name, _)| {
            let name = name.to_lowercase();
            name.contains("חוזר") || name.contains("returned")
        })
    })
}
