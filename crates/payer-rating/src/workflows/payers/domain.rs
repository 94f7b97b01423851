use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of the party that wrote the check (tax or national id as exported).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayerId(pub String);

impl PayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One accepted ledger row. Date fields keep the cleaned source text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub payer_name: String,
    pub payer_id: PayerId,
    pub amount: f64,
    pub commission: f64,
    pub status: String,
    pub deposit_date: String,
    pub due_date: String,
    pub actual_payment: String,
    pub credit_days: i64,
    pub discount_days: i64,
}

/// Bureau score merged from the external score table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalCreditScore {
    pub score: f64,
    pub category: String,
    pub risk_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnedCheck {
    pub amount: f64,
    pub reason: String,
    pub date: String,
}

/// Everything known about one payer after a processing pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayerAggregate {
    pub payer_id: PayerId,
    pub name: String,
    pub transactions: Vec<Transaction>,
    pub total_amount: f64,
    pub total_commission: f64,
    pub total_credit_days: i64,
    pub total_discount_days: i64,
    pub cancelled_transactions: u32,
    pub first_transaction_date: Option<NaiveDate>,
    pub last_transaction_date: Option<NaiveDate>,
    pub external_credit_score: Option<ExternalCreditScore>,
    pub returned_checks: Option<Vec<ReturnedCheck>>,
}

impl PayerAggregate {
    pub fn new(payer_id: PayerId, name: String) -> Self {
        Self {
            payer_id,
            name,
            transactions: Vec::new(),
            total_amount: 0.0,
            total_commission: 0.0,
            total_credit_days: 0,
            total_discount_days: 0,
            cancelled_transactions: 0,
            first_transaction_date: None,
            last_transaction_date: None,
            external_credit_score: None,
            returned_checks: None,
        }
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Appends a transaction and folds it into the running totals.
    pub(crate) fn record(
        &mut self,
        transaction: Transaction,
        deposited_on: Option<NaiveDate>,
        cancelled: bool,
    ) {
        self.total_amount += transaction.amount;
        self.total_commission += transaction.commission;
        self.total_credit_days += transaction.credit_days;
        self.total_discount_days += transaction.discount_days;
        if cancelled {
            self.cancelled_transactions += 1;
        }

        if let Some(date) = deposited_on {
            if self.first_transaction_date.map_or(true, |first| date < first) {
                self.first_transaction_date = Some(date);
            }
            if self.last_transaction_date.map_or(true, |last| date > last) {
                self.last_transaction_date = Some(date);
            }
        }

        self.transactions.push(transaction);
    }

    pub(crate) fn add_returned_check(&mut self, check: ReturnedCheck) {
        self.returned_checks.get_or_insert_with(Vec::new).push(check);
    }

    pub fn summary(&self) -> PayerSummary {
        PayerSummary {
            payer_id: self.payer_id.clone(),
            name: self.name.clone(),
            transaction_count: self.transaction_count(),
            total_amount: self.total_amount,
            has_external_score: self.external_credit_score.is_some(),
            returned_checks: self.returned_checks.as_ref().map_or(0, Vec::len),
        }
    }
}

/// Listing view used by search and the payer index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayerSummary {
    pub payer_id: PayerId,
    pub name: String,
    pub transaction_count: usize,
    pub total_amount: f64,
    pub has_external_score: bool,
    pub returned_checks: usize,
}

/// Counters gathered over one processing pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub total_transactions: usize,
    pub skipped_rows: usize,
    pub unique_payers: usize,
    pub external_scores: usize,
    pub returned_checks: usize,
    pub processing_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction(amount: f64) -> Transaction {
        Transaction {
            payer_name: "Acme".into(),
            payer_id: PayerId::from("1"),
            amount,
            commission: 10.0,
            status: String::new(),
            deposit_date: String::new(),
            due_date: String::new(),
            actual_payment: String::new(),
            credit_days: 30,
            discount_days: 0,
        }
    }

    #[test]
    fn record_tracks_dates_as_dates() {
        let mut payer = PayerAggregate::new(PayerId::from("1"), "Acme".into());
        let jan = NaiveDate::from_ymd_opt(2024, 1, 15).expect("date");
        let dec = NaiveDate::from_ymd_opt(2023, 12, 2).expect("date");

        payer.record(transaction(100.0), Some(jan), false);
        payer.record(transaction(50.0), Some(dec), true);
        payer.record(transaction(25.0), None, false);

        assert_eq!(payer.transaction_count(), 3);
        assert_eq!(payer.total_amount, 175.0);
        assert_eq!(payer.total_credit_days, 90);
        assert_eq!(payer.cancelled_transactions, 1);
        assert_eq!(payer.first_transaction_date, Some(dec));
        assert_eq!(payer.last_transaction_date, Some(jan));
    }

    #[test]
    fn returned_checks_start_absent() {
        let mut payer = PayerAggregate::new(PayerId::from("1"), "Acme".into());
        assert!(payer.returned_checks.is_none());

        payer.add_returned_check(ReturnedCheck {
            amount: 500.0,
            reason: "insufficient funds".into(),
            date: "01/02/2024".into(),
        });
        assert_eq!(payer.summary().returned_checks, 1);
    }
}
