use serde::{Deserialize, Serialize};

use super::locator::{FieldSpec, HeaderCandidate};

/// Semantic column names shared by every ledger table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LedgerField {
    #[serde(rename = "payerName")]
    PayerName,
    #[serde(rename = "payerID")]
    PayerId,
    #[serde(rename = "amount")]
    Amount,
    #[serde(rename = "commission")]
    Commission,
    #[serde(rename = "status")]
    Status,
    #[serde(rename = "depositDate")]
    DepositDate,
    #[serde(rename = "dueDate")]
    DueDate,
    #[serde(rename = "actualPayment")]
    ActualPayment,
    #[serde(rename = "score")]
    Score,
    #[serde(rename = "category")]
    Category,
    #[serde(rename = "riskLevel")]
    RiskLevel,
    #[serde(rename = "reason")]
    Reason,
    #[serde(rename = "date")]
    Date,
}

impl LedgerField {
    pub fn key(self) -> &'static str {
        match self {
            LedgerField::PayerName => "payerName",
            LedgerField::PayerId => "payerID",
            LedgerField::Amount => "amount",
            LedgerField::Commission => "commission",
            LedgerField::Status => "status",
            LedgerField::DepositDate => "depositDate",
            LedgerField::DueDate => "dueDate",
            LedgerField::ActualPayment => "actualPayment",
            LedgerField::Score => "score",
            LedgerField::Category => "category",
            LedgerField::RiskLevel => "riskLevel",
            LedgerField::Reason => "reason",
            LedgerField::Date => "date",
        }
    }
}

impl std::fmt::Display for LedgerField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// How one kind of table announces its header row and names its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableProfile {
    pub signals: Vec<String>,
    pub scan_rows: usize,
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub required: Vec<LedgerField>,
}

impl TableProfile {
    pub fn field_names(&self) -> Vec<LedgerField> {
        self.fields.iter().map(|spec| spec.field).collect()
    }

    /// Standard transaction ledger: exact header names in Hebrew exports and their English
    /// equivalents.
    pub fn transactions() -> Self {
        let exact = |names: &[&str]| -> Vec<HeaderCandidate> {
            names.iter().map(|name| HeaderCandidate::exact(*name)).collect()
        };

        Self {
            signals: strings(&["שם מושך", "מספר זהות מושך", "סכום", "payer name", "payer id"]),
            scan_rows: 5,
            fields: vec![
                FieldSpec::new(LedgerField::PayerName, exact(&["שם מושך", "Payer Name"])),
                FieldSpec::new(LedgerField::PayerId, exact(&["מספר זהות מושך", "Payer ID"])),
                FieldSpec::new(LedgerField::Amount, exact(&["סכום", "Amount"])),
                FieldSpec::new(LedgerField::Commission, exact(&["עמלה", "Commission"])),
                FieldSpec::new(LedgerField::Status, exact(&["סטטוס", "Status"])),
                FieldSpec::new(
                    LedgerField::DepositDate,
                    exact(&["תאריך הפקדה/מסירה", "תאריך הפקדה", "Deposit Date"]),
                ),
                FieldSpec::new(
                    LedgerField::DueDate,
                    exact(&["ת.פירעון", "תאריך פירעון", "Due Date"]),
                ),
                FieldSpec::new(
                    LedgerField::ActualPayment,
                    exact(&["ת.פרעון בפועל", "Actual Payment"]),
                ),
            ],
            required: vec![
                LedgerField::PayerName,
                LedgerField::PayerId,
                LedgerField::Amount,
            ],
        }
    }

    /// External credit score sheet; columns are matched by substring.
    pub fn scores() -> Self {
        Self {
            signals: strings(&[
                "ח.פ", "מספר זהות", "זהות", "payer id", "id", "דירוג", "ציון", "score", "rating",
            ]),
            scan_rows: 3,
            fields: vec![
                FieldSpec::new(
                    LedgerField::PayerId,
                    contains(&["ח.פ", "מספר זהות", "זהות", "payer id", "id"]),
                ),
                FieldSpec::new(
                    LedgerField::Score,
                    contains(&["דירוג", "ציון", "score", "rating"]),
                ),
                FieldSpec::new(
                    LedgerField::Category,
                    contains(&["קטגוריה", "סיווג", "category"]),
                ),
                FieldSpec::new(
                    LedgerField::RiskLevel,
                    contains(&["רמת סיכון", "סיכון", "risk"]),
                ),
            ],
            required: vec![LedgerField::PayerId],
        }
    }

    /// Returned-check register; columns are matched by substring.
    pub fn returned_checks() -> Self {
        Self {
            signals: strings(&["מספר מזהה מושך", "מספר זהות", "ח.פ", "payer id", "tax id"]),
            scan_rows: 3,
            fields: vec![
                FieldSpec::new(
                    LedgerField::PayerId,
                    contains(&["מספר מזהה מושך", "מספר זהות", "ח.פ", "payer id", "tax id"]),
                ),
                FieldSpec::new(LedgerField::Amount, contains(&["סכום", "amount"])),
                FieldSpec::new(LedgerField::Reason, contains(&["סיבת", "סיבה", "reason"])),
                FieldSpec::new(LedgerField::Date, contains(&["תאריך", "date"])),
            ],
            required: vec![LedgerField::PayerId],
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn contains(names: &[&str]) -> Vec<HeaderCandidate> {
    names
        .iter()
        .map(|name| HeaderCandidate::contains(*name))
        .collect()
}

/// Header profiles for the three table kinds, overridable from the rating config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderProfiles {
    pub transactions: TableProfile,
    pub scores: TableProfile,
    pub returned_checks: TableProfile,
}

impl Default for HeaderProfiles {
    fn default() -> Self {
        Self {
            transactions: TableProfile::transactions(),
            scores: TableProfile::scores(),
            returned_checks: TableProfile::returned_checks(),
        }
    }
}
