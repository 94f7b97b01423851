use serde::{Deserialize, Serialize};

use crate::dates::DateFormats;
use crate::workflows::ledger::HeaderProfiles;

/// Knobs for one aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    pub profiles: HeaderProfiles,
    /// Status fragments that mark a transaction as cancelled or dishonored.
    pub problematic_statuses: Vec<String>,
    pub date_formats: DateFormats,
    pub default_credit_days: i64,
    pub default_external_score: f64,
    pub legacy_returned_positions: ReturnedCheckPositions,
    pub table_names: TableNames,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            profiles: HeaderProfiles::default(),
            problematic_statuses: ["ביטול", "אכ\"מ", "חזר", "cancel", "returned", "dishonored"]
                .iter()
                .map(|status| status.to_string())
                .collect(),
            date_formats: DateFormats::default(),
            default_credit_days: 30,
            default_external_score: 50.0,
            legacy_returned_positions: ReturnedCheckPositions::default(),
            table_names: TableNames::default(),
        }
    }
}

/// Fixed column positions used when the returned-check register has unrecognized headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnedCheckPositions {
    pub amount: usize,
    pub reason: usize,
    pub date: usize,
}

impl Default for ReturnedCheckPositions {
    fn default() -> Self {
        Self {
            amount: 2,
            reason: 3,
            date: 4,
        }
    }
}

/// Preferred table names, tried in order before falling back to name heuristics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableNames {
    pub transactions: Vec<String>,
    pub scores: Vec<String>,
    pub returned_checks: Vec<String>,
    pub warnings: Vec<String>,
}

impl Default for TableNames {
    fn default() -> Self {
        let names = |values: &[&str]| values.iter().map(|value| value.to_string()).collect();
        Self {
            transactions: names(&["גיליון1", "Sheet1", "transactions"]),
            scores: names(&["scoreM_N", "scores"]),
            returned_checks: names(&["שיקים_חוזרים", "שיקים חוזרים", "returned_checks"]),
            warnings: names(&["אכ\"מ", "ביטולים", "warnings"]),
        }
    }
}
