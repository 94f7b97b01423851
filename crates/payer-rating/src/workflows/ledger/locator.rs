use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::normalizer::{clean_text, normalize_header};
use super::profiles::LedgerField;
use super::table::{Cell, Table};

/// Header row chosen for a table together with its cells.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderLocation {
    pub header_row_index: usize,
    pub header_row: Vec<Cell>,
}

impl HeaderLocation {
    /// Index of the first data row.
    pub fn data_start(&self) -> usize {
        self.header_row_index + 1
    }
}

/// Scans the first `scan_rows` rows for one whose cells contain any of `signals`.
///
/// Matching is a case-insensitive substring test. When nothing matches, row 0 is used and an
/// empty table yields an empty header.
pub fn locate_headers(table: &Table, signals: &[String], scan_rows: usize) -> HeaderLocation {
    let signals: Vec<String> = signals
        .iter()
        .map(|signal| normalize_header(signal))
        .filter(|signal| !signal.is_empty())
        .collect();

    let found = table
        .rows()
        .iter()
        .take(scan_rows)
        .position(|row| row_mentions_any(row, &signals));

    let header_row_index = found.unwrap_or(0);
    HeaderLocation {
        header_row_index,
        header_row: table
            .row(header_row_index)
            .map(<[Cell]>::to_vec)
            .unwrap_or_default(),
    }
}

fn row_mentions_any(row: &[Cell], signals: &[String]) -> bool {
    row.iter().any(|cell| {
        let header = normalize_header(&cell.as_text());
        !header.is_empty() && signals.iter().any(|signal| header.contains(signal.as_str()))
    })
}

/// How a candidate header is compared against a header cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Trimmed, exact equality.
    Exact,
    /// Case-insensitive substring.
    Contains,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCandidate {
    pub text: String,
    #[serde(default = "default_match_mode")]
    pub mode: MatchMode,
}

fn default_match_mode() -> MatchMode {
    MatchMode::Exact
}

impl HeaderCandidate {
    pub fn exact<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            mode: MatchMode::Exact,
        }
    }

    pub fn contains<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            mode: MatchMode::Contains,
        }
    }

    fn matches(&self, header: &Cell) -> bool {
        let header = header.as_text();
        if header.is_empty() {
            return false;
        }
        match self.mode {
            MatchMode::Exact => header == clean_text(&self.text),
            MatchMode::Contains => {
                let needle = normalize_header(&self.text);
                !needle.is_empty() && normalize_header(&header).contains(&needle)
            }
        }
    }
}

/// Ordered header candidates for one semantic field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub field: LedgerField,
    pub candidates: Vec<HeaderCandidate>,
}

impl FieldSpec {
    pub fn new(field: LedgerField, candidates: Vec<HeaderCandidate>) -> Self {
        Self { field, candidates }
    }
}

/// Semantic field to column index; absent fields were not found in the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: BTreeMap<LedgerField, usize>,
}

impl ColumnMap {
    pub fn get(&self, field: LedgerField) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    pub fn contains(&self, field: LedgerField) -> bool {
        self.columns.contains_key(&field)
    }

    /// Absent fields out of `required`, in the order given.
    pub fn missing(&self, required: &[LedgerField]) -> Vec<LedgerField> {
        required
            .iter()
            .copied()
            .filter(|field| !self.contains(*field))
            .collect()
    }

    /// Boundary view where absent fields are reported as -1.
    pub fn to_indexes(&self, fields: &[LedgerField]) -> BTreeMap<&'static str, i64> {
        fields
            .iter()
            .map(|field| {
                let index = self.get(*field).map(|index| index as i64).unwrap_or(-1);
                (field.key(), index)
            })
            .collect()
    }
}

/// Resolves each field to the first header cell matched by its earliest matching candidate.
pub fn build_column_map(header_row: &[Cell], field_specs: &[FieldSpec]) -> ColumnMap {
    let mut columns = BTreeMap::new();
    for spec in field_specs {
        let index = spec.candidates.iter().find_map(|candidate| {
            header_row
                .iter()
                .position(|header| candidate.matches(header))
        });
        if let Some(index) = index {
            columns.insert(spec.field, index);
        }
    }
    ColumnMap { columns }
}
