use crate::dates::{from_serial_day, DateFormats};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Read;

use super::normalizer::clean_text;

/// Single spreadsheet cell as handed over by the loader.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl Cell {
    pub fn text<S: Into<String>>(value: S) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(value) => value.trim().is_empty(),
            Cell::Number(value) => !value.is_finite(),
        }
    }

    /// Trimmed textual form; integral numbers render without a fractional part so that numeric
    /// identifiers match their text spelling in other tables.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(value) => clean_text(value),
            Cell::Number(value) if !value.is_finite() => String::new(),
            Cell::Number(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
                format!("{}", *value as i64)
            }
            Cell::Number(value) => value.to_string(),
        }
    }

    /// Numeric value of the cell, tolerating thousands separators and currency marks.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) if value.is_finite() => Some(*value),
            Cell::Number(_) | Cell::Empty => None,
            Cell::Text(value) => parse_number(value),
        }
    }

    /// Date value of the cell; numbers are read as spreadsheet serial days.
    pub fn as_date(&self, formats: &DateFormats) -> Option<NaiveDate> {
        match self {
            Cell::Number(serial) => from_serial_day(*serial),
            Cell::Text(value) => formats.parse(value),
            Cell::Empty => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::from(value.as_str())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '\u{20aa}' | '$' | '\u{20ac}' | '%') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|number| number.is_finite())
}

/// Ordered rows of cells with no fixed schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Builds a table from string rows; blank strings become [`Cell::Empty`].
    pub fn from_text_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|cell| Cell::from(cell.as_ref())).collect())
            .collect();
        Self { rows }
    }

    /// Materializes a headerless, ragged CSV export into a table of text cells.
    ///
    /// Fields stay text so identifiers keep leading zeros; numeric reads go through
    /// [`Cell::as_number`].
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(Cell::from).collect());
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[Cell]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A row has data when at least one of its cells is non-empty.
pub fn row_has_data(row: &[Cell]) -> bool {
    row.iter().any(|cell| !cell.is_empty())
}

/// Cell at `index`, treating out-of-range positions as empty.
pub fn cell_at(row: &[Cell], index: Option<usize>) -> &Cell {
    const EMPTY: &Cell = &Cell::Empty;
    index.and_then(|index| row.get(index)).unwrap_or(EMPTY)
}

/// Named tables in upload order, e.g. the sheets of one workbook or several single-table files.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    tables: Vec<(String, Table)>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a named table, keeping its original position on replacement.
    pub fn insert<S: Into<String>>(&mut self, name: S, table: Table) {
        let name = name.into();
        match self.tables.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = table,
            None => self.tables.push((name, table)),
        }
    }

    pub fn with_table<S: Into<String>>(mut self, name: S, table: Table) -> Self {
        self.insert(name, table);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, table)| table)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter().map(|(name, table)| (name.as_str(), table))
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
