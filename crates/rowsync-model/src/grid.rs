//! The in-memory table model: a header plus string-valued data rows.
//!
//! A [`Table`] is built from a rectangular grid where row 0 is the header and
//! every following row is data. Cell values are plain strings; an empty
//! string is a real value, distinct from an absent cell. Data rows shorter
//! than the header simply omit their trailing columns when converted to
//! [`Record`]s — they are not padded with empty strings.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::EmptyTableError;

/// One data row interpreted as column name → cell value.
///
/// Iteration order is deterministic (columns sorted by name). That order is
/// what pairs column names with placeholder values when a record is turned
/// into an insert statement, so it must be the same order within one pass
/// over the record — which a sorted map guarantees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    values: BTreeMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value of `column`, if the row reached that column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Sets (or overwrites) the value of a column.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.values.insert(column.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(column, value)| (column.as_str(), value.as_str()))
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl FromIterator<(String, String)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// A header row plus ordered data rows, as read from a source range.
///
/// Tables are built fresh per read and never cached across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Interprets a raw grid: row 0 is the header, the rest is data.
    ///
    /// An empty grid is the "no data" signal, reported as
    /// [`EmptyTableError`] rather than a panic or a silent empty table.
    pub fn from_grid(grid: Vec<Vec<String>>) -> Result<Self, EmptyTableError> {
        let mut rows = grid.into_iter();
        let headers = rows.next().ok_or(EmptyTableError)?;
        Ok(Self {
            headers,
            rows: rows.collect(),
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows (the header is not counted).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The record for data row `index` (0-based), if it exists.
    ///
    /// A duplicated header name resolves to the rightmost column's value,
    /// since a record holds one value per name.
    pub fn record(&self, index: usize) -> Option<Record> {
        self.rows
            .get(index)
            .map(|row| self.headers.iter().cloned().zip(row.iter().cloned()).collect())
    }

    /// All records in original row order.
    pub fn records(&self) -> impl Iterator<Item = Record> + '_ {
        self.rows
            .iter()
            .map(|row| self.headers.iter().cloned().zip(row.iter().cloned()).collect())
    }
}
