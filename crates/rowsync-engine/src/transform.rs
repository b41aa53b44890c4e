//! Per-column value transforms applied before import.
//!
//! A [`TableTransforms`] maps column names to transformers; columns without
//! an entry pass through byte-identical. Transformers see one value at a
//! time and must not depend on sibling columns, so the per-record
//! application order is free.
//!
//! A transformer that rejects its input does not abort anything: the result
//! is an explicit [`CellOutcome::Failed`] carrying the original value, and
//! the import orchestrator decides whether that becomes a NULL or a fatal
//! error.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rowsync_model::Record;
use thiserror::Error;

/// A value a transformer refused, with the original preserved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not transform {value:?}: {reason}")]
pub struct TransformError {
    pub value: String,
    pub reason: String,
}

impl TransformError {
    pub fn new(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Rewrites a single column's value.
pub trait ColumnTransformer: Send + Sync {
    fn apply(&self, value: &str) -> Result<String, TransformError>;
}

impl<F> ColumnTransformer for F
where
    F: Fn(&str) -> Result<String, TransformError> + Send + Sync,
{
    fn apply(&self, value: &str) -> Result<String, TransformError> {
        self(value)
    }
}

/// Rewrites date strings from one chrono pattern to another, e.g.
/// `%d/%m/%Y` → `%Y-%m-%d`.
///
/// Input parsed as a bare date is carried at midnight, so a `to` pattern
/// with time specifiers still formats.
#[derive(Debug, Clone)]
pub struct DateReformat {
    from: String,
    to: String,
}

impl DateReformat {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl ColumnTransformer for DateReformat {
    fn apply(&self, value: &str) -> Result<String, TransformError> {
        let parsed = NaiveDateTime::parse_from_str(value, &self.from)
            .or_else(|_| {
                NaiveDate::parse_from_str(value, &self.from)
                    .map(|date| date.and_time(NaiveTime::MIN))
            })
            .map_err(|error| TransformError::new(value, error.to_string()))?;
        Ok(parsed.format(&self.to).to_string())
    }
}

/// Column name → transformer, applied to every record before import.
#[derive(Default)]
pub struct TableTransforms {
    transformers: BTreeMap<String, Box<dyn ColumnTransformer>>,
}

impl TableTransforms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the transformer for `column`.
    pub fn with_column(
        mut self,
        column: impl Into<String>,
        transformer: impl ColumnTransformer + 'static,
    ) -> Self {
        self.transformers
            .insert(column.into(), Box::new(transformer));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// Applies the mapped transformers to one record. Unmapped columns come
    /// through unchanged.
    pub fn transform_record(&self, record: &Record) -> TransformedRecord {
        let cells = record
            .iter()
            .map(|(column, value)| {
                let outcome = match self.transformers.get(column) {
                    Some(transformer) => match transformer.apply(value) {
                        Ok(transformed) => CellOutcome::Value(transformed),
                        Err(error) => CellOutcome::Failed {
                            original: error.value,
                            reason: error.reason,
                        },
                    },
                    None => CellOutcome::Value(value.to_string()),
                };
                (column.to_string(), outcome)
            })
            .collect();
        TransformedRecord { cells }
    }

    /// Applies the transforms to a whole sequence of records.
    pub fn apply(&self, records: impl IntoIterator<Item = Record>) -> Vec<TransformedRecord> {
        records
            .into_iter()
            .map(|record| self.transform_record(&record))
            .collect()
    }
}

impl fmt::Debug for TableTransforms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableTransforms")
            .field("columns", &self.transformers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The fate of one cell after transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellOutcome {
    Value(String),
    Failed { original: String, reason: String },
}

impl CellOutcome {
    /// The transformed value, or `None` for a failed cell.
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Self::Value(value) => Some(value),
            Self::Failed { .. } => None,
        }
    }
}

/// A record after the transform pipeline, cell by cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformedRecord {
    cells: BTreeMap<String, CellOutcome>,
}

impl TransformedRecord {
    pub fn get(&self, column: &str) -> Option<&CellOutcome> {
        self.cells.get(column)
    }

    /// Cells in the record's column order (the same order the source
    /// [`Record`] iterates in).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellOutcome)> {
        self.cells
            .iter()
            .map(|(column, outcome)| (column.as_str(), outcome))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
