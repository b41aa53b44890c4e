//! The import orchestrator: truncate sink → fetch source → transform →
//! insert each record.
//!
//! The sequence fails fast on truncation (no stale data is ever half
//! overwritten before the source is even read) and treats an empty source
//! range as zero rows, not an error. Each insert is an independent unit: by
//! default a failing row aborts the remainder without undoing committed
//! rows, while [`ImportOptions::atomic`] wraps the whole insert phase in a
//! sink transaction for all-or-nothing behavior.

use std::time::{Duration, Instant};

use rowsync_model::{RangeRef, SinkError, SourceError, TableSink, TableSource};
use tracing::{debug, info, info_span, warn};

use crate::select::SHEET_ROW_OFFSET;
use crate::transform::{CellOutcome, TableTransforms, TransformError, TransformedRecord};

/// One import job: a source range feeding a sink table.
#[derive(Debug, Clone)]
pub struct ImportJob {
    pub table: String,
    pub range: RangeRef,
}

impl ImportJob {
    pub fn new(table: impl Into<String>, range: RangeRef) -> Self {
        Self {
            table: table.into(),
            range,
        }
    }
}

/// What to do when a column transformer rejects a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Insert a NULL for the failed cell and keep going (logged with row and
    /// column context).
    #[default]
    NullOnFailure,
    /// Abort the import at the first failed cell.
    Abort,
}

#[derive(Debug, Default)]
pub struct ImportOptions {
    /// Per-column transforms; `None` is a pass-through import.
    pub transforms: Option<TableTransforms>,
    pub on_transform_failure: FailurePolicy,
    /// Run every insert of the job inside one sink transaction, rolling back
    /// on the first failure.
    pub atomic: bool,
}

/// Counters from a completed import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub table: String,
    pub rows_read: usize,
    pub rows_inserted: usize,
    /// Cells inserted as NULL because a transformer rejected them.
    pub transform_failures: usize,
    pub duration: Duration,
}

/// A failed import, naming the operation and the row/column it died on.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to clear sink table {table}: {source}")]
    Truncate {
        table: String,
        #[source]
        source: SinkError,
    },

    #[error("failed to read source range {range}: {source}")]
    Fetch {
        range: String,
        #[source]
        source: SourceError,
    },

    #[error("transform failed at source row {row}, column {column}: {source}")]
    Transform {
        row: usize,
        column: String,
        #[source]
        source: TransformError,
    },

    #[error("insert into {table} failed at source row {row}: {source}")]
    Insert {
        table: String,
        row: usize,
        #[source]
        source: SinkError,
    },

    #[error("failed to {operation} sink transaction: {source}")]
    Transaction {
        operation: &'static str,
        #[source]
        source: SinkError,
    },
}

/// Runs one import job end to end.
pub fn import(
    source: &dyn TableSource,
    sink: &mut dyn TableSink,
    job: &ImportJob,
    options: &ImportOptions,
) -> Result<ImportReport, ImportError> {
    let start = Instant::now();
    let span = info_span!("import", table = %job.table, range = %job.range);
    let _guard = span.enter();

    sink.truncate(&job.table).map_err(|source| ImportError::Truncate {
        table: job.table.clone(),
        source,
    })?;
    debug!("sink table cleared");

    let table = match source.read_range(&job.range) {
        Ok(table) => table,
        Err(error) if error.is_empty_range() => {
            info!("source range is empty; nothing to import");
            return Ok(ImportReport {
                table: job.table.clone(),
                rows_read: 0,
                rows_inserted: 0,
                transform_failures: 0,
                duration: start.elapsed(),
            });
        }
        Err(source) => {
            return Err(ImportError::Fetch {
                range: job.range.to_string(),
                source,
            });
        }
    };
    let rows_read = table.row_count();
    debug!(rows_read, "source range fetched");

    let mut inserted = 0usize;
    let mut failures = 0usize;

    if options.atomic {
        sink.begin().map_err(|source| ImportError::Transaction {
            operation: "begin",
            source,
        })?;
    }
    let outcome = insert_rows(sink, job, options, &table, &mut inserted, &mut failures);
    if options.atomic {
        match &outcome {
            Ok(()) => sink.commit().map_err(|source| ImportError::Transaction {
                operation: "commit",
                source,
            })?,
            Err(_) => {
                if let Err(error) = sink.rollback() {
                    warn!(%error, "rollback failed after import error");
                }
            }
        }
    }
    outcome?;

    let report = ImportReport {
        table: job.table.clone(),
        rows_read,
        rows_inserted: inserted,
        transform_failures: failures,
        duration: start.elapsed(),
    };
    info!(
        rows_read = report.rows_read,
        rows_inserted = report.rows_inserted,
        transform_failures = report.transform_failures,
        duration_ms = report.duration.as_millis() as u64,
        "import complete"
    );
    Ok(report)
}

fn insert_rows(
    sink: &mut dyn TableSink,
    job: &ImportJob,
    options: &ImportOptions,
    table: &rowsync_model::Table,
    inserted: &mut usize,
    failures: &mut usize,
) -> Result<(), ImportError> {
    let pass_through = TableTransforms::new();
    let transforms = options.transforms.as_ref().unwrap_or(&pass_through);

    for (index, record) in table.records().enumerate() {
        let source_row = index + SHEET_ROW_OFFSET;
        let transformed = transforms.transform_record(&record);
        let (columns, values) = bind_row(&transformed, options, source_row, failures)?;
        sink.insert(&job.table, &columns, &values)
            .map_err(|source| ImportError::Insert {
                table: job.table.clone(),
                row: source_row,
                source,
            })?;
        *inserted += 1;
    }
    Ok(())
}

/// Pairs column names with bound values in the record's own iteration order.
/// Values are trimmed; a value trimming to empty becomes NULL rather than an
/// empty string literal.
fn bind_row(
    transformed: &TransformedRecord,
    options: &ImportOptions,
    source_row: usize,
    failures: &mut usize,
) -> Result<(Vec<String>, Vec<Option<String>>), ImportError> {
    let mut columns = Vec::with_capacity(transformed.len());
    let mut values = Vec::with_capacity(transformed.len());
    for (column, outcome) in transformed.iter() {
        let value = match outcome {
            CellOutcome::Value(value) => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellOutcome::Failed { original, reason } => match options.on_transform_failure {
                FailurePolicy::NullOnFailure => {
                    warn!(
                        row = source_row,
                        column,
                        value = %original,
                        reason = %reason,
                        "transform failed; inserting NULL"
                    );
                    *failures += 1;
                    None
                }
                FailurePolicy::Abort => {
                    return Err(ImportError::Transform {
                        row: source_row,
                        column: column.to_string(),
                        source: TransformError::new(original.clone(), reason.clone()),
                    });
                }
            },
        };
        columns.push(column.to_string());
        values.push(value);
    }
    Ok((columns, values))
}
