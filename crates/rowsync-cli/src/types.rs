//! Shared types for the command layer.

use std::collections::BTreeMap;

use serde::Deserialize;

use rowsync_engine::ImportReport;
use rowsync_model::Record;

/// One entry in a `--jobs` file.
///
/// ```json
/// {
///   "range": "Expense!A:F",
///   "table": "expenses",
///   "date_columns": { "Date": { "from": "%d/%m/%Y", "to": "%Y-%m-%d" } }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobSpec {
    /// Source range, e.g. "Expense!A:F".
    pub range: String,

    /// Sink table; defaults to the range's sheet name.
    #[serde(default)]
    pub table: Option<String>,

    /// Date columns to reformat before insert (chrono patterns).
    #[serde(default)]
    pub date_columns: BTreeMap<String, DateColumnSpec>,
}

/// A date rewrite for one column.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DateColumnSpec {
    pub from: String,
    pub to: String,
}

/// The result of one import job, success or not.
#[derive(Debug)]
pub struct ImportOutcome {
    pub table: String,
    pub range: String,
    pub report: Option<ImportReport>,
    pub error: Option<String>,
}

impl ImportOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything a `rows` query produced.
#[derive(Debug)]
pub struct RowsOutput {
    /// Header names of the queried range, in range order.
    pub headers: Vec<String>,
    pub records: Vec<Record>,
    /// Matching source row numbers (range-relative, header = row 1).
    pub row_numbers: Vec<usize>,
}

/// What a `prune` run deleted (or would delete).
#[derive(Debug)]
pub struct PruneOutcome {
    /// Absolute source row numbers of the matching rows.
    pub matched_rows: Vec<usize>,
    pub dry_run: bool,
}
