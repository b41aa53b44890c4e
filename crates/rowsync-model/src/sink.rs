//! The relational-side collaborator contract.

use crate::error::SinkError;

/// A relational table sink.
///
/// Values are passed as `Option<String>`: `None` is the null/absent marker
/// used for cells that trimmed to the empty string or failed a transform.
pub trait TableSink {
    /// Destructively clears the target table.
    fn truncate(&mut self, table: &str) -> Result<(), SinkError>;

    /// Inserts one row. `columns` and `values` are paired positionally and
    /// must come from the same iteration over one record.
    ///
    /// Returns the number of rows affected.
    fn insert(
        &mut self,
        table: &str,
        columns: &[String],
        values: &[Option<String>],
    ) -> Result<u64, SinkError>;

    /// Deletes rows addressed as source rows in `[start_row, end_row)`,
    /// using the same convention as the row selector (header = row 1).
    fn delete_rows(
        &mut self,
        table: &str,
        start_row: usize,
        end_row: usize,
    ) -> Result<(), SinkError>;

    /// Opens a transaction, when the sink supports one.
    fn begin(&mut self) -> Result<(), SinkError> {
        Err(SinkError::TransactionsUnsupported)
    }

    fn commit(&mut self) -> Result<(), SinkError> {
        Err(SinkError::TransactionsUnsupported)
    }

    fn rollback(&mut self) -> Result<(), SinkError> {
        Err(SinkError::TransactionsUnsupported)
    }
}
