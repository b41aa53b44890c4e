//! Error taxonomy shared by the engine and the source/sink collaborators.

use thiserror::Error;

/// A source range produced no rows at all, not even a header.
///
/// This is a recoverable signal, not a failure: callers that select rows
/// treat it as zero matches, and the import orchestrator treats it as zero
/// rows to insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("range returned no rows")]
pub struct EmptyTableError;

/// Errors raised by a [`crate::TableSource`] implementation.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The range is addressable but contains nothing (recoverable).
    #[error(transparent)]
    EmptyRange(#[from] EmptyTableError),

    /// The named sheet does not exist in the workbook.
    #[error("sheet not found: {sheet}")]
    SheetNotFound { sheet: String },

    /// The sheet exists but could not be read.
    #[error("failed to read sheet {sheet}: {source}")]
    Read {
        sheet: String,
        #[source]
        source: std::io::Error,
    },

    /// The sheet's contents could not be decoded as a grid of cells.
    #[error("failed to parse sheet {sheet}: {message}")]
    Parse { sheet: String, message: String },
}

impl SourceError {
    /// True when the error only means "no data there", not a real failure.
    pub fn is_empty_range(&self) -> bool {
        matches!(self, Self::EmptyRange(_))
    }
}

/// Errors raised by a [`crate::TableSink`] implementation.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink target (database file, connection, ...) could not be opened.
    #[error("failed to open sink {target}: {message}")]
    Open { target: String, message: String },

    /// A statement against the sink failed.
    #[error("statement failed on table {table}: {message}")]
    Statement { table: String, message: String },

    /// The sink does not implement transactional control.
    #[error("transactions are not supported by this sink")]
    TransactionsUnsupported,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_range_is_recoverable() {
        let error = SourceError::from(EmptyTableError);
        assert!(error.is_empty_range());
        assert!(
            !SourceError::SheetNotFound {
                sheet: "Expense".to_string()
            }
            .is_empty_range()
        );
    }

    #[test]
    fn sink_error_display_names_the_table() {
        let error = SinkError::Statement {
            table: "expenses".to_string(),
            message: "no such table".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "statement failed on table expenses: no such table"
        );
    }
}
