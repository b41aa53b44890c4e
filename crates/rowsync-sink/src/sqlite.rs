//! The SQLite sink.

use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

use rowsync_model::{SinkError, TableSink};

/// [`TableSink`] backed by a SQLite database file (or an in-memory handle
/// for tests).
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|error| SinkError::Open {
            target: path.display().to_string(),
            message: error.to_string(),
        })?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, SinkError> {
        let conn = Connection::open_in_memory().map_err(|error| SinkError::Open {
            target: ":memory:".to_string(),
            message: error.to_string(),
        })?;
        Ok(Self { conn })
    }

    /// Creates `table` with one TEXT column per header name when it does not
    /// exist yet. No types are inferred — cell values are strings.
    pub fn ensure_table(&self, table: &str, columns: &[String]) -> Result<(), SinkError> {
        if columns.is_empty() {
            return Err(SinkError::Statement {
                table: table.to_string(),
                message: "cannot create a table with no columns".to_string(),
            });
        }
        let column_list = columns
            .iter()
            .map(|column| format!("{} TEXT", quote_ident(column)))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({column_list})",
            quote_ident(table)
        );
        self.conn
            .execute(&sql, [])
            .map_err(|error| statement_error(table, &error))?;
        Ok(())
    }

    /// Direct access to the underlying connection, for callers that need to
    /// query what was imported.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl TableSink for SqliteSink {
    fn truncate(&mut self, table: &str) -> Result<(), SinkError> {
        // SQLite has no TRUNCATE statement; an unqualified DELETE is its
        // idiom for clearing a table.
        let sql = format!("DELETE FROM {}", quote_ident(table));
        let cleared = self
            .conn
            .execute(&sql, [])
            .map_err(|error| statement_error(table, &error))?;
        debug!(table, cleared, "sink table cleared");
        Ok(())
    }

    fn insert(
        &mut self,
        table: &str,
        columns: &[String],
        values: &[Option<String>],
    ) -> Result<u64, SinkError> {
        if columns.is_empty() {
            return Ok(0);
        }
        let column_list = columns
            .iter()
            .map(|column| quote_ident(column))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholder_list = (1..=values.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({column_list}) VALUES ({placeholder_list})",
            quote_ident(table)
        );
        let affected = self
            .conn
            .execute(&sql, rusqlite::params_from_iter(values.iter()))
            .map_err(|error| statement_error(table, &error))?;
        Ok(affected as u64)
    }

    fn delete_rows(
        &mut self,
        table: &str,
        start_row: usize,
        end_row: usize,
    ) -> Result<(), SinkError> {
        if start_row < 2 || end_row <= start_row {
            return Ok(());
        }
        // Source row n (header = row 1) lands at rowid n - 1 for a table
        // imported in source order.
        let sql = format!(
            "DELETE FROM {} WHERE rowid >= ?1 AND rowid < ?2",
            quote_ident(table)
        );
        let deleted = self
            .conn
            .execute(
                &sql,
                rusqlite::params![start_row as i64 - 1, end_row as i64 - 1],
            )
            .map_err(|error| statement_error(table, &error))?;
        debug!(table, start_row, end_row, deleted, "sink rows deleted");
        Ok(())
    }

    fn begin(&mut self) -> Result<(), SinkError> {
        self.conn
            .execute_batch("BEGIN")
            .map_err(|error| statement_error("(transaction)", &error))
    }

    fn commit(&mut self) -> Result<(), SinkError> {
        self.conn
            .execute_batch("COMMIT")
            .map_err(|error| statement_error("(transaction)", &error))
    }

    fn rollback(&mut self) -> Result<(), SinkError> {
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|error| statement_error("(transaction)", &error))
    }
}

fn statement_error(table: &str, error: &rusqlite::Error) -> SinkError {
    SinkError::Statement {
        table: table.to_string(),
        message: error.to_string(),
    }
}

/// Double-quotes an identifier so arbitrary sheet headers are usable as
/// column names.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
