//! SQLite-backed table sinks.
//!
//! The sink's whole job is dynamic, parameterized DML: clear a table,
//! insert one row whose column list comes from the record itself, delete a
//! span of rows. Schema design stays with the caller; the only DDL offered
//! is a convenience that creates an all-TEXT table for a header.

pub mod sqlite;

pub use sqlite::SqliteSink;
