//! CSV-backed table sources.
//!
//! A directory of CSV files stands in for a hosted spreadsheet: the sheet
//! named `S` is the file `S.csv`, and its first row inside any requested
//! range is that range's header. A hosted-sheet client would implement the
//! same [`rowsync_model::TableSource`] trait; nothing upstream of the trait
//! knows the difference.

pub mod csv_source;

pub use csv_source::CsvWorkbookSource;
