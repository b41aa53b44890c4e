//! The row filtering and transformation engine.
//!
//! Everything here is pure, synchronous computation over the immutable
//! [`rowsync_model`] types: predicates over single cell values
//! ([`conditions`]), per-column filter sets ([`filter`]), row selection with
//! source-row addressing ([`select`]), per-column value transforms
//! ([`transform`]), and the import orchestrator that glues them to the
//! source/sink collaborators ([`import`]).

pub mod conditions;
pub mod error;
pub mod filter;
pub mod import;
pub mod predicate;
pub mod select;
pub mod transform;

pub use error::EngineError;
pub use filter::{ColumnFilterBuilder, ColumnFilters};
pub use import::{FailurePolicy, ImportError, ImportJob, ImportOptions, ImportReport, import};
pub use predicate::Predicate;
pub use select::{SHEET_ROW_OFFSET, row_number_runs, select, select_row_numbers};
pub use transform::{
    CellOutcome, ColumnTransformer, DateReformat, TableTransforms, TransformError,
    TransformedRecord,
};
