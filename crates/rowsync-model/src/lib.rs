pub mod error;
pub mod grid;
pub mod range;
pub mod sink;
pub mod source;

pub use error::{EmptyTableError, SinkError, SourceError};
pub use grid::{Record, Table};
pub use range::{RangeParseError, RangeRef, column_label};
pub use sink::TableSink;
pub use source::TableSource;
