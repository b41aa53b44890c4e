//! The spreadsheet-side collaborator contract.

use crate::error::SourceError;
use crate::grid::Table;
use crate::range::RangeRef;

/// A spreadsheet-like table source.
///
/// Implementations wrap the actual I/O (a CSV workbook directory, a hosted
/// sheet API, ...). The engine only ever sees rectangular grids of
/// string-rendered cells, one synchronous request per call.
pub trait TableSource {
    /// Reads a rectangular range. The first row of the result is always the
    /// header row of that range.
    ///
    /// An addressable but empty rectangle is reported as
    /// [`SourceError::EmptyRange`], which callers treat as "no data" rather
    /// than a failure.
    fn read_range(&self, range: &RangeRef) -> Result<Table, SourceError>;

    /// Appends one row after the last occupied row of the range's sheet.
    fn append_row(&mut self, range: &RangeRef, row: &[String]) -> Result<(), SourceError>;

    /// Deletes source rows in `[start_row, end_row)`.
    ///
    /// Row numbers follow the source addressing convention: the header
    /// occupies row 1, so data row `i` (0-based) is source row `i + 2`.
    fn delete_rows(
        &mut self,
        sheet: &str,
        start_row: usize,
        end_row: usize,
    ) -> Result<(), SourceError>;
}
