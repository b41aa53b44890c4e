//! A1-style range references: `Expense!A:F`, `Sheet1!A2:F100`, `Sheet1`.
//!
//! Row numbers are 1-based source rows (the header of a well-formed range
//! sits in its first row); column letters use the usual base-26 scheme
//! (`A` = 0, `Z` = 25, `AA` = 26).

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// A named rectangular slice of a workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeRef {
    /// Sheet (tab) name.
    pub sheet: String,
    /// First column of the range, 0-based.
    pub start_col: u32,
    /// Last column, 0-based inclusive; `None` means "to the last used cell".
    pub end_col: Option<u32>,
    /// First source row, 1-based; `None` means "from the top".
    pub start_row: Option<u32>,
    /// Last source row, 1-based inclusive; `None` means "to the bottom".
    pub end_row: Option<u32>,
}

impl RangeRef {
    /// A reference covering the whole sheet.
    pub fn sheet(name: impl Into<String>) -> Self {
        Self {
            sheet: name.into(),
            start_col: 0,
            end_col: None,
            start_row: None,
            end_row: None,
        }
    }
}

/// A range string that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed range reference {input:?}: {reason}")]
pub struct RangeParseError {
    pub input: String,
    pub reason: String,
}

impl RangeParseError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

impl FromStr for RangeRef {
    type Err = RangeParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(RangeParseError::new(input, "empty reference"));
        }
        let Some((sheet, bounds)) = trimmed.split_once('!') else {
            return Ok(Self::sheet(trimmed));
        };
        if sheet.is_empty() {
            return Err(RangeParseError::new(input, "missing sheet name"));
        }
        let (start, end) = match bounds.split_once(':') {
            Some((start, end)) => (start, Some(end)),
            None => (bounds, None),
        };
        let (start_col, start_row) = parse_bound(input, start)?;
        let start_col =
            start_col.ok_or_else(|| RangeParseError::new(input, "missing start column"))?;
        let (end_col, end_row) = match end {
            Some(end) => parse_bound(input, end)?,
            // A single-cell reference like `Sheet!B2` bounds both sides.
            None => (Some(start_col), start_row),
        };
        if let Some(end_col) = end_col {
            if end_col < start_col {
                return Err(RangeParseError::new(input, "end column before start column"));
            }
        }
        if let (Some(start_row), Some(end_row)) = (start_row, end_row) {
            if end_row < start_row {
                return Err(RangeParseError::new(input, "end row before start row"));
            }
        }
        Ok(Self {
            sheet: sheet.to_string(),
            start_col,
            end_col,
            start_row,
            end_row,
        })
    }
}

/// Splits one bound like `A`, `A2`, or `2` into its column and row parts.
fn parse_bound(
    input: &str,
    bound: &str,
) -> Result<(Option<u32>, Option<u32>), RangeParseError> {
    let letters: String = bound
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    let digits = &bound[letters.len()..];
    let column = if letters.is_empty() {
        None
    } else {
        Some(column_index(&letters))
    };
    let row = if digits.is_empty() {
        None
    } else {
        let row: u32 = digits
            .parse()
            .map_err(|_| RangeParseError::new(input, format!("bad row number {digits:?}")))?;
        if row == 0 {
            return Err(RangeParseError::new(input, "row numbers start at 1"));
        }
        Some(row)
    };
    if column.is_none() && row.is_none() {
        return Err(RangeParseError::new(input, "empty bound"));
    }
    Ok((column, row))
}

fn column_index(letters: &str) -> u32 {
    letters
        .chars()
        .fold(0u32, |acc, c| acc * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1))
        - 1
}

/// The A1 letters for a 0-based column index (`0` → `A`, `26` → `AA`).
pub fn column_label(index: u32) -> String {
    let mut index = index + 1;
    let mut letters = Vec::new();
    while index > 0 {
        index -= 1;
        letters.push(b'A' + (index % 26) as u8);
        index /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

impl fmt::Display for RangeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sheet)?;
        if self.start_col == 0
            && self.end_col.is_none()
            && self.start_row.is_none()
            && self.end_row.is_none()
        {
            return Ok(());
        }
        write!(f, "!{}", column_label(self.start_col))?;
        if let Some(row) = self.start_row {
            write!(f, "{row}")?;
        }
        write!(f, ":")?;
        if let Some(col) = self.end_col {
            write!(f, "{}", column_label(col))?;
        }
        if let Some(row) = self.end_row {
            write!(f, "{row}")?;
        }
        Ok(())
    }
}
