//! Tabular text decoder
//!
//! Turns already-decoded spreadsheet text into rows of raw string cells.
//! The decoder never fails: malformed quoting is closed at end of input and
//! whatever was accumulated is kept. Cells are not trimmed here.

use serde::Serialize;

const BOM: char = '\u{FEFF}';
const QUOTE: char = '"';
const DELIMITER: char = ',';

/// Rows of raw string cells, immutable once decoded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawTable {
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(|r| r.as_slice())
    }

    /// Cell at (row, column), or None when either index is out of range
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(|c| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Decode comma-separated text into a [`RawTable`]
///
/// - A leading byte-order mark is dropped.
/// - Inside quotes, `""` is a literal quote and a lone `"` closes the region.
/// - Outside quotes, `"` opens a quoted region, `,` ends the cell, and LF,
///   CRLF or a lone CR ends the row.
/// - A pending cell or row at end of input is flushed as the last row.
pub fn decode(text: &str) -> RawTable {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                QUOTE if chars.peek() == Some(&QUOTE) => {
                    cell.push(QUOTE);
                    chars.next();
                }
                QUOTE => in_quotes = false,
                _ => cell.push(c),
            }
            continue;
        }

        match c {
            QUOTE => in_quotes = true,
            DELIMITER => row.push(std::mem::take(&mut cell)),
            '\n' | '\r' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut cell));
                rows.push(std::mem::take(&mut row));
            }
            _ => cell.push(c),
        }
    }

    if !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        rows.push(row);
    }

    RawTable { rows }
}
