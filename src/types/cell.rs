use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cell_ref::{
    format_a1, format_r1c1, in_bounds, parse_cell_ref, parse_r1c1, MAX_COLS, MAX_ROWS,
};
use crate::error::{Result, XlsignError};

/// Addressing mode for textual cell references.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub enum CellReferenceMode {
    /// Column letters + row number ("C5")
    #[default]
    A1,
    /// Row and column numbers ("R5C3")
    R1C1,
}

/// A cell position inside a worksheet (0-indexed)
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellAddress {
    pub row: u32,
    pub col: u32,
}

impl CellAddress {
    #[must_use]
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Resolve a textual reference in the given mode.
    ///
    /// # Errors
    /// Returns [`XlsignError::CellRef`] for malformed or out-of-grid references.
    pub fn parse(reference: &str, mode: CellReferenceMode) -> Result<Self> {
        let parsed = match mode {
            CellReferenceMode::A1 => parse_cell_ref(reference),
            CellReferenceMode::R1C1 => parse_r1c1(reference),
        };
        let (col, row) = parsed.ok_or_else(|| XlsignError::CellRef(reference.to_string()))?;
        if !in_bounds(row, col) {
            return Err(XlsignError::CellRef(reference.to_string()));
        }
        Ok(Self { row, col })
    }

    /// # Errors
    /// See [`Self::parse`].
    pub fn parse_r1c1(reference: &str) -> Result<Self> {
        Self::parse(reference, CellReferenceMode::R1C1)
    }

    /// # Errors
    /// See [`Self::parse`].
    pub fn parse_a1(reference: &str) -> Result<Self> {
        Self::parse(reference, CellReferenceMode::A1)
    }

    /// R1C1 form, e.g. "R5C3" for (4, 2).
    #[must_use]
    pub fn to_r1c1(&self) -> String {
        format_r1c1(self.row, self.col)
    }

    /// A1 form, e.g. "C5" for (4, 2).
    #[must_use]
    pub fn to_a1(&self) -> String {
        format_a1(self.row, self.col)
    }

    /// The cell `rows` down and `cols` right of this one.
    #[must_use]
    pub fn offset(&self, rows: u32, cols: u32) -> Self {
        Self {
            row: self.row.saturating_add(rows),
            col: self.col.saturating_add(cols),
        }
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

/// The focused cell of the viewer (0-indexed row/column).
///
/// Positions are clamped into the worksheet grid, the way keyboard
/// navigation stops at the last row and column.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveCell {
    pub row: u32,
    pub column: u32,
}

impl ActiveCell {
    #[must_use]
    pub fn new(row: u32, column: u32) -> Self {
        Self {
            row: row.min(MAX_ROWS - 1),
            column: column.min(MAX_COLS - 1),
        }
    }

    #[must_use]
    pub fn address(&self) -> CellAddress {
        CellAddress::new(self.row, self.column)
    }
}

impl From<CellAddress> for ActiveCell {
    fn from(address: CellAddress) -> Self {
        Self::new(address.row, address.col)
    }
}
