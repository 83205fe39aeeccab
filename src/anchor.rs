//! Signature anchor rectangle.
//!
//! A signature image always spans one cell diagonal starting at the
//! active cell: in R1C1 terms the top-left corner is
//! `R(row+1)C(column+1)` and the bottom-right corner `R(row+2)C(column+2)`,
//! where `row`/`column` are the 0-indexed active cell. The size is fixed
//! and does not follow the image aspect ratio.

use serde::Serialize;

use crate::error::Result;
use crate::types::{ActiveCell, CellAddress, CellReferenceMode, Shape, Worksheet};

/// The two corner cells a signature image is pinned to
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnchorRect {
    pub top_left: CellAddress,
    pub bottom_right: CellAddress,
}

impl AnchorRect {
    /// Compute the rectangle for an active cell without consulting a sheet.
    #[must_use]
    pub fn from_active_cell(active: ActiveCell) -> Self {
        let top_left = active.address();
        Self {
            top_left,
            bottom_right: top_left.offset(1, 1),
        }
    }

    /// Compute the rectangle by asking the worksheet for both corner cells
    /// in R1C1 notation.
    ///
    /// # Errors
    /// Fails when a corner falls outside the grid (active cell in the last
    /// row or column).
    pub fn resolve(worksheet: &Worksheet, active: ActiveCell) -> Result<Self> {
        let row = u64::from(active.row);
        let col = u64::from(active.column);
        let top_left = worksheet.cell(
            &format!("R{}C{}", row + 1, col + 1),
            CellReferenceMode::R1C1,
        )?;
        let bottom_right = worksheet.cell(
            &format!("R{}C{}", row + 2, col + 2),
            CellReferenceMode::R1C1,
        )?;
        Ok(Self {
            top_left,
            bottom_right,
        })
    }

    #[must_use]
    pub fn top_left_r1c1(&self) -> String {
        self.top_left.to_r1c1()
    }

    #[must_use]
    pub fn bottom_right_r1c1(&self) -> String {
        self.bottom_right.to_r1c1()
    }

    /// Whether both corner cells of `shape` equal this rectangle.
    /// Cell offsets inside the corners are ignored.
    #[must_use]
    pub fn matches(&self, shape: &Shape) -> bool {
        shape.top_left_cell() == Some(self.top_left)
            && shape.bottom_right_cell() == Some(self.bottom_right)
    }
}
