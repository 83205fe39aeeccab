use serde::{Deserialize, Serialize};

use super::{ActiveCell, CellAddress, CellReferenceMode};
use crate::error::{Result, XlsignError};
use crate::shapes::ShapeCollection;

/// A loaded workbook: the document handle the viewer binds to
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workbook {
    pub worksheets: Vec<Worksheet>,
    /// Index of the worksheet shown in the viewer
    pub(crate) active_worksheet: usize,
}

impl Workbook {
    /// Build a workbook, falling back to the first sheet when
    /// `active_worksheet` is out of range.
    #[must_use]
    pub fn new(worksheets: Vec<Worksheet>, active_worksheet: usize) -> Self {
        let active_worksheet = if active_worksheet < worksheets.len() {
            active_worksheet
        } else {
            0
        };
        Self {
            worksheets,
            active_worksheet,
        }
    }

    #[must_use]
    pub fn active_worksheet_index(&self) -> usize {
        self.active_worksheet
    }

    #[must_use]
    pub fn active_worksheet(&self) -> Option<&Worksheet> {
        self.worksheets.get(self.active_worksheet)
    }

    pub fn active_worksheet_mut(&mut self) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(self.active_worksheet)
    }

    /// Switch the active worksheet. Returns `false` (and changes nothing)
    /// for an out-of-range index.
    pub fn set_active_worksheet(&mut self, index: usize) -> bool {
        if index < self.worksheets.len() {
            self.active_worksheet = index;
            true
        } else {
            false
        }
    }

    /// Resolve a cell reference on the active worksheet.
    ///
    /// # Errors
    /// Fails for malformed or out-of-grid references, or when the
    /// workbook has no worksheets.
    pub fn cell(&self, reference: &str, mode: CellReferenceMode) -> Result<CellAddress> {
        self.active_worksheet()
            .ok_or_else(|| XlsignError::Parse("workbook has no worksheets".into()))?
            .cell(reference, mode)
    }

    #[must_use]
    pub fn worksheet(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name == name)
    }

    #[must_use]
    pub fn sheet_names(&self) -> Vec<String> {
        self.worksheets.iter().map(|ws| ws.name.clone()).collect()
    }
}

/// Sheet visibility state
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SheetState {
    #[default]
    Visible,
    Hidden,
    VeryHidden,
}

/// A single worksheet with its overlay shapes
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Worksheet {
    pub name: String,
    pub state: SheetState,
    /// Used range from `<dimension ref>` as (start_row, start_col, end_row, end_col)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<(u32, u32, u32, u32)>,
    /// Active cell recorded in the sheet view (A1 when absent)
    pub active_cell: ActiveCell,
    /// Whether the sheet tab was selected when the file was saved
    pub tab_selected: bool,
    pub shapes: ShapeCollection,
}

impl Worksheet {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: SheetState::Visible,
            dimension: None,
            active_cell: ActiveCell::default(),
            tab_selected: false,
            shapes: ShapeCollection::new(),
        }
    }

    /// Resolve a textual cell reference on this sheet.
    ///
    /// # Errors
    /// Returns [`crate::error::XlsignError::CellRef`] for malformed or
    /// out-of-grid references.
    pub fn cell(&self, reference: &str, mode: CellReferenceMode) -> Result<CellAddress> {
        CellAddress::parse(reference, mode)
    }

    pub fn shapes(&self) -> &ShapeCollection {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut ShapeCollection {
        &mut self.shapes
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_active_worksheet_fallback() {
        let wb = Workbook::new(vec![Worksheet::new("A"), Worksheet::new("B")], 7);
        assert_eq!(wb.active_worksheet_index(), 0);

        let wb = Workbook::new(vec![Worksheet::new("A"), Worksheet::new("B")], 1);
        assert_eq!(wb.active_worksheet().map(|ws| ws.name.as_str()), Some("B"));
    }

    #[test]
    fn test_set_active_worksheet() {
        let mut wb = Workbook::new(vec![Worksheet::new("A"), Worksheet::new("B")], 0);
        assert!(wb.set_active_worksheet(1));
        assert!(!wb.set_active_worksheet(2));
        assert_eq!(wb.active_worksheet_index(), 1);
        assert!(wb.worksheet("B").is_some());
        assert_eq!(wb.sheet_names(), vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_worksheet_cell_lookup() {
        let ws = Worksheet::new("Sheet1");
        assert_eq!(
            ws.cell("R5C3", CellReferenceMode::R1C1).unwrap(),
            CellAddress::new(4, 2)
        );
        assert_eq!(
            ws.cell("C5", CellReferenceMode::A1).unwrap(),
            CellAddress::new(4, 2)
        );
        assert!(ws.cell("R1048577C1", CellReferenceMode::R1C1).is_err());

        let wb = Workbook::new(vec![ws], 0);
        assert_eq!(
            wb.cell("R6C4", CellReferenceMode::R1C1).unwrap(),
            CellAddress::new(5, 3)
        );
        assert!(Workbook::new(Vec::new(), 0)
            .cell("A1", CellReferenceMode::A1)
            .is_err());
    }
}
