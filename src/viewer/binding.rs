//! The viewer's handle on the displayed document.
//!
//! A binding is either mounted (a display surface exists) or not. Every
//! operation checks presence first; actions against an unmounted binding
//! or one without a document do nothing.

use crate::types::{ActiveCell, Workbook, Worksheet};

#[derive(Debug)]
pub struct ViewerBinding {
    mounted: bool,
    document: Option<Workbook>,
}

impl Default for ViewerBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewerBinding {
    /// A mounted binding with no document.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mounted: true,
            document: None,
        }
    }

    #[must_use]
    pub fn unmounted() -> Self {
        Self {
            mounted: false,
            document: None,
        }
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn mount(&mut self) {
        self.mounted = true;
    }

    /// Detach from the display surface, dropping the document.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.document = None;
    }

    /// Show `workbook`, replacing any current document. Returns `false`
    /// and drops the workbook when unmounted.
    pub fn attach(&mut self, workbook: Workbook) -> bool {
        if !self.mounted {
            return false;
        }
        self.document = Some(workbook);
        true
    }

    /// Take the current document off the surface.
    pub fn detach(&mut self) -> Option<Workbook> {
        self.document.take()
    }

    #[must_use]
    pub fn document(&self) -> Option<&Workbook> {
        self.document.as_ref().filter(|_| self.mounted)
    }

    pub fn document_mut(&mut self) -> Option<&mut Workbook> {
        if !self.mounted {
            return None;
        }
        self.document.as_mut()
    }

    #[must_use]
    pub fn active_worksheet(&self) -> Option<&Worksheet> {
        self.document()?.active_worksheet()
    }

    pub fn active_worksheet_mut(&mut self) -> Option<&mut Worksheet> {
        self.document_mut()?.active_worksheet_mut()
    }

    /// Active cell of the active worksheet.
    #[must_use]
    pub fn active_cell(&self) -> Option<ActiveCell> {
        self.active_worksheet().map(|ws| ws.active_cell)
    }

    /// Move the active cell (clamped into the grid). Returns `false` when
    /// there is nothing to navigate.
    pub fn set_active_cell(&mut self, row: u32, column: u32) -> bool {
        match self.active_worksheet_mut() {
            Some(ws) => {
                ws.active_cell = ActiveCell::new(row, column);
                true
            }
            None => false,
        }
    }

    pub fn set_active_worksheet(&mut self, index: usize) -> bool {
        self.document_mut()
            .is_some_and(|wb| wb.set_active_worksheet(index))
    }
}
