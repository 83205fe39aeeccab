//! The signature viewer component.
//!
//! [`SignatureViewer`] composes the pieces the host page drives:
//! - a [`DocumentLoader`] that turns a URL into the displayed workbook
//! - a [`ViewerBinding`] holding that workbook and its active cell
//! - the confirmation [`SignatureDialog`] and the [`SignaturePad`] it clears
//!
//! On `wasm32` the same component is exported to JavaScript as `XlSignView`.

pub mod binding;
#[cfg(target_arch = "wasm32")]
mod web;

pub use binding::ViewerBinding;
#[cfg(target_arch = "wasm32")]
pub use web::XlSignView;

use crate::dialog::{DialogEffect, DialogEvent, DialogState, SignatureDialog};
use crate::engine::{WorkbookEngine, XlsxEngine};
use crate::error::Result;
use crate::loader::{DocumentLoader, LoadCompletion, LoadState, LoadTicket};
use crate::parser::LoadOptions;
use crate::shapes::ShapeCollection;
use crate::signature::{
    self, PadOptions, PlacementOutcome, SignaturePad, SignatureSource,
};
use crate::types::{ActiveCell, Workbook};

#[derive(Debug)]
pub struct SignatureViewer<E = XlsxEngine> {
    loader: DocumentLoader<E>,
    binding: ViewerBinding,
    dialog: SignatureDialog,
    pad: SignaturePad,
}

impl Default for SignatureViewer<XlsxEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureViewer<XlsxEngine> {
    /// A mounted viewer reading `.xlsx` documents with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_engine(XlsxEngine, LoadOptions::default(), PadOptions::default())
    }
}

impl<E: WorkbookEngine> SignatureViewer<E> {
    #[must_use]
    pub fn with_engine(engine: E, options: LoadOptions, pad: PadOptions) -> Self {
        Self {
            loader: DocumentLoader::with_options(engine, options),
            binding: ViewerBinding::new(),
            dialog: SignatureDialog::new(),
            pad: SignaturePad::new(pad),
        }
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Point the viewer at `url`. `None` if it is already the current URL.
    pub fn request_load(&mut self, url: &str) -> Option<LoadTicket> {
        self.loader.request(url)
    }

    pub fn complete_load(&mut self, ticket: &LoadTicket, fetched: Result<Vec<u8>>) -> LoadCompletion {
        self.loader.complete(ticket, fetched, &mut self.binding)
    }

    /// Fetch and load `url` on the calling thread.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_blocking(
        &mut self,
        url: &str,
        fetcher: &(impl crate::fetch::Fetch + ?Sized),
    ) -> Option<LoadCompletion> {
        self.loader.load_blocking(url, fetcher, &mut self.binding)
    }

    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        self.loader.state()
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loader.is_loaded()
    }

    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.loader.error()
    }

    // ------------------------------------------------------------------
    // Document & navigation
    // ------------------------------------------------------------------

    #[must_use]
    pub fn binding(&self) -> &ViewerBinding {
        &self.binding
    }

    #[must_use]
    pub fn document(&self) -> Option<&Workbook> {
        self.binding.document()
    }

    #[must_use]
    pub fn active_cell(&self) -> Option<ActiveCell> {
        self.binding.active_cell()
    }

    pub fn set_active_cell(&mut self, row: u32, column: u32) -> bool {
        self.binding.set_active_cell(row, column)
    }

    pub fn set_active_worksheet(&mut self, index: usize) -> bool {
        self.binding.set_active_worksheet(index)
    }

    /// Shapes of the active worksheet.
    #[must_use]
    pub fn shapes(&self) -> Option<&ShapeCollection> {
        self.binding.active_worksheet().map(|ws| &ws.shapes)
    }

    /// Shapes of the active worksheet as a JSON array (`[]` without a document).
    ///
    /// # Errors
    /// Only if serialization fails.
    pub fn shapes_json(&self) -> Result<String> {
        let json = match self.shapes() {
            Some(shapes) => serde_json::to_string(shapes),
            None => serde_json::to_string(&ShapeCollection::new()),
        };
        json.map_err(|e| crate::error::XlsignError::Other(e.to_string()))
    }

    /// Attach to a display surface. Remounting after [`Self::unmount`]
    /// starts from an empty load state so the host can load again.
    pub fn mount(&mut self) {
        if !self.binding.is_mounted() {
            self.loader.reset();
        }
        self.binding.mount();
    }

    /// Tear down the display surface. Pending loads still complete but
    /// no longer attach.
    pub fn unmount(&mut self) {
        self.binding.unmount();
    }

    // ------------------------------------------------------------------
    // Signature flow
    // ------------------------------------------------------------------

    #[must_use]
    pub fn dialog_state(&self) -> DialogState {
        self.dialog.state()
    }

    #[must_use]
    pub fn pad(&self) -> &SignaturePad {
        &self.pad
    }

    pub fn pad_mut(&mut self) -> &mut SignaturePad {
        &mut self.pad
    }

    /// Open the dialog. Returns `true` when it was closed and the pad was
    /// cleared; re-opening an open dialog keeps the drawing.
    pub fn open_signature_dialog(&mut self) -> bool {
        let reset = self.dialog.handle(DialogEvent::Open) == DialogEffect::ResetPad;
        if reset {
            self.pad.clear();
        }
        reset
    }

    pub fn cancel_signature_dialog(&mut self) {
        self.dialog.handle(DialogEvent::Cancel);
    }

    /// Close the dialog and place whatever was drawn on the pad.
    /// `None` if the dialog was not open.
    pub fn confirm_signature(&mut self) -> Option<PlacementOutcome> {
        match self.dialog.handle(DialogEvent::Confirm) {
            DialogEffect::PlaceSignature => {
                Some(signature::insert_signature(&mut self.binding, &self.pad))
            }
            DialogEffect::None | DialogEffect::ResetPad => None,
        }
    }

    /// Like [`Self::confirm_signature`] with a capture from elsewhere,
    /// e.g. a canvas the host draws on.
    pub fn confirm_signature_with(
        &mut self,
        source: &(impl SignatureSource + ?Sized),
    ) -> Option<PlacementOutcome> {
        match self.dialog.handle(DialogEvent::Confirm) {
            DialogEffect::PlaceSignature => {
                Some(signature::insert_signature(&mut self.binding, source))
            }
            DialogEffect::None | DialogEffect::ResetPad => None,
        }
    }

    pub fn clear_signature(&mut self) -> PlacementOutcome {
        signature::clear_signature(&mut self.binding)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::error::XlsignError;
    use crate::signature::SkipReason;
    use crate::types::Worksheet;

    fn stub(_bytes: &[u8], _options: &LoadOptions) -> Result<Workbook> {
        Ok(Workbook::new(vec![Worksheet::new("Sheet1")], 0))
    }

    fn loaded() -> SignatureViewer<fn(&[u8], &LoadOptions) -> Result<Workbook>> {
        let mut viewer = SignatureViewer::with_engine(
            stub as fn(&[u8], &LoadOptions) -> Result<Workbook>,
            LoadOptions::default(),
            PadOptions::default(),
        );
        let ticket = viewer.request_load("doc.xlsx").unwrap();
        assert_eq!(viewer.complete_load(&ticket, Ok(vec![])), LoadCompletion::Attached);
        viewer
    }

    fn draw(viewer: &mut SignatureViewer<impl WorkbookEngine>) {
        let pad = viewer.pad_mut();
        pad.begin_stroke(10.0, 10.0);
        pad.extend_stroke(50.0, 40.0);
        pad.end_stroke();
    }

    #[test]
    fn test_confirm_places_pad_drawing() {
        let mut viewer = loaded();
        viewer.set_active_cell(4, 2);
        viewer.open_signature_dialog();
        draw(&mut viewer);

        let outcome = viewer.confirm_signature().unwrap();
        let PlacementOutcome::Inserted { anchor, .. } = outcome else {
            panic!("expected insert, got {outcome:?}");
        };
        assert_eq!(anchor.top_left_r1c1(), "R5C3");
        assert_eq!(anchor.bottom_right_r1c1(), "R6C4");
        assert_eq!(viewer.dialog_state(), DialogState::Closed);
        assert_eq!(viewer.shapes().unwrap().count(), 1);
    }

    #[test]
    fn test_opening_resets_pad() {
        let mut viewer = loaded();
        viewer.open_signature_dialog();
        draw(&mut viewer);
        viewer.cancel_signature_dialog();
        assert!(!viewer.pad().is_empty());

        viewer.open_signature_dialog();
        assert!(viewer.pad().is_empty());
        assert_eq!(
            viewer.confirm_signature(),
            Some(PlacementOutcome::Skipped {
                reason: SkipReason::EmptyCapture
            })
        );
    }

    #[test]
    fn test_reopening_open_dialog_keeps_drawing() {
        let mut viewer = loaded();
        assert!(viewer.open_signature_dialog());
        draw(&mut viewer);

        assert!(!viewer.open_signature_dialog());
        assert!(!viewer.pad().is_empty());
        assert!(matches!(
            viewer.confirm_signature(),
            Some(PlacementOutcome::Inserted { .. })
        ));
    }

    #[test]
    fn test_confirm_while_closed_is_ignored() {
        let mut viewer = loaded();
        draw(&mut viewer);
        assert_eq!(viewer.confirm_signature(), None);
        assert!(viewer.shapes().unwrap().is_empty());
    }

    #[test]
    fn test_cancel_places_nothing() {
        let mut viewer = loaded();
        viewer.open_signature_dialog();
        draw(&mut viewer);
        viewer.cancel_signature_dialog();
        assert!(viewer.shapes().unwrap().is_empty());
    }

    #[test]
    fn test_clear_after_insert() {
        let mut viewer = loaded();
        viewer.open_signature_dialog();
        draw(&mut viewer);
        viewer.confirm_signature();

        assert!(matches!(viewer.clear_signature(), PlacementOutcome::Cleared { .. }));
        assert!(matches!(
            viewer.clear_signature(),
            PlacementOutcome::NothingToClear { .. }
        ));
    }

    #[test]
    fn test_shapes_json_without_document() {
        let viewer = SignatureViewer::new();
        assert_eq!(viewer.shapes_json().unwrap(), "[]");
    }

    #[test]
    fn test_failed_load_surfaces_message() {
        let mut viewer = SignatureViewer::new();
        let ticket = viewer.request_load("broken.xlsx").unwrap();
        viewer.complete_load(&ticket, Err(XlsignError::Fetch("HTTP error: 500".into())));
        assert!(viewer.is_loaded());
        assert!(viewer.load_error().unwrap().contains("500"));
        assert!(viewer.document().is_none());
    }

    #[test]
    fn test_unmounted_viewer_ignores_actions() {
        let mut viewer = loaded();
        viewer.unmount();
        viewer.open_signature_dialog();
        draw(&mut viewer);
        assert_eq!(
            viewer.confirm_signature(),
            Some(PlacementOutcome::Skipped {
                reason: SkipReason::Unmounted
            })
        );
        assert!(!viewer.set_active_cell(1, 1));
    }
}
