//! xlsign - spreadsheet viewer with signature overlays
//!
//! Loads an `.xlsx` workbook from a URL and lets the user sign it:
//! - Workbook structure, sheet views and DrawingML shapes from the ZIP package
//! - Active cell tracking per worksheet
//! - A drawn signature pinned as a picture to the anchor of the active cell,
//!   replacing whatever was already pinned there
//! - Stale loads discarded by generation
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { XlSignView } from 'xlsign';
//! await init();
//! const view = new XlSignView();
//! await view.loadUrl('/files/contract.xlsx');
//! view.setActiveCell(4, 2);
//! view.openSignatureDialog();
//! // ... padBeginStroke / padExtendStroke / padEndStroke ...
//! view.confirmSignature();
//! ```
//!
//! # Usage (Rust)
//!
//! ```no_run
//! use xlsign::{HttpFetcher, SignatureViewer};
//!
//! # fn main() -> xlsign::error::Result<()> {
//! let mut viewer = SignatureViewer::new();
//! viewer.load_blocking("contract.xlsx", &HttpFetcher::new()?);
//! viewer.set_active_cell(4, 2);
//! viewer.open_signature_dialog();
//! viewer.pad_mut().begin_stroke(10.0, 10.0);
//! viewer.pad_mut().extend_stroke(80.0, 30.0);
//! viewer.pad_mut().end_stroke();
//! let outcome = viewer.confirm_signature();
//! # let _ = outcome;
//! # Ok(())
//! # }
//! ```

// Package reading
pub mod cell_ref;
pub mod drawings;
pub mod error;
pub mod parser;
pub mod types;
pub mod xml_helpers;

// Signing
pub mod anchor;
pub mod dialog;
pub mod engine;
pub mod fetch;
pub mod loader;
pub mod shapes;
pub mod signature;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use anchor::AnchorRect;
pub use dialog::{DialogEffect, DialogEvent, DialogState, SignatureDialog};
pub use engine::{WorkbookEngine, XlsxEngine};
#[cfg(not(target_arch = "wasm32"))]
pub use fetch::{Fetch, HttpFetcher};
pub use loader::{DocumentLoader, LoadCompletion, LoadState, LoadTicket};
pub use parser::LoadOptions;
pub use shapes::ShapeCollection;
pub use signature::{
    clear_signature, insert_signature, PadOptions, PlacementOutcome, SignaturePad,
    SignatureSource, SkipReason,
};
pub use viewer::{SignatureViewer, ViewerBinding};
#[cfg(target_arch = "wasm32")]
pub use viewer::XlSignView;

pub use types::*;

/// Install the panic hook and console logger when the module loads.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

/// Parse an XLSX file and return its worksheets and shapes as JSON
///
/// # Errors
/// Returns an error if the XLSX file is invalid or cannot be parsed.
#[wasm_bindgen]
pub fn parse_xlsx(data: &[u8]) -> Result<String, JsValue> {
    let workbook = parser::parse(data).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&workbook)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Parse an XLSX file and return the workbook as a `JsValue`
///
/// # Errors
/// Returns an error if the XLSX file is invalid or cannot be parsed.
#[wasm_bindgen]
pub fn parse_xlsx_to_js(data: &[u8]) -> Result<JsValue, JsValue> {
    let workbook = parser::parse(data).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&workbook)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
