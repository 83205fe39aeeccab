//! JavaScript facade over [`SignatureViewer`].
//!
//! State lives in an `Rc<RefCell<_>>` shared between the exported handle
//! and any in-flight fetch future, so a load that resolves after the page
//! moved on simply finds a newer ticket and is discarded.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use super::SignatureViewer;
use crate::engine::XlsxEngine;
use crate::fetch::fetch_bytes;
use crate::parser::LoadOptions;
use crate::signature::{PadOptions, PlacementOutcome};

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn from_js<T: serde::de::DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// The viewer exported to JavaScript
#[wasm_bindgen]
pub struct XlSignView {
    state: Rc<RefCell<SignatureViewer>>,
    canvas: Option<HtmlCanvasElement>,
}

#[wasm_bindgen]
impl XlSignView {
    /// `loadOptions` and `padOptions` are optional plain objects, e.g.
    /// `{ readImages: false }` and `{ penColor: "blue", width: 400 }`.
    #[wasm_bindgen(constructor)]
    pub fn new(load_options: JsValue, pad_options: JsValue) -> Result<XlSignView, JsValue> {
        let load: LoadOptions = from_js(load_options)?;
        let pad: PadOptions = from_js(pad_options)?;
        Ok(Self {
            state: Rc::new(RefCell::new(SignatureViewer::with_engine(
                XlsxEngine, load, pad,
            ))),
            canvas: None,
        })
    }

    /// Fetch and show the workbook at `url`. The promise resolves to
    /// `"attached"`, `"detached"`, `"failed"`, `"stale"` or `"unchanged"`
    /// when `url` is already current.
    #[wasm_bindgen(js_name = "loadUrl")]
    pub fn load_url(&self, url: String) -> js_sys::Promise {
        let ticket = self.state.borrow_mut().request_load(&url);
        let state = Rc::clone(&self.state);

        wasm_bindgen_futures::future_to_promise(async move {
            let Some(ticket) = ticket else {
                return Ok(JsValue::from_str("unchanged"));
            };
            let fetched = fetch_bytes(ticket.url()).await;
            let completion = state.borrow_mut().complete_load(&ticket, fetched);
            Ok(JsValue::from_str(completion.as_str()))
        })
    }

    #[wasm_bindgen(js_name = "isLoaded")]
    pub fn is_loaded(&self) -> bool {
        self.state.borrow().is_loaded()
    }

    /// The load failure message, if any.
    #[wasm_bindgen(js_name = "loadError")]
    pub fn load_error(&self) -> Option<String> {
        self.state.borrow().load_error().map(str::to_string)
    }

    #[wasm_bindgen(js_name = "sheetNames")]
    pub fn sheet_names(&self) -> Vec<String> {
        self.state
            .borrow()
            .document()
            .map(|wb| wb.sheet_names())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = "setActiveWorksheet")]
    pub fn set_active_worksheet(&self, index: usize) -> bool {
        self.state.borrow_mut().set_active_worksheet(index)
    }

    #[wasm_bindgen(js_name = "setActiveCell")]
    pub fn set_active_cell(&self, row: u32, column: u32) -> bool {
        self.state.borrow_mut().set_active_cell(row, column)
    }

    /// `[row, column]`, 0-based.
    #[wasm_bindgen(js_name = "activeCell")]
    pub fn active_cell(&self) -> Option<Vec<u32>> {
        self.state
            .borrow()
            .active_cell()
            .map(|cell| vec![cell.row, cell.column])
    }

    /// Use a page canvas as the signature source instead of the built-in pad.
    #[wasm_bindgen(js_name = "setSignatureCanvas")]
    pub fn set_signature_canvas(&mut self, canvas: Option<HtmlCanvasElement>) {
        self.canvas = canvas;
    }

    #[wasm_bindgen(js_name = "padBeginStroke")]
    pub fn pad_begin_stroke(&self, x: f64, y: f64) {
        self.state.borrow_mut().pad_mut().begin_stroke(x, y);
    }

    #[wasm_bindgen(js_name = "padExtendStroke")]
    pub fn pad_extend_stroke(&self, x: f64, y: f64) {
        self.state.borrow_mut().pad_mut().extend_stroke(x, y);
    }

    #[wasm_bindgen(js_name = "padEndStroke")]
    pub fn pad_end_stroke(&self) {
        self.state.borrow_mut().pad_mut().end_stroke();
    }

    #[wasm_bindgen(js_name = "padClear")]
    pub fn pad_clear(&self) {
        self.state.borrow_mut().pad_mut().clear();
    }

    /// Current pad drawing as SVG markup.
    #[wasm_bindgen(js_name = "padSvg")]
    pub fn pad_svg(&self) -> String {
        self.state.borrow().pad().to_svg()
    }

    #[wasm_bindgen(js_name = "isSignatureDialogOpen")]
    pub fn is_signature_dialog_open(&self) -> bool {
        self.state.borrow().dialog_state() == crate::dialog::DialogState::Open
    }

    #[wasm_bindgen(js_name = "openSignatureDialog")]
    pub fn open_signature_dialog(&self) {
        let reset = self.state.borrow_mut().open_signature_dialog();
        if let (true, Some(canvas)) = (reset, &self.canvas) {
            clear_canvas(canvas);
        }
    }

    #[wasm_bindgen(js_name = "cancelSignatureDialog")]
    pub fn cancel_signature_dialog(&self) {
        self.state.borrow_mut().cancel_signature_dialog();
    }

    /// Close the dialog and place the signature. Resolves to the placement
    /// outcome object, or `undefined` if the dialog was not open.
    #[wasm_bindgen(js_name = "confirmSignature")]
    pub fn confirm_signature(&self) -> Result<JsValue, JsValue> {
        let mut state = self.state.borrow_mut();
        let outcome: Option<PlacementOutcome> = match &self.canvas {
            Some(canvas) => state.confirm_signature_with(canvas),
            None => state.confirm_signature(),
        };
        match outcome {
            Some(outcome) => to_js(&outcome),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    #[wasm_bindgen(js_name = "clearSignature")]
    pub fn clear_signature(&self) -> Result<JsValue, JsValue> {
        let outcome = self.state.borrow_mut().clear_signature();
        to_js(&outcome)
    }

    /// Shapes of the active worksheet.
    pub fn shapes(&self) -> Result<JsValue, JsValue> {
        let state = self.state.borrow();
        match state.shapes() {
            Some(shapes) => to_js(shapes),
            None => Ok(js_sys::Array::new().into()),
        }
    }

    #[wasm_bindgen(js_name = "shapesJson")]
    pub fn shapes_json(&self) -> Result<String, JsValue> {
        Ok(self.state.borrow().shapes_json()?)
    }

    /// Reattach after [`Self::unmount`]; the next `loadUrl` starts over.
    pub fn mount(&self) {
        self.state.borrow_mut().mount();
    }

    /// Detach from the page. In-flight loads still settle but attach nothing.
    pub fn unmount(&mut self) {
        self.state.borrow_mut().unmount();
        self.canvas = None;
    }
}

fn clear_canvas(canvas: &HtmlCanvasElement) {
    // Resizing resets the bitmap to transparent.
    let width = canvas.width();
    canvas.set_width(width);
}
