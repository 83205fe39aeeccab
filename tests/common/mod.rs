//! Shared helpers for the integration tests.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

pub use super::fixtures::*;

use xlsign::error::Result;
use xlsign::{
    AnchorRect, LoadCompletion, LoadOptions, ShapeCollection, SignatureViewer, Workbook,
    WorkbookEngine, XlsxEngine,
};

/// A viewer showing `bytes`, loaded through the real XLSX engine.
pub fn viewer_with(bytes: Vec<u8>) -> SignatureViewer {
    let mut viewer = SignatureViewer::new();
    let ticket = viewer.request_load("memory://fixture.xlsx").unwrap();
    assert_eq!(viewer.complete_load(&ticket, Ok(bytes)), LoadCompletion::Attached);
    viewer
}

pub fn parse(bytes: &[u8]) -> Workbook {
    XlsxEngine.load(bytes, &LoadOptions::default()).unwrap()
}

/// Draw a short diagonal on the viewer's pad.
pub fn scribble<E: WorkbookEngine>(viewer: &mut SignatureViewer<E>) {
    let pad = viewer.pad_mut();
    pad.begin_stroke(20.0, 150.0);
    pad.extend_stroke(120.0, 60.0);
    pad.extend_stroke(260.0, 140.0);
    pad.end_stroke();
}

/// Shapes pinned exactly to `anchor`.
pub fn shapes_at(shapes: &ShapeCollection, anchor: &AnchorRect) -> usize {
    shapes.iter().filter(|s| anchor.matches(s)).count()
}

pub fn shape_names(shapes: &ShapeCollection) -> Vec<String> {
    shapes
        .iter()
        .map(|s| s.name.clone().unwrap_or_default())
        .collect()
}

pub fn never_fetched(_url: &str) -> Result<Vec<u8>> {
    panic!("fetch should not run")
}
