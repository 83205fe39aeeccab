//! Worksheet part scanning.
//!
//! Only the pieces the viewer binding needs are read: the used range, the
//! sheet view (tab selection and active cell) and the drawing reference.
//! Cell data is skipped without being decoded.

use quick_xml::events::Event;
use quick_xml::name::QName;
use quick_xml::Reader;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::cell_ref::{parse_cell_range, parse_cell_ref};
use crate::error::Result;
use crate::types::ActiveCell;
use crate::xml_helpers::{attr_bool, attr_string, attr_string_local};

/// What the worksheet XML says about its view and drawing
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(super) struct SheetScan {
    pub dimension: Option<(u32, u32, u32, u32)>,
    pub tab_selected: bool,
    pub active_cell: ActiveCell,
    /// rId of the `<drawing>` element, resolved through the sheet rels
    pub drawing_rel: Option<String>,
}

/// Scan a worksheet part in the archive. A missing part yields an empty scan.
pub(super) fn scan_sheet<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    sheet_path: &str,
) -> Result<SheetScan> {
    let Ok(file) = archive.by_name(sheet_path.trim_start_matches('/')) else {
        log::warn!("worksheet part {sheet_path} not found");
        return Ok(SheetScan::default());
    };
    scan_sheet_xml(BufReader::new(file))
}

pub(super) fn scan_sheet_xml<B: std::io::BufRead>(source: B) -> Result<SheetScan> {
    let mut xml = Reader::from_reader(source);
    xml.trim_text(true);

    let mut scan = SheetScan::default();
    let mut buf = Vec::new();
    let mut skip_buf = Vec::new();

    // Only the first sheetView counts; within it, prefer the selection of the active pane
    let mut view_index = 0usize;
    let mut in_sheet_view = false;
    let mut active_pane: Option<String> = None;
    let mut first_selection: Option<ActiveCell> = None;
    let mut pane_selection: Option<ActiveCell> = None;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) if e.local_name().as_ref() == b"sheetData" => {
                let name = e.name().as_ref().to_vec();
                xml.read_to_end_into(QName(&name), &mut skip_buf)?;
                skip_buf.clear();
            }
            Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                b"dimension" => {
                    scan.dimension = attr_string(e, b"ref").and_then(|r| parse_cell_range(&r));
                }
                b"sheetView" => {
                    view_index += 1;
                    in_sheet_view = view_index == 1;
                    if in_sheet_view {
                        scan.tab_selected = attr_bool(e, b"tabSelected").unwrap_or(false);
                    }
                }
                b"pane" if in_sheet_view => {
                    active_pane = attr_string(e, b"activePane");
                }
                b"selection" if in_sheet_view => {
                    if let Some((col, row)) =
                        attr_string(e, b"activeCell").and_then(|r| parse_cell_ref(&r))
                    {
                        let cell = ActiveCell::new(row, col);
                        if first_selection.is_none() {
                            first_selection = Some(cell);
                        }
                        if active_pane.is_some() && attr_string(e, b"pane") == active_pane {
                            pane_selection = Some(cell);
                        }
                    }
                }
                b"drawing" => {
                    scan.drawing_rel = attr_string_local(e, b"id");
                }
                _ => {}
            },
            Event::End(ref e) if e.local_name().as_ref() == b"sheetView" => {
                in_sheet_view = false;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    scan.active_cell = pane_selection.or(first_selection).unwrap_or_default();
    Ok(scan)
}
