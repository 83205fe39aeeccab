//! Main XLSX parser
//!
//! Orchestrates reading the workbook structure, sheet views and drawings
//! from the ZIP package.

pub(crate) mod relationships;
mod worksheet;

use serde::{Deserialize, Serialize};
use std::io::Cursor;
use zip::ZipArchive;

use crate::drawings::read_drawing_shapes;
use crate::error::{Result, XlsignError};
use crate::types::{SheetState, Workbook, Worksheet};

use relationships::{get_workbook_info, read_part_relationships, worksheet_relationships};
use worksheet::scan_sheet;

/// Options controlling how a workbook is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadOptions {
    /// Read picture bytes from `xl/media/` and attach them to shapes
    pub read_images: bool,
    /// Keep hidden and very hidden sheets in the worksheet list
    pub include_hidden_sheets: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            read_images: true,
            include_hidden_sheets: true,
        }
    }
}

/// Parse an XLSX file with default options.
///
/// # Errors
/// Fails if the data is not a ZIP package, has no `xl/workbook.xml`,
/// contains malformed workbook/worksheet XML, or has no worksheets.
pub fn parse(data: &[u8]) -> Result<Workbook> {
    parse_with_options(data, &LoadOptions::default())
}

/// Parse an XLSX file.
///
/// # Errors
/// See [`parse`].
pub fn parse_with_options(data: &[u8], options: &LoadOptions) -> Result<Workbook> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    let sheet_rels = worksheet_relationships(&mut archive);
    let info = get_workbook_info(&mut archive, &sheet_rels)?;

    let mut worksheets = Vec::with_capacity(info.sheets.len());
    let mut active_index = None;
    let mut first_tab_selected = None;

    for (tab, sheet_info) in info.sheets.iter().enumerate() {
        if !options.include_hidden_sheets && sheet_info.state != SheetState::Visible {
            continue;
        }

        let scan = scan_sheet(&mut archive, &sheet_info.path)?;

        let mut ws = Worksheet::new(sheet_info.name.clone());
        ws.state = sheet_info.state;
        ws.dimension = scan.dimension;
        ws.active_cell = scan.active_cell;
        ws.tab_selected = scan.tab_selected;

        if let Some(drawing_rel) = scan.drawing_rel.as_deref() {
            let drawing_path = read_part_relationships(&mut archive, &sheet_info.path)
                .into_iter()
                .find(|rel| rel.id == drawing_rel && !rel.external)
                .map(|rel| rel.target);
            match drawing_path {
                Some(path) => {
                    for shape in read_drawing_shapes(&mut archive, &path, options.read_images) {
                        ws.shapes.add(shape);
                    }
                }
                None => log::warn!(
                    "sheet {:?} references drawing {drawing_rel} with no relationship",
                    sheet_info.name
                ),
            }
        }

        if info.active_tab == Some(tab) {
            active_index = Some(worksheets.len());
        }
        if ws.tab_selected && first_tab_selected.is_none() {
            first_tab_selected = Some(worksheets.len());
        }
        worksheets.push(ws);
    }

    if worksheets.is_empty() {
        return Err(XlsignError::Parse("workbook has no worksheets".into()));
    }

    let active = active_index.or(first_tab_selected).unwrap_or(0);
    log::debug!(
        "parsed workbook: {} worksheet(s), active {:?}",
        worksheets.len(),
        worksheets.get(active).map(|ws| ws.name.as_str())
    );

    Ok(Workbook::new(worksheets, active))
}
