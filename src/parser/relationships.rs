//! Relationship parsing: package `.rels` parts and the workbook sheet list.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::error::{Result, XlsignError};
use crate::types::SheetState;
use crate::xml_helpers::{attr_string, attr_string_local, attr_u32};

/// One `<Relationship>` entry with its target resolved to a package path
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relationship {
    pub id: String,
    pub rel_type: String,
    /// Full path inside the package, e.g. "xl/media/image1.png"
    pub target: String,
    pub external: bool,
}

/// Sheet entry from xl/workbook.xml
#[derive(Debug, Clone)]
pub(super) struct SheetInfo {
    pub name: String,
    pub path: String,
    pub state: SheetState,
}

/// Sheet list plus the `activeTab` of the first workbook view, when present
#[derive(Debug, Default)]
pub(super) struct WorkbookInfo {
    pub sheets: Vec<SheetInfo>,
    pub active_tab: Option<usize>,
}

/// Construct the relationships part path for a package part
/// e.g., "xl/drawings/drawing1.xml" -> "xl/drawings/_rels/drawing1.xml.rels"
pub(crate) fn construct_rels_path(part_path: &str) -> String {
    match part_path.rsplit_once('/') {
        Some((dir, filename)) => format!("{dir}/_rels/{filename}.rels"),
        None => format!("_rels/{part_path}.rels"),
    }
}

/// Resolve a relative target against a base directory
///
/// Handles paths like "../media/image1.png" relative to "xl/drawings"
pub(crate) fn resolve_relative_path(base_dir: &str, relative: &str) -> String {
    if let Some(stripped) = relative.strip_prefix('/') {
        return stripped.to_string();
    }

    let mut components: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for part in relative.split('/') {
        match part {
            ".." => {
                components.pop();
            }
            "." | "" => {}
            _ => components.push(part),
        }
    }

    components.join("/")
}

/// Directory of a package part ("xl/worksheets/sheet1.xml" -> "xl/worksheets").
fn part_dir(part_path: &str) -> &str {
    part_path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Parse the `.rels` part belonging to `part_path`.
///
/// A missing relationships part is not an error: most parts have none.
pub(crate) fn read_part_relationships<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    part_path: &str,
) -> Vec<Relationship> {
    let part_path = part_path.trim_start_matches('/');
    let rels_path = construct_rels_path(part_path);

    let Ok(file) = archive.by_name(&rels_path) else {
        return Vec::new();
    };

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let base_dir = part_dir(part_path);
    let mut rels = Vec::new();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e) | Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let id = attr_string(e, b"Id").unwrap_or_default();
                    let target = attr_string(e, b"Target").unwrap_or_default();
                    let rel_type = attr_string(e, b"Type").unwrap_or_default();
                    let external = attr_string(e, b"TargetMode").as_deref() == Some("External");

                    if !id.is_empty() && !target.is_empty() {
                        let target = if external {
                            target
                        } else {
                            resolve_relative_path(base_dir, &target)
                        };
                        rels.push(Relationship {
                            id,
                            rel_type,
                            target,
                            external,
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("malformed relationships part {rels_path}: {e}");
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    rels
}

/// Map of rId -> worksheet path from xl/_rels/workbook.xml.rels
pub(super) fn worksheet_relationships<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> HashMap<String, String> {
    read_part_relationships(archive, "xl/workbook.xml")
        .into_iter()
        .filter(|rel| rel.rel_type.ends_with("/worksheet"))
        .map(|rel| (rel.id, rel.target))
        .collect()
}

/// Get sheet names, paths and states plus the active tab from xl/workbook.xml
pub(super) fn get_workbook_info<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    relationships: &HashMap<String, String>,
) -> Result<WorkbookInfo> {
    let file = archive
        .by_name("xl/workbook.xml")
        .map_err(|_| XlsignError::Parse("missing xl/workbook.xml".into()))?;

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut info = WorkbookInfo::default();
    let mut saw_view = false;
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e) => match e.local_name().as_ref() {
                b"workbookView" if !saw_view => {
                    saw_view = true;
                    info.active_tab =
                        attr_u32(e, b"activeTab").and_then(|t| usize::try_from(t).ok());
                }
                b"sheet" => {
                    let name = attr_string(e, b"name").unwrap_or_default();
                    let state = match attr_string(e, b"state").as_deref() {
                        Some("hidden") => SheetState::Hidden,
                        Some("veryHidden") => SheetState::VeryHidden,
                        _ => SheetState::Visible,
                    };
                    let r_id = attr_string_local(e, b"id").unwrap_or_default();

                    if !name.is_empty() {
                        // Fall back to the conventional part name when the rId is unresolved
                        let path = relationships.get(&r_id).cloned().unwrap_or_else(|| {
                            format!("xl/worksheets/sheet{}.xml", info.sheets.len() + 1)
                        });
                        info.sheets.push(SheetInfo { name, path, state });
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(info)
}
