//! Drawing part parsing: overlay shapes and their anchors.
//!
//! Drawings are stored in `xl/drawings/drawing*.xml`. Each sheet references
//! at most one drawing part via its `<drawing r:id>` element and the sheet's
//! `.rels` part. The drawing contains anchor elements:
//! - `twoCellAnchor`: both corners pinned to cells (signatures use this)
//! - `oneCellAnchor`: top-left pinned, size in EMUs
//! - `absoluteAnchor`: absolute position, not pinned to cells
//!
//! Each anchor holds one picture (`pic`), chart (`graphicFrame`), shape
//! (`sp`), connector (`cxnSp`) or group (`grpSp`). Pictures reference their
//! bytes through `r:embed`, resolved via the drawing's `.rels` part to
//! `xl/media/`.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Seek};
use zip::ZipArchive;

use crate::parser::relationships::read_part_relationships;
use crate::types::{AnchorKind, CellAddress, ImagePayload, Shape, ShapeAnchor, ShapeId, ShapeKind};
use crate::xml_helpers::{attr_i64, attr_string, attr_string_local, text_number};

/// A parsed anchor plus the relationship id of its picture, if any
#[derive(Debug, Clone)]
pub(crate) struct DrawingEntry {
    pub shape: Shape,
    pub image_rel: Option<String>,
}

/// Read every shape of a drawing part, attaching picture bytes when
/// `read_images` is set. Unreadable parts yield no shapes.
pub(crate) fn read_drawing_shapes<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    drawing_path: &str,
    read_images: bool,
) -> Vec<Shape> {
    let drawing_path = drawing_path.trim_start_matches('/');

    let image_rels: HashMap<String, String> = read_part_relationships(archive, drawing_path)
        .into_iter()
        .filter(|rel| !rel.external && rel.rel_type.ends_with("/image"))
        .map(|rel| (rel.id, rel.target))
        .collect();

    let entries = match archive.by_name(drawing_path) {
        Ok(file) => parse_drawing_xml(BufReader::new(file)),
        Err(e) => {
            log::warn!("drawing part {drawing_path} unreadable: {e}");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .map(|entry| {
            let mut shape = entry.shape;
            if read_images {
                shape.image = entry
                    .image_rel
                    .and_then(|rid| image_rels.get(&rid))
                    .and_then(|path| read_image(archive, path));
            }
            shape
        })
        .collect()
}

/// Read image bytes from the archive.
///
/// Returns `None` for missing or empty media parts.
pub(crate) fn read_image<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    image_path: &str,
) -> Option<ImagePayload> {
    let normalized_path = image_path.trim_start_matches('/');
    let mut file = archive.by_name(normalized_path).ok()?;

    let mut data = Vec::new();
    file.read_to_end(&mut data).ok()?;
    if data.is_empty() {
        return None;
    }

    let ext = normalized_path.rsplit_once('.').map(|(_, ext)| ext);
    Some(ImagePayload::from_bytes(&data, ext))
}

/// Parse drawing XML into shapes in document order.
///
/// Malformed XML ends parsing; anchors completed before the error are kept.
pub(crate) fn parse_drawing_xml<B: BufRead>(source: B) -> Vec<DrawingEntry> {
    let mut xml = Reader::from_reader(source);
    xml.trim_text(true);

    let mut entries = Vec::new();
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut current: Option<AnchorBuilder> = None;
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.local_name().as_ref().to_vec();
                open_element(&mut current, e, &name, stack.len());
                stack.push(name);
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.local_name().as_ref().to_vec();
                open_element(&mut current, e, &name, stack.len());
                if is_anchor(&name) {
                    finish_anchor(&mut current, &mut entries);
                }
            }
            Ok(Event::Text(ref t)) => {
                if let Some(builder) = current.as_mut() {
                    let mut names = stack.iter().rev();
                    if let (Some(leaf), Some(parent)) = (names.next(), names.next()) {
                        builder.set_marker_value(parent, leaf, t);
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                stack.pop();
                if is_anchor(e.local_name().as_ref()) {
                    finish_anchor(&mut current, &mut entries);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("malformed drawing XML: {e}");
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    entries
}

fn is_anchor(local_name: &[u8]) -> bool {
    matches!(
        local_name,
        b"twoCellAnchor" | b"oneCellAnchor" | b"absoluteAnchor"
    )
}

fn open_element(current: &mut Option<AnchorBuilder>, e: &BytesStart, name: &[u8], depth: usize) {
    let anchor_kind = match name {
        b"twoCellAnchor" => Some(AnchorKind::TwoCell),
        b"oneCellAnchor" => Some(AnchorKind::OneCell),
        b"absoluteAnchor" => Some(AnchorKind::Absolute),
        _ => None,
    };
    if let Some(kind) = anchor_kind {
        let mut builder = AnchorBuilder::new(kind, depth);
        builder.edit_as = attr_string(e, b"editAs");
        *current = Some(builder);
        return;
    }

    let Some(builder) = current.as_mut() else {
        return;
    };
    let direct_child = depth == builder.depth + 1;
    // anchor > pic|sp|grpSp|... > nv*Pr > cNvPr
    let own_properties = depth == builder.depth + 3;

    match name {
        b"pic" | b"graphicFrame" | b"sp" | b"cxnSp" | b"grpSp" if direct_child => {
            builder.shape_kind = Some(match name {
                b"pic" => ShapeKind::Picture,
                b"graphicFrame" => ShapeKind::Chart,
                b"cxnSp" => ShapeKind::Connector,
                b"grpSp" => ShapeKind::Group,
                _ => ShapeKind::Shape,
            });
        }
        b"ext" if direct_child => {
            builder.extent = Some((
                attr_i64(e, b"cx").unwrap_or(0),
                attr_i64(e, b"cy").unwrap_or(0),
            ));
        }
        b"cNvPr" if own_properties => {
            builder.name = attr_string(e, b"name");
            builder.description = attr_string(e, b"descr");
        }
        b"blip" if builder.image_rel.is_none() => {
            builder.image_rel = attr_string_local(e, b"embed");
        }
        _ => {}
    }
}

fn finish_anchor(current: &mut Option<AnchorBuilder>, entries: &mut Vec<DrawingEntry>) {
    if let Some(builder) = current.take() {
        match builder.build() {
            Some(entry) => entries.push(entry),
            None => log::debug!("skipping incomplete drawing anchor"),
        }
    }
}

/// Column/row marker (`xdr:from` / `xdr:to`) collected from element text
#[derive(Debug, Default)]
struct MarkerBuilder {
    col: Option<u32>,
    row: Option<u32>,
    col_off: i64,
    row_off: i64,
}

impl MarkerBuilder {
    fn cell(&self) -> Option<CellAddress> {
        Some(CellAddress::new(self.row?, self.col?))
    }
}

/// Builder for one anchor element
#[derive(Debug)]
struct AnchorBuilder {
    kind: AnchorKind,
    depth: usize,
    shape_kind: Option<ShapeKind>,
    from: MarkerBuilder,
    to: MarkerBuilder,
    extent: Option<(i64, i64)>,
    edit_as: Option<String>,
    name: Option<String>,
    description: Option<String>,
    image_rel: Option<String>,
}

impl AnchorBuilder {
    fn new(kind: AnchorKind, depth: usize) -> Self {
        Self {
            kind,
            depth,
            shape_kind: None,
            from: MarkerBuilder::default(),
            to: MarkerBuilder::default(),
            extent: None,
            edit_as: None,
            name: None,
            description: None,
            image_rel: None,
        }
    }

    fn set_marker_value(&mut self, parent: &[u8], leaf: &[u8], text: &[u8]) {
        let marker = match parent {
            b"from" => &mut self.from,
            b"to" => &mut self.to,
            _ => return,
        };
        match leaf {
            b"col" => marker.col = text_number(text),
            b"row" => marker.row = text_number(text),
            b"colOff" => marker.col_off = text_number(text).unwrap_or(0),
            b"rowOff" => marker.row_off = text_number(text).unwrap_or(0),
            _ => {}
        }
    }

    fn build(self) -> Option<DrawingEntry> {
        let shape_kind = self.shape_kind?;
        let from = self.from.cell();
        let to = self.to.cell();

        match self.kind {
            AnchorKind::TwoCell if from.is_none() || to.is_none() => return None,
            AnchorKind::OneCell if from.is_none() => return None,
            _ => {}
        }

        let image_rel = match shape_kind {
            ShapeKind::Picture => self.image_rel,
            _ => None,
        };

        Some(DrawingEntry {
            shape: Shape {
                id: ShapeId(0),
                kind: shape_kind,
                anchor: ShapeAnchor {
                    kind: self.kind,
                    from,
                    to: if self.kind == AnchorKind::TwoCell { to } else { None },
                    from_offset: (self.from.col_off, self.from.row_off),
                    to_offset: (self.to.col_off, self.to.row_off),
                    extent: self.extent,
                    edit_as: self.edit_as,
                },
                name: self.name,
                description: self.description,
                image: None,
            },
            image_rel,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Vec<DrawingEntry> {
        parse_drawing_xml(xml.as_bytes())
    }

    const TWO_CELL_PICTURE: &str = r#"<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<xdr:twoCellAnchor editAs="oneCell">
<xdr:from><xdr:col>2</xdr:col><xdr:colOff>9525</xdr:colOff><xdr:row>4</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>
<xdr:to><xdr:col>3</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>5</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:to>
<xdr:pic>
<xdr:nvPicPr><xdr:cNvPr id="2" name="Signature 1" descr="signed"/><xdr:cNvPicPr/></xdr:nvPicPr>
<xdr:blipFill><a:blip r:embed="rId1"/></xdr:blipFill>
<xdr:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="1" cy="1"/></a:xfrm></xdr:spPr>
</xdr:pic>
<xdr:clientData/>
</xdr:twoCellAnchor>
</xdr:wsDr>"#;

    #[test]
    fn test_two_cell_picture() {
        let entries = parse(TWO_CELL_PICTURE);
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        let shape = &entry.shape;
        assert_eq!(shape.kind, ShapeKind::Picture);
        assert_eq!(shape.anchor.kind, AnchorKind::TwoCell);
        assert_eq!(shape.top_left_cell(), Some(CellAddress::new(4, 2)));
        assert_eq!(shape.bottom_right_cell(), Some(CellAddress::new(5, 3)));
        assert_eq!(shape.anchor.from_offset, (9525, 0));
        assert_eq!(shape.anchor.edit_as.as_deref(), Some("oneCell"));
        assert_eq!(shape.name.as_deref(), Some("Signature 1"));
        assert_eq!(shape.description.as_deref(), Some("signed"));
        // a:ext inside the transform is not the anchor extent
        assert_eq!(shape.anchor.extent, None);
        assert_eq!(entry.image_rel.as_deref(), Some("rId1"));
    }

    #[test]
    fn test_one_cell_and_absolute_anchors() {
        let entries = parse(
            r#"<wsDr>
<oneCellAnchor><from><col>1</col><colOff>0</colOff><row>1</row><rowOff>0</rowOff></from><ext cx="914400" cy="457200"/>
<sp><nvSpPr><cNvPr id="3" name="Box"/></nvSpPr></sp><clientData/></oneCellAnchor>
<absoluteAnchor><pos x="0" y="0"/><ext cx="100" cy="200"/>
<graphicFrame><nvGraphicFramePr><cNvPr id="4" name="Chart 1"/></nvGraphicFramePr></graphicFrame><clientData/></absoluteAnchor>
</wsDr>"#,
        );
        assert_eq!(entries.len(), 2);

        let one = &entries[0].shape;
        assert_eq!(one.kind, ShapeKind::Shape);
        assert_eq!(one.anchor.kind, AnchorKind::OneCell);
        assert_eq!(one.anchor.extent, Some((914_400, 457_200)));
        assert_eq!(one.bottom_right_cell(), None);

        let abs = &entries[1].shape;
        assert_eq!(abs.kind, ShapeKind::Chart);
        assert_eq!(abs.anchor.from, None);
        assert_eq!(abs.name.as_deref(), Some("Chart 1"));
    }

    #[test]
    fn test_group_takes_group_name() {
        let entries = parse(
            r#"<wsDr><twoCellAnchor>
<from><col>0</col><row>0</row></from><to><col>4</col><row>4</row></to>
<grpSp><nvGrpSpPr><cNvPr id="5" name="Group 1"/></nvGrpSpPr>
<sp><nvSpPr><cNvPr id="6" name="Inner"/></nvSpPr></sp>
<pic><nvPicPr><cNvPr id="7" name="Inner pic"/></nvPicPr><blipFill><blip embed="rId2"/></blipFill></pic>
</grpSp><clientData/></twoCellAnchor></wsDr>"#,
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].shape.kind, ShapeKind::Group);
        assert_eq!(entries[0].shape.name.as_deref(), Some("Group 1"));
        assert!(entries[0].image_rel.is_none());
    }

    #[test]
    fn test_unnamed_group_ignores_member_names() {
        let entries = parse(
            r#"<wsDr><twoCellAnchor>
<from><col>0</col><row>0</row></from><to><col>2</col><row>2</row></to>
<grpSp><nvGrpSpPr><cNvPr id="5"/></nvGrpSpPr>
<sp><nvSpPr><cNvPr id="6" name="Inner" descr="member"/></nvSpPr></sp>
</grpSp><clientData/></twoCellAnchor></wsDr>"#,
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].shape.kind, ShapeKind::Group);
        assert_eq!(entries[0].shape.name, None);
        assert_eq!(entries[0].shape.description, None);
    }

    #[test]
    fn test_incomplete_anchor_skipped() {
        let entries = parse(
            r#"<wsDr>
<twoCellAnchor><from><col>0</col><row>0</row></from><pic/><clientData/></twoCellAnchor>
<twoCellAnchor><from><col>0</col><row>0</row></from><to><col>1</col><row>1</row></to><clientData/></twoCellAnchor>
</wsDr>"#,
        );
        assert!(entries.is_empty());
    }

    #[test]
    fn test_truncated_xml_keeps_completed_anchors() {
        let mut xml = TWO_CELL_PICTURE.replace("</xdr:wsDr>", "");
        xml.push_str("<xdr:twoCellAnchor><xdr:from><xdr:col>");
        let entries = parse(&xml);
        assert_eq!(entries.len(), 1);
    }
}
