//! In-memory XLSX builders for integration tests.
//!
//! Produces the smallest package the parser accepts: content types,
//! package and workbook relationships, `xl/workbook.xml`, one worksheet
//! part per sheet and, for sheets with shapes, a drawing part plus media.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::fmt::Write as _;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

/// PNG signature plus an empty IHDR-sized tail; enough for format sniffing.
pub const PNG_BYTES: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13, b'I', b'H', b'D', b'R',
];

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_XDR: &str = "http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

/// A shape placed on a sheet's drawing. Cells are 0-based (row, col).
#[derive(Debug, Clone)]
pub enum DrawingShape {
    Picture {
        from: (u32, u32),
        to: (u32, u32),
        name: String,
    },
    TextBox {
        from: (u32, u32),
        to: (u32, u32),
        name: String,
    },
    OneCellPicture {
        from: (u32, u32),
        cx: i64,
        cy: i64,
    },
    AbsolutePicture {
        x: i64,
        y: i64,
        cx: i64,
        cy: i64,
    },
}

#[derive(Debug, Clone)]
pub struct SheetBuilder {
    name: String,
    state: Option<String>,
    active_cell: Option<String>,
    tab_selected: bool,
    shapes: Vec<DrawingShape>,
}

impl SheetBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: None,
            active_cell: None,
            tab_selected: false,
            shapes: Vec::new(),
        }
    }

    /// A1 reference of the selection's active cell
    pub fn active_cell(mut self, reference: &str) -> Self {
        self.active_cell = Some(reference.to_string());
        self
    }

    pub fn tab_selected(mut self) -> Self {
        self.tab_selected = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.state = Some("hidden".to_string());
        self
    }

    pub fn picture(mut self, from: (u32, u32), to: (u32, u32), name: &str) -> Self {
        self.shapes.push(DrawingShape::Picture {
            from,
            to,
            name: name.to_string(),
        });
        self
    }

    pub fn text_box(mut self, from: (u32, u32), to: (u32, u32), name: &str) -> Self {
        self.shapes.push(DrawingShape::TextBox {
            from,
            to,
            name: name.to_string(),
        });
        self
    }

    pub fn shape(mut self, shape: DrawingShape) -> Self {
        self.shapes.push(shape);
        self
    }

    fn worksheet_xml(&self) -> String {
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="{NS_MAIN}" xmlns:r="{NS_REL}"><dimension ref="A1:D10"/><sheetViews><sheetView workbookViewId="0""#
        );
        if self.tab_selected {
            xml.push_str(r#" tabSelected="1""#);
        }
        xml.push('>');
        if let Some(cell) = &self.active_cell {
            let _ = write!(xml, r#"<selection activeCell="{cell}" sqref="{cell}"/>"#);
        }
        xml.push_str(r#"</sheetView></sheetViews><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>Signed by</t></is></c></row></sheetData>"#);
        if !self.shapes.is_empty() {
            xml.push_str(r#"<drawing r:id="rId1"/>"#);
        }
        xml.push_str("</worksheet>");
        xml
    }

    fn drawing_xml(&self) -> String {
        let mut xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><xdr:wsDr xmlns:xdr="{NS_XDR}" xmlns:a="{NS_A}" xmlns:r="{NS_REL}">"#
        );
        for (i, shape) in self.shapes.iter().enumerate() {
            let id = i + 2;
            match shape {
                DrawingShape::Picture { from, to, name } => {
                    let _ = write!(
                        xml,
                        r#"<xdr:twoCellAnchor editAs="oneCell">{}{}{}<xdr:clientData/></xdr:twoCellAnchor>"#,
                        marker("from", *from),
                        marker("to", *to),
                        pic_xml(id, name)
                    );
                }
                DrawingShape::TextBox { from, to, name } => {
                    let _ = write!(
                        xml,
                        r#"<xdr:twoCellAnchor>{}{}<xdr:sp><xdr:nvSpPr><xdr:cNvPr id="{id}" name="{name}"/><xdr:cNvSpPr txBox="1"/></xdr:nvSpPr><xdr:spPr/></xdr:sp><xdr:clientData/></xdr:twoCellAnchor>"#,
                        marker("from", *from),
                        marker("to", *to),
                    );
                }
                DrawingShape::OneCellPicture { from, cx, cy } => {
                    let _ = write!(
                        xml,
                        r#"<xdr:oneCellAnchor>{}<xdr:ext cx="{cx}" cy="{cy}"/>{}<xdr:clientData/></xdr:oneCellAnchor>"#,
                        marker("from", *from),
                        pic_xml(id, "Logo")
                    );
                }
                DrawingShape::AbsolutePicture { x, y, cx, cy } => {
                    let _ = write!(
                        xml,
                        r#"<xdr:absoluteAnchor><xdr:pos x="{x}" y="{y}"/><xdr:ext cx="{cx}" cy="{cy}"/>{}<xdr:clientData/></xdr:absoluteAnchor>"#,
                        pic_xml(id, "Stamp")
                    );
                }
            }
        }
        xml.push_str("</xdr:wsDr>");
        xml
    }
}

fn marker(tag: &str, (row, col): (u32, u32)) -> String {
    format!(
        "<xdr:{tag}><xdr:col>{col}</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>{row}</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:{tag}>"
    )
}

fn pic_xml(id: usize, name: &str) -> String {
    format!(
        r#"<xdr:pic><xdr:nvPicPr><xdr:cNvPr id="{id}" name="{name}" descr="{name} image"/><xdr:cNvPicPr/></xdr:nvPicPr><xdr:blipFill><a:blip r:embed="rIdImg1"/><a:stretch><a:fillRect/></a:stretch></xdr:blipFill><xdr:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="952500" cy="381000"/></a:xfrm></xdr:spPr></xdr:pic>"#
    )
}

#[derive(Debug, Clone, Default)]
pub struct XlsxBuilder {
    sheets: Vec<SheetBuilder>,
    active_tab: Option<usize>,
}

impl XlsxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheet(mut self, sheet: SheetBuilder) -> Self {
        self.sheets.push(sheet);
        self
    }

    pub fn active_tab(mut self, index: usize) -> Self {
        self.active_tab = Some(index);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let cursor = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(cursor);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let put = |zip: &mut ZipWriter<Cursor<Vec<u8>>>, path: &str, data: &[u8]| {
            zip.start_file(path, options).unwrap();
            zip.write_all(data).unwrap();
        };

        let mut types = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
        );
        for i in 1..=self.sheets.len() {
            let _ = write!(
                types,
                r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            );
        }
        types.push_str("</Types>");
        put(&mut zip, "[Content_Types].xml", types.as_bytes());

        put(
            &mut zip,
            "_rels/.rels",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{NS_PKG}"><Relationship Id="rId1" Type="{NS_REL}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
            )
            .as_bytes(),
        );

        let mut workbook = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="{NS_MAIN}" xmlns:r="{NS_REL}">"#
        );
        if let Some(tab) = self.active_tab {
            let _ = write!(
                workbook,
                r#"<bookViews><workbookView activeTab="{tab}"/></bookViews>"#
            );
        }
        workbook.push_str("<sheets>");
        let mut workbook_rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{NS_PKG}">"#
        );
        for (i, sheet) in self.sheets.iter().enumerate() {
            let n = i + 1;
            let state = sheet
                .state
                .as_ref()
                .map(|s| format!(r#" state="{s}""#))
                .unwrap_or_default();
            let _ = write!(
                workbook,
                r#"<sheet name="{}" sheetId="{n}"{state} r:id="rId{n}"/>"#,
                sheet.name
            );
            let _ = write!(
                workbook_rels,
                r#"<Relationship Id="rId{n}" Type="{NS_REL}/worksheet" Target="worksheets/sheet{n}.xml"/>"#
            );
        }
        workbook.push_str("</sheets></workbook>");
        workbook_rels.push_str("</Relationships>");
        put(&mut zip, "xl/workbook.xml", workbook.as_bytes());
        put(&mut zip, "xl/_rels/workbook.xml.rels", workbook_rels.as_bytes());

        let mut wrote_media = false;
        for (i, sheet) in self.sheets.iter().enumerate() {
            let n = i + 1;
            put(
                &mut zip,
                &format!("xl/worksheets/sheet{n}.xml"),
                sheet.worksheet_xml().as_bytes(),
            );
            if sheet.shapes.is_empty() {
                continue;
            }

            put(
                &mut zip,
                &format!("xl/worksheets/_rels/sheet{n}.xml.rels"),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{NS_PKG}"><Relationship Id="rId1" Type="{NS_REL}/drawing" Target="../drawings/drawing{n}.xml"/></Relationships>"#
                )
                .as_bytes(),
            );
            put(
                &mut zip,
                &format!("xl/drawings/drawing{n}.xml"),
                sheet.drawing_xml().as_bytes(),
            );
            put(
                &mut zip,
                &format!("xl/drawings/_rels/drawing{n}.xml.rels"),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{NS_PKG}"><Relationship Id="rIdImg1" Type="{NS_REL}/image" Target="../media/image1.png"/></Relationships>"#
                )
                .as_bytes(),
            );
            if !wrote_media {
                put(&mut zip, "xl/media/image1.png", PNG_BYTES);
                wrote_media = true;
            }
        }

        zip.finish().unwrap().into_inner()
    }
}

/// A one-sheet workbook with a signature-sized picture at C5:D6 and a text
/// box elsewhere, active cell C5.
pub fn signed_contract() -> Vec<u8> {
    XlsxBuilder::new()
        .sheet(
            SheetBuilder::new("Contract")
                .tab_selected()
                .active_cell("C5")
                .picture((4, 2), (5, 3), "Signature C5")
                .text_box((0, 5), (2, 8), "Notes"),
        )
        .build()
}
