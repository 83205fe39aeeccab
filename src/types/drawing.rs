use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use super::CellAddress;

/// How a drawing object is pinned to the grid
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AnchorKind {
    /// `twoCellAnchor`: both corners pinned to cells
    TwoCell,
    /// `oneCellAnchor`: top-left pinned, size absolute
    OneCell,
    /// `absoluteAnchor`: not pinned to cells
    Absolute,
}

/// What a drawing object contains
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    Picture,
    Chart,
    Shape,
    Connector,
    Group,
}

/// Stable identity of a shape within its collection
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u64);

/// Position of a drawing object
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShapeAnchor {
    pub kind: AnchorKind,
    /// Top-left corner cell (two-cell and one-cell anchors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<CellAddress>,
    /// Bottom-right corner cell (two-cell anchors only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<CellAddress>,
    /// Offsets inside the `from` cell in EMUs (col, row)
    #[serde(default)]
    pub from_offset: (i64, i64),
    /// Offsets inside the `to` cell in EMUs (col, row)
    #[serde(default)]
    pub to_offset: (i64, i64),
    /// Size in EMUs for one-cell and absolute anchors (cx, cy)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent: Option<(i64, i64)>,
    /// `editAs` behaviour when cells move ("twoCell", "oneCell", "absolute")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_as: Option<String>,
}

impl ShapeAnchor {
    /// A two-cell anchor spanning `from` to `to` with no offsets.
    #[must_use]
    pub fn two_cell(from: CellAddress, to: CellAddress) -> Self {
        Self {
            kind: AnchorKind::TwoCell,
            from: Some(from),
            to: Some(to),
            from_offset: (0, 0),
            to_offset: (0, 0),
            extent: None,
            edit_as: None,
        }
    }
}

/// A drawing object on a worksheet
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    /// Assigned by the owning collection
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub anchor: ShapeAnchor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description/alt text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Picture content, when loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImagePayload>,
}

impl Shape {
    /// A picture pinned between two cells. The id is assigned on insertion.
    #[must_use]
    pub fn picture(image: ImagePayload, top_left: CellAddress, bottom_right: CellAddress) -> Self {
        Self {
            id: ShapeId(0),
            kind: ShapeKind::Picture,
            anchor: ShapeAnchor::two_cell(top_left, bottom_right),
            name: None,
            description: None,
            image: Some(image),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn top_left_cell(&self) -> Option<CellAddress> {
        self.anchor.from
    }

    /// Only two-cell anchors have a bottom-right cell.
    #[must_use]
    pub fn bottom_right_cell(&self) -> Option<CellAddress> {
        match self.anchor.kind {
            AnchorKind::TwoCell => self.anchor.to,
            AnchorKind::OneCell | AnchorKind::Absolute => None,
        }
    }
}

/// Encoded image bytes with their MIME type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    /// MIME type (e.g., "image/png", "image/svg+xml")
    pub mime_type: String,
    /// Base64-encoded image data
    pub data: String,
}

impl ImagePayload {
    /// Wrap raw image bytes, detecting the format from magic bytes and
    /// falling back to the file extension.
    #[must_use]
    pub fn from_bytes(bytes: &[u8], extension_hint: Option<&str>) -> Self {
        let mut format = ImageFormat::from_magic_bytes(bytes);
        if format == ImageFormat::Unknown {
            if let Some(ext) = extension_hint {
                format = ImageFormat::from_extension(ext);
            }
        }
        Self {
            mime_type: format.mime_type().to_string(),
            data: BASE64.encode(bytes),
        }
    }

    /// `data:` URL form, as handed to `<img src>`.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decoded byte length, or `None` if the base64 is corrupt.
    #[must_use]
    pub fn decoded_len(&self) -> Option<usize> {
        BASE64.decode(self.data.as_bytes()).ok().map(|b| b.len())
    }
}

/// Image format/MIME type detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    Webp,
    Svg,
    Emf,
    Wmf,
    Unknown,
}

impl ImageFormat {
    /// Detect image format from file extension
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "gif" => Self::Gif,
            "bmp" => Self::Bmp,
            "tif" | "tiff" => Self::Tiff,
            "webp" => Self::Webp,
            "svg" => Self::Svg,
            "emf" => Self::Emf,
            "wmf" => Self::Wmf,
            _ => Self::Unknown,
        }
    }

    /// Detect image format from magic bytes
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }

        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Self::Gif;
        }
        if data.starts_with(b"BM") {
            return Self::Bmp;
        }
        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Self::Tiff;
        }
        if data.len() >= 12 && data.starts_with(b"RIFF") && data.get(8..12) == Some(b"WEBP".as_slice()) {
            return Self::Webp;
        }
        if data.starts_with(b"<svg") || data.starts_with(b"<?xml") {
            return Self::Svg;
        }
        if data.starts_with(&[0x01, 0x00, 0x00, 0x00]) && data.len() >= 40 {
            return Self::Emf;
        }
        if data.starts_with(&[0xD7, 0xCD, 0xC6, 0x9A]) {
            return Self::Wmf;
        }

        Self::Unknown
    }

    /// Get MIME type for this image format
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
            Self::Webp => "image/webp",
            Self::Svg => "image/svg+xml",
            Self::Emf => "image/x-emf",
            Self::Wmf => "image/x-wmf",
            Self::Unknown => "application/octet-stream",
        }
    }
}
