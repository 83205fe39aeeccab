//! Freehand signature pad.
//!
//! Records pointer strokes in canvas coordinates and renders them as an
//! SVG image. Hosts with a real canvas (see the `wasm32` viewer) can use
//! the canvas itself as the [`SignatureSource`](super::SignatureSource)
//! instead.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Pad appearance and size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PadOptions {
    /// CSS color of the pen
    pub pen_color: String,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Line width in pixels
    pub stroke_width: f64,
}

impl Default for PadOptions {
    fn default() -> Self {
        Self {
            pen_color: "green".to_string(),
            width: 500,
            height: 200,
            stroke_width: 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Point {
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SignaturePad {
    options: PadOptions,
    strokes: Vec<Vec<Point>>,
    drawing: bool,
}

impl SignaturePad {
    #[must_use]
    pub fn new(options: PadOptions) -> Self {
        Self {
            options,
            strokes: Vec::new(),
            drawing: false,
        }
    }

    #[must_use]
    pub fn options(&self) -> &PadOptions {
        &self.options
    }

    /// Pen down. Starts a new stroke.
    pub fn begin_stroke(&mut self, x: f64, y: f64) {
        self.drawing = true;
        self.strokes.push(Vec::new());
        self.extend_stroke(x, y);
    }

    /// Pen move. Ignored while the pen is up.
    pub fn extend_stroke(&mut self, x: f64, y: f64) {
        if !self.drawing || !x.is_finite() || !y.is_finite() {
            return;
        }
        let point = Point {
            x: x.clamp(0.0, f64::from(self.options.width)),
            y: y.clamp(0.0, f64::from(self.options.height)),
        };
        if let Some(stroke) = self.strokes.last_mut() {
            stroke.push(point);
        }
    }

    /// Pen up.
    pub fn end_stroke(&mut self) {
        self.drawing = false;
        if self.strokes.last().is_some_and(Vec::is_empty) {
            self.strokes.pop();
        }
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.drawing = false;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.iter().all(Vec::is_empty)
    }

    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.strokes.iter().filter(|s| !s.is_empty()).count()
    }

    /// Render the strokes as a standalone SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let PadOptions {
            pen_color,
            width,
            height,
            stroke_width,
        } = &self.options;
        let color = quick_xml::escape::escape(pen_color.as_str());
        let stroke_width = fmt_coord(*stroke_width);

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        for stroke in self.strokes.iter().filter(|s| !s.is_empty()) {
            match stroke.as_slice() {
                [only] => {
                    // A tap leaves a dot
                    let _ = write!(
                        svg,
                        r#"<circle cx="{}" cy="{}" r="{}" fill="{color}"/>"#,
                        fmt_coord(only.x),
                        fmt_coord(only.y),
                        fmt_coord(self.options.stroke_width / 2.0),
                    );
                }
                points => {
                    let coords: Vec<String> = points
                        .iter()
                        .map(|p| format!("{},{}", fmt_coord(p.x), fmt_coord(p.y)))
                        .collect();
                    let _ = write!(
                        svg,
                        r#"<polyline points="{}" fill="none" stroke="{color}" stroke-width="{stroke_width}" stroke-linecap="round" stroke-linejoin="round"/>"#,
                        coords.join(" "),
                    );
                }
            }
        }
        svg.push_str("</svg>");
        svg
    }

    /// The drawing as a `data:image/svg+xml;base64,...` URL, or `None`
    /// when nothing has been drawn.
    #[must_use]
    pub fn to_data_url(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(format!(
            "data:image/svg+xml;base64,{}",
            BASE64.encode(self.to_svg())
        ))
    }
}

/// Format a coordinate with at most two decimals and no trailing zeros.
fn fmt_coord(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" || s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::ImagePayload;

    fn signed_pad() -> SignaturePad {
        let mut pad = SignaturePad::new(PadOptions::default());
        pad.begin_stroke(10.0, 20.0);
        pad.extend_stroke(30.5, 40.25);
        pad.extend_stroke(60.0, 20.0);
        pad.end_stroke();
        pad
    }

    #[test]
    fn test_empty_pad_has_no_capture() {
        let mut pad = SignaturePad::new(PadOptions::default());
        assert!(pad.is_empty());
        assert!(pad.to_data_url().is_none());

        pad.begin_stroke(f64::NAN, 1.0);
        pad.end_stroke();
        assert!(pad.is_empty());
        assert_eq!(pad.stroke_count(), 0);
    }

    #[test]
    fn test_moves_without_pen_down_are_ignored() {
        let mut pad = SignaturePad::new(PadOptions::default());
        pad.extend_stroke(5.0, 5.0);
        assert!(pad.is_empty());
    }

    #[test]
    fn test_svg_polyline() {
        let svg = signed_pad().to_svg();
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="500" height="200""#));
        assert!(svg.contains(r#"points="10,20 30.5,40.25 60,20""#));
        assert!(svg.contains(r#"stroke="green""#));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_tap_renders_dot_and_points_are_clamped() {
        let mut pad = SignaturePad::new(PadOptions::default());
        pad.begin_stroke(900.0, -3.0);
        pad.end_stroke();
        let svg = pad.to_svg();
        assert!(svg.contains(r#"<circle cx="500" cy="0" r="1" fill="green"/>"#));
    }

    #[test]
    fn test_pen_color_is_escaped() {
        let pad = SignaturePad::new(PadOptions {
            pen_color: r#"red" onload="x"#.to_string(),
            ..PadOptions::default()
        });
        assert!(!pad.to_svg().contains(r#"red" onload"#));
    }

    #[test]
    fn test_data_url_decodes_to_svg_payload() {
        let pad = signed_pad();
        let url = pad.to_data_url().unwrap();
        let payload = ImagePayload::from_data_url(&url).unwrap();
        assert_eq!(payload.mime_type, "image/svg+xml");
        assert_eq!(payload.decoded_len(), Some(pad.to_svg().len()));
    }

    #[test]
    fn test_clear() {
        let mut pad = signed_pad();
        assert_eq!(pad.stroke_count(), 1);
        pad.clear();
        assert!(pad.is_empty());
    }

    #[test]
    fn test_fmt_coord() {
        assert_eq!(fmt_coord(10.0), "10");
        assert_eq!(fmt_coord(0.5), "0.5");
        assert_eq!(fmt_coord(1.234), "1.23");
        assert_eq!(fmt_coord(0.0), "0");
        assert_eq!(fmt_coord(-0.001), "0");
    }
}
