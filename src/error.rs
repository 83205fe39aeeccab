//! Structured error types for xlsign.
//!
//! Only document loading surfaces errors to the user. Placement and
//! navigation degrade to no-ops instead of failing.

/// All errors that can occur while loading and addressing a workbook.
#[derive(Debug, thiserror::Error)]
pub enum XlsignError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Invalid or out-of-range cell reference.
    #[error("Invalid cell reference: {0}")]
    CellRef(String),

    /// Workbook structure could not be understood.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Network or file fetch failure.
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// Image payload could not be decoded.
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XlsignError>;

impl From<String> for XlsignError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for XlsignError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<XlsignError> for wasm_bindgen::JsValue {
    fn from(e: XlsignError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = XlsignError::CellRef("R0C1".into());
        assert_eq!(e.to_string(), "Invalid cell reference: R0C1");

        let e = XlsignError::Fetch("HTTP error: 404".into());
        assert_eq!(e.to_string(), "Fetch failed: HTTP error: 404");

        let e: XlsignError = "plain".into();
        assert_eq!(e.to_string(), "plain");
    }

    #[test]
    fn test_zip_error_converts() {
        let bytes = b"definitely not a zip";
        let err = zip::ZipArchive::new(std::io::Cursor::new(&bytes[..]))
            .map_err(XlsignError::from)
            .err()
            .expect("garbage should not open as a zip");
        assert!(err.to_string().starts_with("ZIP archive:"));
    }
}
