//! Shared XML attribute parsing utilities for the package readers.
//!
//! All functions handle namespace-prefixed attributes and UTF-8
//! conversion safely.

use quick_xml::events::BytesStart;

/// Extract a string attribute value by key.
///
/// Returns `None` if the attribute is missing or not valid UTF-8.
pub fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.as_ref() == key {
            return std::str::from_utf8(&attr.value).ok().map(|s| s.to_string());
        }
    }
    None
}

/// Extract a string attribute by local name (ignoring namespace prefix).
///
/// Needed for `r:id` / `r:embed`, whose prefix varies between writers.
pub fn attr_string_local(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == key {
            return std::str::from_utf8(&attr.value).ok().map(|s| s.to_string());
        }
    }
    None
}

/// Extract a `u32` attribute value by key.
pub fn attr_u32(e: &BytesStart, key: &[u8]) -> Option<u32> {
    attr_string(e, key).and_then(|s| s.trim().parse().ok())
}

/// Extract an `i64` attribute value by key.
pub fn attr_i64(e: &BytesStart, key: &[u8]) -> Option<i64> {
    attr_string(e, key).and_then(|s| s.trim().parse().ok())
}

/// Extract a boolean attribute value by key.
///
/// Returns `None` if missing. Recognizes `"1"`, `"true"` as true; anything else as false.
pub fn attr_bool(e: &BytesStart, key: &[u8]) -> Option<bool> {
    attr_string(e, key).map(|s| matches!(s.as_str(), "1" | "true"))
}

/// Parse a text node into a number, ignoring surrounding whitespace.
///
/// DrawingML stores anchor coordinates as element text (`<xdr:row>4</xdr:row>`).
pub fn text_number<T: std::str::FromStr>(text: &[u8]) -> Option<T> {
    std::str::from_utf8(text).ok()?.trim().parse().ok()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn make_start(xml: &str) -> BytesStart<'_> {
        // Strip < and > / /> to get just the tag content
        let content = xml
            .trim_start_matches('<')
            .trim_end_matches('>')
            .trim_end_matches('/')
            .trim_end();
        BytesStart::from_content(content, content.find(' ').unwrap_or(content.len()))
    }

    #[test]
    fn test_attr_string() {
        let e = make_start(r#"<sheet name="Budget" />"#);
        assert_eq!(attr_string(&e, b"name"), Some("Budget".to_string()));
        assert_eq!(attr_string(&e, b"missing"), None);
    }

    #[test]
    fn test_attr_string_local_ignores_prefix() {
        let e = make_start(r#"<a:blip r:embed="rId3" />"#);
        assert_eq!(attr_string_local(&e, b"embed"), Some("rId3".to_string()));
        assert_eq!(attr_string(&e, b"embed"), None);
    }

    #[test]
    fn test_numeric_attrs() {
        let e = make_start(r#"<ext cx="609600" cy="-5" tab="2" />"#);
        assert_eq!(attr_i64(&e, b"cx"), Some(609_600));
        assert_eq!(attr_i64(&e, b"cy"), Some(-5));
        assert_eq!(attr_u32(&e, b"tab"), Some(2));
        assert_eq!(attr_u32(&e, b"cy"), None);
    }

    #[test]
    fn test_attr_bool() {
        let e = make_start(r#"<sheetView a="1" b="0" c="true" />"#);
        assert_eq!(attr_bool(&e, b"a"), Some(true));
        assert_eq!(attr_bool(&e, b"b"), Some(false));
        assert_eq!(attr_bool(&e, b"c"), Some(true));
        assert_eq!(attr_bool(&e, b"missing"), None);
    }

    #[test]
    fn test_text_number() {
        assert_eq!(text_number::<u32>(b" 4 "), Some(4));
        assert_eq!(text_number::<i64>(b"-12"), Some(-12));
        assert_eq!(text_number::<u32>(b"x"), None);
    }
}
