//! `data:` URL decoding for captured signatures.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::error::{Result, XlsignError};
use crate::types::ImagePayload;

impl ImagePayload {
    /// Decode a base64 `data:image/...;base64,...` URL.
    ///
    /// # Errors
    /// Returns [`XlsignError::Image`] for non-data URLs, non-image MIME
    /// types, percent-encoded (non-base64) payloads, corrupt base64 and
    /// empty images.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| XlsignError::Image("not a data URL".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| XlsignError::Image("data URL has no payload".into()))?;

        let mut params = header.split(';');
        let mime_type = params.next().unwrap_or_default().trim().to_ascii_lowercase();
        if !mime_type.starts_with("image/") {
            return Err(XlsignError::Image(format!(
                "unsupported MIME type {mime_type:?}"
            )));
        }
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(XlsignError::Image("data URL is not base64 encoded".into()));
        }

        let data: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = BASE64
            .decode(data.as_bytes())
            .map_err(|e| XlsignError::Image(format!("invalid base64: {e}")))?;
        if bytes.is_empty() {
            return Err(XlsignError::Image("empty image".into()));
        }

        Ok(Self { mime_type, data })
    }
}
