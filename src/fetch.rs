//! Fetching document bytes.
//!
//! In the browser this is a `fetch()` GET through `gloo-net`. Natively a
//! blocking `reqwest` client handles `http(s)://` URLs, and `file://`
//! URLs or plain paths are read from disk.

use crate::error::{Result, XlsignError};

#[cfg(not(target_arch = "wasm32"))]
pub use native::{Fetch, HttpFetcher};

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::Duration;

    use super::{Result, XlsignError};

    /// Blocking source of document bytes.
    pub trait Fetch {
        /// Fetch the full body behind `url`.
        ///
        /// # Errors
        /// Network failures, non-2xx responses and unreadable files.
        fn fetch(&self, url: &str) -> Result<Vec<u8>>;
    }

    impl<F> Fetch for F
    where
        F: Fn(&str) -> Result<Vec<u8>>,
    {
        fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self(url)
        }
    }

    #[derive(Debug, Clone)]
    pub struct HttpFetcher {
        http: reqwest::blocking::Client,
    }

    impl HttpFetcher {
        /// # Errors
        /// Fails if the TLS backend cannot be initialised.
        pub fn new() -> Result<Self> {
            let http = reqwest::blocking::Client::builder()
                .user_agent(format!("xlsign/{}", env!("CARGO_PKG_VERSION")))
                .timeout(Duration::from_secs(60))
                .build()
                .map_err(|e| XlsignError::Fetch(e.to_string()))?;
            Ok(Self { http })
        }

        fn get(&self, url: &str) -> Result<Vec<u8>> {
            let response = self
                .http
                .get(url)
                .send()
                .map_err(|e| XlsignError::Fetch(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(XlsignError::Fetch(format!("HTTP error: {status}")));
            }

            response
                .bytes()
                .map(|b| b.to_vec())
                .map_err(|e| XlsignError::Fetch(e.to_string()))
        }
    }

    impl Fetch for HttpFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            if url.starts_with("http://") || url.starts_with("https://") {
                return self.get(url);
            }
            let path = url.strip_prefix("file://").unwrap_or(url);
            std::fs::read(path).map_err(|e| XlsignError::Fetch(format!("{path}: {e}")))
        }
    }
}

/// GET `url` from the browser and return the body bytes.
///
/// # Errors
/// Request failures and non-2xx responses.
#[cfg(target_arch = "wasm32")]
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let response = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| XlsignError::Fetch(format!("Request failed: {e}")))?;

    if !response.ok() {
        return Err(XlsignError::Fetch(format!(
            "HTTP error: {}",
            response.status()
        )));
    }

    response
        .binary()
        .await
        .map_err(|e| XlsignError::Fetch(format!("Failed to read body: {e}")))
}

#[cfg(all(test, not(target_arch = "wasm32")))]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_local_paths() {
        let dir = std::env::temp_dir().join(format!("xlsign-fetch-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("doc.bin");
        std::fs::write(&path, b"bytes").unwrap();

        let fetcher = HttpFetcher::new().unwrap();
        let plain = path.to_string_lossy().to_string();
        assert_eq!(fetcher.fetch(&plain).unwrap(), b"bytes");
        assert_eq!(fetcher.fetch(&format!("file://{plain}")).unwrap(), b"bytes");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_file_is_fetch_error() {
        let fetcher = HttpFetcher::new().unwrap();
        let err = fetcher.fetch("/definitely/not/here.xlsx").unwrap_err();
        assert!(matches!(err, XlsignError::Fetch(_)));
    }

    #[test]
    fn test_closure_fetcher() {
        let fetcher = |url: &str| -> Result<Vec<u8>> { Ok(url.as_bytes().to_vec()) };
        assert_eq!(fetcher.fetch("abc").unwrap(), b"abc");
    }
}
