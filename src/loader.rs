//! Document loading with a generation guard.
//!
//! A load is two steps: [`DocumentLoader::request`] hands out a
//! [`LoadTicket`] for a URL, and [`DocumentLoader::complete`] takes the
//! fetched bytes for that ticket. Every request bumps the generation, so
//! a completion that arrives after a newer request is dropped unseen.

use serde::Serialize;

use crate::engine::{WorkbookEngine, XlsxEngine};
use crate::error::Result;
use crate::parser::LoadOptions;
use crate::viewer::ViewerBinding;

/// Identifies one fetch+parse cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    url: String,
}

impl LoadTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// What the host shows: a spinner until `loaded`, then either the
/// document or `error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadState {
    pub loaded: bool,
    /// Empty on success.
    pub error: String,
}

/// Result of handing a completion to the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadCompletion {
    /// Parsed and shown.
    Attached,
    /// Parsed, but the viewer was not mounted.
    Detached,
    Failed(String),
    /// Superseded by a newer request; nothing changed.
    Stale,
}

impl LoadCompletion {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attached => "attached",
            Self::Detached => "detached",
            Self::Failed(_) => "failed",
            Self::Stale => "stale",
        }
    }
}

#[derive(Debug)]
pub struct DocumentLoader<E = XlsxEngine> {
    engine: E,
    options: LoadOptions,
    generation: u64,
    current: Option<LoadTicket>,
    state: LoadState,
}

impl Default for DocumentLoader<XlsxEngine> {
    fn default() -> Self {
        Self::new(XlsxEngine)
    }
}

impl<E: WorkbookEngine> DocumentLoader<E> {
    #[must_use]
    pub fn new(engine: E) -> Self {
        Self::with_options(engine, LoadOptions::default())
    }

    #[must_use]
    pub fn with_options(engine: E, options: LoadOptions) -> Self {
        Self {
            engine,
            options,
            generation: 0,
            current: None,
            state: LoadState::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.state.loaded
    }

    /// The recorded failure message, if the last load failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        Some(self.state.error.as_str()).filter(|e| !e.is_empty())
    }

    #[must_use]
    pub fn current_url(&self) -> Option<&str> {
        self.current.as_ref().map(LoadTicket::url)
    }

    #[must_use]
    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.current.as_ref() == Some(ticket)
    }

    /// Start loading `url`. Returns `None` when `url` is already the
    /// current document URL.
    pub fn request(&mut self, url: &str) -> Option<LoadTicket> {
        if self.current_url() == Some(url) {
            return None;
        }

        self.generation += 1;
        let ticket = LoadTicket {
            generation: self.generation,
            url: url.to_string(),
        };
        log::debug!("load #{} requested: {url}", ticket.generation);

        self.current = Some(ticket.clone());
        self.state = LoadState::default();
        Some(ticket)
    }

    /// Forget the current URL and load state. Outstanding tickets become
    /// stale, so the next `request` starts a fresh cycle for any URL.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.current = None;
        self.state = LoadState::default();
    }

    /// Finish the cycle for `ticket` with the fetched body.
    pub fn complete(
        &mut self,
        ticket: &LoadTicket,
        fetched: Result<Vec<u8>>,
        binding: &mut ViewerBinding,
    ) -> LoadCompletion {
        if !self.is_current(ticket) {
            log::debug!(
                "discarding stale load #{} ({})",
                ticket.generation,
                ticket.url
            );
            return LoadCompletion::Stale;
        }

        let parsed = fetched.and_then(|bytes| self.engine.load(&bytes, &self.options));
        self.state.loaded = true;

        match parsed {
            Ok(workbook) => {
                self.state.error.clear();
                log::debug!(
                    "load #{} parsed {} worksheet(s)",
                    ticket.generation,
                    workbook.worksheets.len()
                );
                if binding.attach(workbook) {
                    LoadCompletion::Attached
                } else {
                    log::debug!("viewer not mounted, dropping load #{}", ticket.generation);
                    LoadCompletion::Detached
                }
            }
            Err(e) => {
                let message = e.to_string();
                log::warn!("failed to load {}: {message}", ticket.url);
                binding.detach();
                self.state.error.clone_from(&message);
                LoadCompletion::Failed(message)
            }
        }
    }

    /// Fetch and load `url` synchronously.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_blocking(
        &mut self,
        url: &str,
        fetcher: &(impl crate::fetch::Fetch + ?Sized),
        binding: &mut ViewerBinding,
    ) -> Option<LoadCompletion> {
        let ticket = self.request(url)?;
        let fetched = fetcher.fetch(ticket.url());
        Some(self.complete(&ticket, fetched, binding))
    }
}
