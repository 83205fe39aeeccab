//! Workbook engine seam.
//!
//! The loader only needs "bytes in, workbook or error out". [`XlsxEngine`]
//! is the built-in implementation; hosts can plug in their own.

use crate::error::Result;
use crate::parser::{self, LoadOptions};
use crate::types::Workbook;

pub trait WorkbookEngine {
    /// Parse raw document bytes into a workbook.
    ///
    /// # Errors
    /// Returns an error describing why the document could not be loaded.
    fn load(&self, bytes: &[u8], options: &LoadOptions) -> Result<Workbook>;
}

/// Reads SpreadsheetML (`.xlsx`) packages.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxEngine;

impl WorkbookEngine for XlsxEngine {
    fn load(&self, bytes: &[u8], options: &LoadOptions) -> Result<Workbook> {
        parser::parse_with_options(bytes, options)
    }
}

impl<F> WorkbookEngine for F
where
    F: Fn(&[u8], &LoadOptions) -> Result<Workbook>,
{
    fn load(&self, bytes: &[u8], options: &LoadOptions) -> Result<Workbook> {
        self(bytes, options)
    }
}
