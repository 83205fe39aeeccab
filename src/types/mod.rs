//! Data types for the workbook object model.

mod cell;
mod drawing;
mod workbook;

pub use cell::*;
pub use drawing::*;
pub use workbook::*;
