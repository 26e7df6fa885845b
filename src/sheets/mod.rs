//! Spreadsheet access
//!
//! The report only ever reads rectangular ranges of cell strings. The
//! [`SheetSource`] trait captures that, with [`SheetsClient`] as the live
//! implementation backed by the Sheets API.

pub mod client;
pub mod range;

pub use client::SheetsClient;
pub use range::A1Range;

use crate::error::ReportResult;

/// Something that can return the string cells of a range
pub trait SheetSource {
    /// Fetch a range as rows of cells; an empty range yields no rows
    fn fetch_range(&self, range: &A1Range) -> ReportResult<Vec<Vec<String>>>;
}
