//! PDF report assembly

pub mod layout;
mod metrics;
pub mod writer;

pub use layout::{Element, Page, ReportBuilder, TableStats};
