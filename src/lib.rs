//! expense-report - monthly expense reports from a spreadsheet
//!
//! This library reads a month of expense rows from a spreadsheet, totals them
//! by category and by date, renders two charts and lays everything out in a
//! two-page PDF.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Base directory, artifact paths and persisted settings
//! - `error`: Custom error types
//! - `auth`: OAuth token storage, refresh and the consent flow
//! - `sheets`: Read-only spreadsheet access behind the `SheetSource` trait
//! - `models`: Expense rows, money and ordered totals
//! - `reports`: Aggregation and the monthly report pipeline
//! - `charts`: Pie and line chart rendering
//! - `pdf`: Page layout and PDF serialization
//! - `storage`: JSON file helpers
//! - `cli`, `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_report::config::{ReportPaths, Settings};
//!
//! let paths = ReportPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod auth;
pub mod charts;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod pdf;
pub mod reports;
pub mod sheets;
pub mod storage;

pub use error::{ReportError, ReportResult};
