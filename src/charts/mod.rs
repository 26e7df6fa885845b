//! Chart rendering
//!
//! Two PNG charts go into the report: a pie of spending per category and a
//! smoothed line of spending per date. Both are written to a path supplied
//! by the caller, which gets the same path back for embedding.

pub mod line;
pub mod palette;
pub mod pie;
pub mod spline;

pub use line::render_date_chart;
pub use pie::render_category_chart;

use crate::error::ReportError;

/// Wrap a plotters drawing error
fn chart_err<E: std::fmt::Display>(err: E) -> ReportError {
    ReportError::Chart(err.to_string())
}
