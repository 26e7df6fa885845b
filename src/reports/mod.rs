//! Expense aggregation and the monthly report

pub mod aggregate;
pub mod monthly;

pub use aggregate::{aggregate_by_category, aggregate_by_date, total_spent};
pub use monthly::{MonthlyReport, DEFAULT_HEADINGS};
