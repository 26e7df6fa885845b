//! Core data models for the expense report
//!
//! This module contains the data structures that represent the reporting
//! domain: money amounts, expense rows, declared categories and totals.

pub mod expense;
pub mod money;
pub mod totals;

pub use expense::{parse_expense_rows, CategoryList, ColumnMapping, ExpenseRow};
pub use money::Money;
pub use totals::{AddError, CategoryTotals, DateTotals, Totals};
