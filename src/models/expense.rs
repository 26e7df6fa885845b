//! Expense rows and declared categories as read from the spreadsheet

use super::money::Money;
use crate::error::{ReportError, ReportResult};

/// Column positions of the expense fields inside a sheet row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Index of the date column
    pub date_column: usize,
    /// Index of the amount column
    pub amount_column: usize,
    /// Index of the category column
    pub category_column: usize,
    /// Index of the free-form note column
    pub note_column: Option<usize>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            date_column: 0,
            amount_column: 1,
            category_column: 2,
            note_column: Some(3),
        }
    }
}

/// One expense line of the monthly tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRow {
    /// 1-based position among the fetched data rows
    pub row_number: usize,
    /// Date exactly as written in the sheet
    pub date: String,
    /// Amount text exactly as written in the sheet
    pub raw_amount: String,
    /// Category name
    pub category: String,
    /// Optional note
    pub note: Option<String>,
}

impl ExpenseRow {
    /// Build a row from sheet cells
    ///
    /// The Sheets API drops trailing empty cells, so any missing column is
    /// treated as an empty string.
    pub fn from_cells(row_number: usize, cells: &[String], mapping: &ColumnMapping) -> Self {
        let cell = |idx: usize| cells.get(idx).cloned().unwrap_or_default();

        let note = mapping
            .note_column
            .and_then(|idx| cells.get(idx))
            .filter(|n| !n.trim().is_empty())
            .cloned();

        Self {
            row_number,
            date: cell(mapping.date_column),
            raw_amount: cell(mapping.amount_column),
            category: cell(mapping.category_column),
            note,
        }
    }

    /// Parsed amount, or `None` when the cell is blank
    pub fn amount(&self) -> ReportResult<Option<Money>> {
        if self.raw_amount.trim().is_empty() {
            return Ok(None);
        }
        Money::parse(&self.raw_amount)
            .map(Some)
            .map_err(|_| self.invalid_amount())
    }

    /// Parsed amount where a blank cell is an error
    pub fn required_amount(&self) -> ReportResult<Money> {
        self.amount()?.ok_or_else(|| self.invalid_amount())
    }

    pub(crate) fn invalid_amount(&self) -> ReportError {
        ReportError::InvalidAmount {
            row: self.row_number,
            value: self.raw_amount.clone(),
        }
    }
}

/// Parse every fetched sheet row into an expense row
pub fn parse_expense_rows(rows: &[Vec<String>], mapping: &ColumnMapping) -> Vec<ExpenseRow> {
    rows.iter()
        .enumerate()
        .map(|(i, cells)| ExpenseRow::from_cells(i + 1, cells, mapping))
        .collect()
}

/// Ordered list of declared expense categories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryList {
    names: Vec<String>,
}

impl CategoryList {
    /// Create a list from names, skipping blanks and repeats
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::default();
        for name in names {
            let name = name.into();
            if name.trim().is_empty() || list.contains(&name) {
                continue;
            }
            list.names.push(name);
        }
        list
    }

    /// Flatten a fetched range (one or more cells per row) into a list
    pub fn from_rows(rows: &[Vec<String>]) -> Self {
        Self::new(rows.iter().flatten().cloned())
    }

    /// Check whether a category is declared
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Iterate over names in declared order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
