//! A1-notation range references

use std::fmt;

/// A rectangular region of one spreadsheet tab, e.g. `February!A3:D`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Range {
    /// Tab (sheet) name
    pub tab: String,
    /// Cell coordinates, e.g. `A3:D`
    pub cells: String,
}

impl A1Range {
    pub fn new(tab: impl Into<String>, cells: impl Into<String>) -> Self {
        Self {
            tab: tab.into(),
            cells: cells.into(),
        }
    }

    /// Whether the tab name can be written without quotes
    fn is_plain_tab(&self) -> bool {
        !self.tab.is_empty()
            && self
                .tab
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

impl fmt::Display for A1Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_plain_tab() {
            write!(f, "{}!{}", self.tab, self.cells)
        } else {
            write!(f, "'{}'!{}", self.tab.replace('\'', "''"), self.cells)
        }
    }
}
