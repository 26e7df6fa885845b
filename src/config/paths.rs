//! Path management for the expense report generator
//!
//! Every file the tool reads or writes lives under one base directory.
//!
//! ## Path Resolution Order
//!
//! 1. `EXPENSE_REPORT_DIR` environment variable (if set)
//! 2. The current working directory

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::ReportError;

/// Environment variable overriding the base directory
pub const BASE_DIR_ENV: &str = "EXPENSE_REPORT_DIR";

/// Manages all paths used by the report generator
#[derive(Debug, Clone)]
pub struct ReportPaths {
    /// Base directory for credentials, settings and generated files
    base_dir: PathBuf,
}

impl ReportPaths {
    /// Create a new ReportPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn new() -> Result<Self, ReportError> {
        let base_dir = if let Ok(custom) = std::env::var(BASE_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            std::env::current_dir().map_err(|e| {
                ReportError::Config(format!("Could not determine current directory: {}", e))
            })?
        };

        Ok(Self { base_dir })
    }

    /// Create ReportPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the stored OAuth token
    pub fn token_file(&self) -> PathBuf {
        self.base_dir.join("token.json")
    }

    /// Get the path to the OAuth client secret descriptor
    pub fn client_secret_file(&self) -> PathBuf {
        self.base_dir.join("credentials.json")
    }

    /// Get the path of the category pie chart
    pub fn category_chart(&self) -> PathBuf {
        self.base_dir.join("chart.png")
    }

    /// Get the path of the date line chart
    pub fn date_chart(&self) -> PathBuf {
        self.base_dir.join("chart_2.png")
    }

    /// Get the path of the PDF report for a month and run date
    pub fn report_file(&self, month: &str, date: NaiveDate) -> PathBuf {
        self.base_dir.join(report_file_name(month, date))
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), ReportError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| ReportError::Io(format!("Failed to create base directory: {}", e)))
    }

    /// Check if a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// File name of the report, e.g. `February_2024-02-29.pdf`
pub fn report_file_name(month: &str, date: NaiveDate) -> String {
    format!("{}_{}.pdf", month, date.format("%Y-%m-%d"))
}
