//! Report settings
//!
//! Everything that used to be a hard-coded constant (spreadsheet, month, tab
//! names, cell ranges, chart size) lives here and is persisted as JSON.

use serde::{Deserialize, Serialize};

use super::paths::ReportPaths;
use crate::error::ReportError;
use crate::sheets::A1Range;

/// Raster size of the generated charts, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 700,
            height: 450,
        }
    }
}

/// User settings for the report generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Schema version for migration support
    pub schema_version: u32,

    /// Identifier of the source spreadsheet
    pub spreadsheet_id: String,

    /// Month tab to report on; also used in the title and file name
    pub month: String,

    /// Tab holding the declared expense categories
    pub allowed_expenses_tab: String,

    /// Cells of the month tab holding expense rows
    pub expenses_cells: String,

    /// Cells of the categories tab holding category names
    pub categories_cells: String,

    /// Cells of the month tab holding the table header labels
    pub headers_cells: String,

    /// Label printed after every amount
    pub currency_label: String,

    /// Heading of the first page
    pub report_title: String,

    /// Chart raster size
    pub chart: ChartSettings,

    /// Base URL of the Sheets API
    pub sheets_api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: 1,
            spreadsheet_id: String::new(),
            month: "February".to_string(),
            allowed_expenses_tab: "Allowed expenses".to_string(),
            expenses_cells: "A3:D".to_string(),
            categories_cells: "A1:A9".to_string(),
            headers_cells: "A2:C2".to_string(),
            currency_label: "eur.".to_string(),
            report_title: "Monthly expenses report".to_string(),
            chart: ChartSettings::default(),
            sheets_api_url: "https://sheets.googleapis.com".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &ReportPaths) -> Result<Self, ReportError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                ReportError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                ReportError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ReportPaths) -> Result<(), ReportError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            ReportError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| ReportError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Apply one-off overrides from the command line
    pub fn with_overrides(mut self, month: Option<String>, spreadsheet_id: Option<String>) -> Self {
        if let Some(month) = month {
            self.month = month;
        }
        if let Some(id) = spreadsheet_id {
            self.spreadsheet_id = id;
        }
        self
    }

    /// Check that the settings are usable for a report run
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err(ReportError::Config(
                "spreadsheet_id is not set; edit config.json or pass --spreadsheet-id".into(),
            ));
        }
        if self.month.trim().is_empty() {
            return Err(ReportError::Config("month must not be empty".into()));
        }
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(ReportError::Config("chart size must be non-zero".into()));
        }
        Ok(())
    }

    /// Range of expense rows, e.g. `February!A3:D`
    pub fn expenses_range(&self) -> A1Range {
        A1Range::new(&self.month, &self.expenses_cells)
    }

    /// Range of declared categories, e.g. `'Allowed expenses'!A1:A9`
    pub fn categories_range(&self) -> A1Range {
        A1Range::new(&self.allowed_expenses_tab, &self.categories_cells)
    }

    /// Range of the table header labels, e.g. `February!A2:C2`
    pub fn headers_range(&self) -> A1Range {
        A1Range::new(&self.month, &self.headers_cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.month, "February");
        assert_eq!(settings.allowed_expenses_tab, "Allowed expenses");
        assert_eq!(settings.chart, ChartSettings { width: 700, height: 450 });
        assert_eq!(settings.currency_label, "eur.");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReportPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.spreadsheet_id = "sheet-123".into();
        settings.month = "March".into();

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReportPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"spreadsheet_id": "abc"}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.spreadsheet_id, "abc");
        assert_eq!(loaded.month, "February");
        assert_eq!(loaded.expenses_cells, "A3:D");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReportPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "not json").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }

    #[test]
    fn test_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_err());

        let settings = settings.with_overrides(Some("March".into()), Some("id".into()));
        assert!(settings.validate().is_ok());
        assert_eq!(settings.month, "March");
    }

    #[test]
    fn test_ranges() {
        let settings = Settings::default();
        assert_eq!(settings.expenses_range().to_string(), "February!A3:D");
        assert_eq!(
            settings.categories_range().to_string(),
            "'Allowed expenses'!A1:A9"
        );
        assert_eq!(settings.headers_range().to_string(), "February!A2:C2");
    }
}
