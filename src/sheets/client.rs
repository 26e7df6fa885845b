//! Blocking client for the Sheets API v4 `values.get` endpoint

use log::debug;
use reqwest::blocking::Client;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use super::range::A1Range;
use super::SheetSource;
use crate::error::{ReportError, ReportResult};

/// Response body of `spreadsheets.values.get`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default)]
    range: String,
    /// Absent when the requested range holds no data
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Error body returned by Google APIs
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Read-only access to one spreadsheet
pub struct SheetsClient {
    http: Client,
    base_url: String,
    spreadsheet_id: String,
    access_token: String,
}

impl SheetsClient {
    /// Create a client for `spreadsheet_id` authorized by `access_token`
    pub fn new(
        base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> ReportResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("expense-report/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
            access_token: access_token.into(),
        })
    }

    /// URL of the values endpoint for a range
    pub fn values_url(&self, range: &A1Range) -> ReportResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ReportError::Config(format!("Invalid Sheets API URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| ReportError::Config("Sheets API URL cannot be a base".into()))?
            .pop_if_empty()
            .push("v4")
            .push("spreadsheets")
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&range.to_string());

        Ok(url)
    }
}

impl SheetSource for SheetsClient {
    fn fetch_range(&self, range: &A1Range) -> ReportResult<Vec<Vec<String>>> {
        let url = self.values_url(range)?;
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ReportError::Sheets {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let body: ValueRange = response.json()?;
        debug!("Fetched {} rows from {}", body.values.len(), body.range);
        Ok(rows_to_strings(body.values))
    }
}

/// Extract the human-readable message of an API error body
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

/// Formatted values arrive as strings; anything else is stringified
fn rows_to_strings(rows: Vec<Vec<Value>>) -> Vec<Vec<String>> {
    rows.into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| match cell {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}
