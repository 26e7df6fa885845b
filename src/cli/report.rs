//! CLI commands for the monthly report
//!
//! Bridges clap arguments to the credential provider, the Sheets client
//! and [`MonthlyReport`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::Args;
use log::info;

use crate::auth::CredentialProvider;
use crate::config::{ReportPaths, Settings};
use crate::error::ReportResult;
use crate::reports::MonthlyReport;
use crate::sheets::SheetsClient;

/// Per-run overrides of the stored settings
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Month tab to report on (e.g. "February")
    #[arg(short, long)]
    pub month: Option<String>,

    /// Spreadsheet to read from
    #[arg(short, long)]
    pub spreadsheet_id: Option<String>,
}

impl ReportArgs {
    /// Stored settings with these overrides applied, validated for a run
    fn resolve(self, settings: &Settings) -> ReportResult<Settings> {
        let settings = settings
            .clone()
            .with_overrides(self.month, self.spreadsheet_id);
        settings.validate()?;
        Ok(settings)
    }
}

/// Authorize, fetch and aggregate the month
fn load_report(paths: &ReportPaths, settings: &Settings) -> ReportResult<MonthlyReport> {
    let token = CredentialProvider::new(paths)?.access_token()?;
    let client = SheetsClient::new(&settings.sheets_api_url, &settings.spreadsheet_id, token)?;
    MonthlyReport::generate(&client, settings)
}

/// Generate the PDF report, optionally exporting the aggregates as CSV
pub fn handle_generate(
    paths: &ReportPaths,
    settings: &Settings,
    args: ReportArgs,
    csv: Option<PathBuf>,
) -> ReportResult<PathBuf> {
    let settings = args.resolve(settings)?;
    let report = load_report(paths, &settings)?;

    let today: NaiveDate = Local::now().date_naive();
    let pdf_path = report.render_pdf(paths, &settings, today)?;
    println!("Report written to {}", pdf_path.display());

    if let Some(csv_path) = csv {
        write_csv(&report, &csv_path)?;
        println!("Exported to: {}", csv_path.display());
    }

    Ok(pdf_path)
}

/// Print the aggregates without writing any file
pub fn handle_summary(
    paths: &ReportPaths,
    settings: &Settings,
    args: ReportArgs,
) -> ReportResult<()> {
    let settings = args.resolve(settings)?;
    let report = load_report(paths, &settings)?;
    print!("{}", report.format_terminal());
    Ok(())
}

/// Obtain and store a token without fetching anything
pub fn handle_auth(paths: &ReportPaths) -> ReportResult<()> {
    CredentialProvider::new(paths)?.access_token()?;
    println!("Credentials stored in {}", paths.token_file().display());
    Ok(())
}

/// Write the settings file unless one already exists
pub fn handle_init(paths: &ReportPaths, settings: &Settings) -> ReportResult<()> {
    if paths.is_initialized() {
        println!(
            "Settings already exist at {}",
            paths.settings_file().display()
        );
        return Ok(());
    }

    settings.save(paths)?;
    info!("Wrote default settings to {}", paths.settings_file().display());
    println!("Initialized expense report at: {}", paths.base_dir().display());
    println!();
    println!("Next steps:");
    println!("  1. Set \"spreadsheet_id\" in {}", paths.settings_file().display());
    println!(
        "  2. Place your OAuth client file at {}",
        paths.client_secret_file().display()
    );
    println!("  3. Run 'expense-report auth', then 'expense-report generate'");
    Ok(())
}

/// Print paths and the effective settings
pub fn handle_config(paths: &ReportPaths, settings: &Settings) -> ReportResult<()> {
    println!("Expense Report Configuration");
    println!("============================");
    println!("Base directory:     {}", paths.base_dir().display());
    println!("Settings file:      {}", paths.settings_file().display());
    println!("Token file:         {}", paths.token_file().display());
    println!("Client secret file: {}", paths.client_secret_file().display());
    println!();
    println!("Settings:");
    let spreadsheet = if settings.spreadsheet_id.is_empty() {
        "(not set)"
    } else {
        settings.spreadsheet_id.as_str()
    };
    println!("  Spreadsheet id:  {}", spreadsheet);
    println!("  Month:           {}", settings.month);
    println!("  Expenses range:  {}", settings.expenses_range());
    println!("  Category range:  {}", settings.categories_range());
    println!("  Headers range:   {}", settings.headers_range());
    println!("  Currency label:  {}", settings.currency_label);
    println!(
        "  Chart size:      {}x{}",
        settings.chart.width, settings.chart.height
    );
    Ok(())
}

fn write_csv(report: &MonthlyReport, path: &Path) -> ReportResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    report.export_csv(&mut writer)?;
    writer.flush()?;
    Ok(())
}
