//! Monthly expenses report
//!
//! Pulls one month of expenses from the spreadsheet, aggregates them and
//! renders the two-page PDF. Every range is fetched and both aggregations
//! are computed in [`MonthlyReport::generate`], so a data error never
//! leaves half-written charts behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{info, warn};

use super::aggregate::{aggregate_by_category, aggregate_by_date, total_spent};
use crate::charts::{render_category_chart, render_date_chart};
use crate::config::{ReportPaths, Settings};
use crate::display::{
    double_separator, format_bar, format_header, format_percentage, percentage_of, separator,
    truncate,
};
use crate::error::ReportResult;
use crate::models::{
    parse_expense_rows, CategoryList, CategoryTotals, ColumnMapping, DateTotals, ExpenseRow, Money,
};
use crate::pdf::ReportBuilder;
use crate::sheets::SheetSource;

/// Headings used when the header range of the month tab is empty
pub const DEFAULT_HEADINGS: [&str; 3] = ["Date", "Amount", "Category"];

const CATEGORY_HEADINGS: [&str; 2] = ["Category", "Expense amount"];
const WIDTH: usize = 64;
const BAR_WIDTH: usize = 16;

/// Aggregated expenses of one month
#[derive(Debug, Clone)]
pub struct MonthlyReport {
    pub month: String,
    pub currency_label: String,
    /// Labels of the per-row table
    pub headings: Vec<String>,
    pub rows: Vec<ExpenseRow>,
    pub by_category: CategoryTotals,
    pub by_date: DateTotals,
    /// Sum of every row, rounded to cents
    pub total: Money,
}

impl MonthlyReport {
    /// Fetch the month's expenses, categories and headings, then aggregate
    pub fn generate(source: &dyn SheetSource, settings: &Settings) -> ReportResult<Self> {
        let expense_cells = source.fetch_range(&settings.expenses_range())?;
        let category_cells = source.fetch_range(&settings.categories_range())?;
        let header_cells = source.fetch_range(&settings.headers_range())?;
        info!(
            "Fetched {} expense rows for {}",
            expense_cells.len(),
            settings.month
        );

        let rows = parse_expense_rows(&expense_cells, &ColumnMapping::default());
        let categories = CategoryList::from_rows(&category_cells);
        let headings = headings_from(header_cells);

        let by_category = aggregate_by_category(&rows, &categories)?;
        let by_date = aggregate_by_date(&rows)?;
        let total = total_spent(&rows)?;
        info!(
            "Aggregated {} categories and {} dates, total {}",
            by_category.len(),
            by_date.len(),
            total.format_compact()
        );

        Ok(Self {
            month: settings.month.clone(),
            currency_label: settings.currency_label.clone(),
            headings,
            rows,
            by_category,
            by_date,
            total,
        })
    }

    /// `({Month}, totally spent: {total} {currency})`
    pub fn subtitle(&self) -> String {
        format!(
            "({}, totally spent: {})",
            self.month,
            self.total.format_with_label(&self.currency_label)
        )
    }

    /// Rows of the category table: name and labelled total
    pub fn category_table_rows(&self) -> Vec<Vec<String>> {
        self.by_category
            .iter()
            .map(|(name, amount)| {
                vec![
                    name.to_string(),
                    amount.format_with_label(&self.currency_label),
                ]
            })
            .collect()
    }

    /// Rows of the expense table, one cell per heading
    ///
    /// Amounts are printed as written in the sheet. Headings beyond the
    /// known columns get empty cells.
    pub fn expense_table_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                let known = [
                    row.date.clone(),
                    format!("{} {}", row.raw_amount, self.currency_label),
                    row.category.clone(),
                    row.note.clone().unwrap_or_default(),
                ];
                (0..self.headings.len())
                    .map(|i| known.get(i).cloned().unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    /// Render both charts and the PDF; returns the report path
    pub fn render_pdf(
        &self,
        paths: &ReportPaths,
        settings: &Settings,
        today: NaiveDate,
    ) -> ReportResult<PathBuf> {
        paths.ensure_directories()?;

        let category_chart =
            render_category_chart(&self.by_category, &paths.category_chart(), settings.chart)?;
        let date_chart = render_date_chart(
            &self.by_date,
            &paths.date_chart(),
            settings.chart,
            &self.currency_label,
        )?;

        self.build_pdf(
            &settings.report_title,
            &category_chart,
            &date_chart,
            &paths.report_file(&self.month, today),
        )
    }

    /// Lay out both pages around existing chart images and write `output`
    pub fn build_pdf(
        &self,
        title: &str,
        category_chart: &Path,
        date_chart: &Path,
        output: &Path,
    ) -> ReportResult<PathBuf> {
        let mut pdf = ReportBuilder::new();

        pdf.add_page();
        pdf.set_title(title);
        pdf.set_subtitle(&self.subtitle());
        pdf.add_paragraph("Expenses by category:");
        pdf.add_chart(category_chart)?;
        pdf.add_table(&CATEGORY_HEADINGS, &self.category_table_rows())?;

        pdf.add_page();
        pdf.add_paragraph("Expenses by date:");
        pdf.add_chart(date_chart)?;
        pdf.ln(10.0);
        let stats = pdf.add_table(&self.headings, &self.expense_table_rows())?;
        info!("Expense table has {} rows", stats.rows);

        pdf.output(output)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        let label = &self.currency_label;

        output.push_str(&format_header(
            &format!("Expenses report: {}", self.month),
            WIDTH,
        ));
        output.push('\n');
        output.push_str(&double_separator(WIDTH));
        output.push('\n');
        output.push_str(&format!(
            "Total spent: {}\n",
            self.total.format_with_label(label)
        ));
        output.push_str(&format!("Expense rows: {}\n\n", self.rows.len()));

        output.push_str(&format!("{:<22} {:>14} {:>7}\n", "Category", "Amount", "%"));
        output.push_str(&separator(WIDTH));
        output.push('\n');

        let category_sum = self.by_category.total().unwrap_or(self.total);
        let max = self
            .by_category
            .iter()
            .map(|(_, amount)| amount.to_f64())
            .fold(0.0_f64, f64::max);
        for (name, amount) in self.by_category.iter() {
            output.push_str(&format!(
                "{:<22} {:>14} {:>7}  {}\n",
                truncate(name, 22),
                amount.format_with_label(label),
                format_percentage(percentage_of(amount, category_sum)),
                format_bar(amount.to_f64(), max, BAR_WIDTH)
            ));
        }

        output.push('\n');
        output.push_str(&format!("{:<22} {:>14}\n", "Date", "Amount"));
        output.push_str(&separator(WIDTH));
        output.push('\n');
        for (date, amount) in self.by_date.iter() {
            output.push_str(&format!(
                "{:<22} {:>14}\n",
                truncate(date, 22),
                amount.format_with_label(label)
            ));
        }

        output
    }

    /// Export the aggregates to CSV
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> ReportResult<()> {
        writeln!(writer, "Month,Section,Key,Amount")?;

        for (name, amount) in self.by_category.iter() {
            writeln!(
                writer,
                "{},category,{},{}",
                csv_field(&self.month),
                csv_field(name),
                amount
            )?;
        }
        for (date, amount) in self.by_date.iter() {
            writeln!(
                writer,
                "{},date,{},{}",
                csv_field(&self.month),
                csv_field(date),
                amount
            )?;
        }
        writeln!(writer, "{},total,,{}", csv_field(&self.month), self.total)?;

        Ok(())
    }
}

fn headings_from(header_cells: Vec<Vec<String>>) -> Vec<String> {
    match header_cells.into_iter().next() {
        Some(row) if !row.is_empty() => row,
        _ => {
            warn!(
                "Header range is empty, using {}",
                DEFAULT_HEADINGS.join(" / ")
            );
            DEFAULT_HEADINGS.iter().map(|h| h.to_string()).collect()
        }
    }
}

/// Quote a CSV field when it contains a separator, quote or newline
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
