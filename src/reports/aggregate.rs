//! Expense aggregation
//!
//! Reduces expense rows into per-category and per-date totals. Both functions
//! are pure: sums do not depend on row order, but the output keeps the
//! declared category order and the first-seen date order.

use crate::error::{ReportError, ReportResult};
use crate::models::{AddError, CategoryList, CategoryTotals, DateTotals, ExpenseRow, Money};

/// Total spent per declared category
///
/// Every declared category appears, even with no expenses. Blank amounts
/// count as zero. Totals are rounded to cents once all rows are summed.
///
/// # Errors
///
/// Fails if a row's amount is not a number, its category is not declared,
/// or a category total overflows.
pub fn aggregate_by_category(
    rows: &[ExpenseRow],
    categories: &CategoryList,
) -> ReportResult<CategoryTotals> {
    let mut totals = CategoryTotals::new();
    for name in categories.iter() {
        totals.seed(name);
    }

    for row in rows {
        let amount = row.amount()?.unwrap_or_else(Money::zero);
        totals
            .add_existing(&row.category, amount)
            .map_err(|e| match e {
                AddError::UnknownKey => ReportError::category_not_found(&row.category),
                AddError::Overflow => row.invalid_amount(),
            })?;
    }

    totals.round_cents();
    Ok(totals)
}

/// Total spent per date, unrounded
///
/// # Errors
///
/// Fails if a row's amount is blank, not a number, or overflows its date total.
pub fn aggregate_by_date(rows: &[ExpenseRow]) -> ReportResult<DateTotals> {
    let mut totals = DateTotals::new();
    for row in rows {
        totals
            .add(&row.date, row.required_amount()?)
            .map_err(|_| row.invalid_amount())?;
    }
    Ok(totals)
}

/// Sum of all row amounts rounded to cents
///
/// # Errors
///
/// Fails if a row's amount is blank, not a number, or overflows the total.
pub fn total_spent(rows: &[ExpenseRow]) -> ReportResult<Money> {
    let mut total = Money::zero();
    for row in rows {
        total = total
            .checked_add(row.required_amount()?)
            .ok_or_else(|| row.invalid_amount())?;
    }
    Ok(total.round_cents())
}
