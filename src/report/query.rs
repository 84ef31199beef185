//! Loads the records behind a month report and runs the aggregation over them.

use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error,
    category::{Category, CategoryKind, get_categories},
    category_budget::get_category_budgets,
    monthly_budget::{MonthlyBudget, YearMonth, get_monthly_budget, get_monthly_budgets},
    report::{
        CategoryRow, IncomeExpenseTotals, KindTotals, build_rows, income_expense_totals,
        kind_totals, sum_by_category,
    },
    transaction::{TransactionFilter, get_transactions},
};

/// The budget versus actual report for one monthly budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthReport {
    pub monthly_budget: MonthlyBudget,
    /// One row per income category, ordered by name.
    pub income_rows: Vec<CategoryRow>,
    /// One row per expense category, ordered by name.
    pub expense_rows: Vec<CategoryRow>,
    pub income_totals: KindTotals,
    pub expense_totals: KindTotals,
    /// The sum of all income transactions dated in the month, budgeted or not.
    pub month_income: i64,
    /// The sum of all expense transactions dated in the month, budgeted or not.
    pub month_expense: i64,
    pub month_balance: i64,
}

/// A monthly budget with the income, expense and balance of its month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub monthly_budget: MonthlyBudget,
    #[serde(flatten)]
    pub totals: IncomeExpenseTotals,
}

/// Build the report for the monthly budget of `period`.
///
/// Transactions are selected by date, from the first to the last day of the
/// month inclusive. Whether a transaction links to the monthly budget plays
/// no part.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if there is no monthly budget for `period`,
/// - [Error::AmountOverflow] if a total does not fit in an `i64`,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_month_report(period: YearMonth, connection: &Connection) -> Result<MonthReport, Error> {
    let monthly_budget = get_monthly_budget(period, connection)?;
    let categories = get_categories(None, connection)?;
    let (income_categories, expense_categories): (Vec<Category>, Vec<Category>) = categories
        .iter()
        .cloned()
        .partition(|category| category.kind == CategoryKind::Income);

    let transactions = get_transactions(
        TransactionFilter {
            kind: None,
            date_range: Some(period.date_range()),
        },
        connection,
    )?;
    let budgeted = get_category_budgets(monthly_budget.id, connection)?;
    let actual = sum_by_category(&transactions)?;

    let income_rows = build_rows(&income_categories, &budgeted, &actual);
    let expense_rows = build_rows(&expense_categories, &budgeted, &actual);
    let income_totals = kind_totals(CategoryKind::Income, &income_rows)?;
    let expense_totals = kind_totals(CategoryKind::Expense, &expense_rows)?;
    let month_totals = income_expense_totals(&categories, &transactions)?;

    Ok(MonthReport {
        monthly_budget,
        income_rows,
        expense_rows,
        income_totals,
        expense_totals,
        month_income: month_totals.income,
        month_expense: month_totals.expense,
        month_balance: month_totals.balance,
    })
}

/// Summarize every monthly budget, newest first.
pub fn get_monthly_summaries(connection: &Connection) -> Result<Vec<MonthlySummary>, Error> {
    let categories = get_categories(None, connection)?;

    get_monthly_budgets(connection)?
        .into_iter()
        .map(|monthly_budget| -> Result<MonthlySummary, Error> {
            let filter = TransactionFilter {
                kind: None,
                date_range: Some(monthly_budget.period()?.date_range()),
            };
            let transactions = get_transactions(filter, connection)?;

            Ok(MonthlySummary {
                monthly_budget,
                totals: income_expense_totals(&categories, &transactions)?,
            })
        })
        .collect()
}
