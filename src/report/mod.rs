//! Month reports: budgeted versus actual per category, plus the month's income and expense.

mod aggregation;
mod query;
mod view;

pub use aggregation::{
    CategoryRow, IncomeExpenseTotals, KindTotals, build_rows, difference, income_expense_totals,
    kind_totals, sum_by_category,
};
pub use query::{MonthReport, MonthlySummary, get_month_report, get_monthly_summaries};
pub use view::get_month_report_endpoint;
