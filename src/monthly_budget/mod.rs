//! Monthly budget periods: the (year, month) anchors for planned and actual amounts.

mod core;
mod create;
mod delete;
mod list;
mod period;

pub use core::{
    MonthlyBudget, create_monthly_budget, create_monthly_budget_table, delete_monthly_budget,
    get_monthly_budget, get_monthly_budget_by_id, get_monthly_budgets, map_monthly_budget_row,
    touch_monthly_budget,
};
pub use create::create_monthly_budget_endpoint;
pub use delete::delete_monthly_budget_endpoint;
pub use list::get_monthly_budgets_endpoint;
pub use period::{DateRange, YearMonth};
