//! Planned amounts per category within a monthly budget.

mod core;
mod upsert;

pub use core::{
    CategoryBudget, count_category_budgets, create_category_budget_table, get_budgeted_amount,
    get_category_budgets, map_category_budget_row, upsert_category_budget,
};
pub use upsert::upsert_category_budget_endpoint;
