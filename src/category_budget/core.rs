//! Defines the category budget model and its database queries.

use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension, Row};
use serde::Serialize;

use crate::{
    Error,
    amount::{MAX_AMOUNT, validate_amount},
    category::get_category,
    database_id::{CategoryBudgetId, CategoryId, MonthlyBudgetId},
    monthly_budget::{get_monthly_budget_by_id, touch_monthly_budget},
};

/// The amount planned for one category in one monthly budget.
///
/// A category without a category budget counts as budgeted at zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBudget {
    pub id: CategoryBudgetId,
    pub monthly_budget_id: MonthlyBudgetId,
    pub category_id: CategoryId,
    /// The planned amount in whole currency units, never negative.
    pub budgeted_amount: i64,
}

/// Set the budgeted amount for a category in a monthly budget, creating the
/// category budget if it does not exist yet.
///
/// Calling this again for the same monthly budget and category replaces the
/// amount. Concurrent calls for the same pair are resolved by last write wins.
///
/// The category budget is written and the monthly budget's `updated_at` is
/// touched in one SQL transaction, so either both change or neither does.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if `budgeted_amount` is below zero,
/// - [Error::AmountTooLarge] if `budgeted_amount` is above [MAX_AMOUNT],
/// - [Error::InvalidMonthlyBudget] if the monthly budget does not exist,
/// - [Error::InvalidCategory] if the category does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn upsert_category_budget(
    monthly_budget_id: MonthlyBudgetId,
    category_id: CategoryId,
    budgeted_amount: i64,
    connection: &Connection,
) -> Result<CategoryBudget, Error> {
    validate_amount(budgeted_amount)?;

    get_monthly_budget_by_id(monthly_budget_id, connection).map_err(|error| match error {
        Error::NotFound => Error::InvalidMonthlyBudget(monthly_budget_id),
        error => error,
    })?;
    get_category(category_id, connection).map_err(|error| match error {
        Error::NotFound => Error::InvalidCategory(category_id),
        error => error,
    })?;

    let sql_transaction = connection.unchecked_transaction()?;

    let category_budget = sql_transaction
        .prepare(
            "INSERT INTO category_budget (monthly_budget_id, category_id, budgeted_amount)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(monthly_budget_id, category_id)
             DO UPDATE SET budgeted_amount = excluded.budgeted_amount
             RETURNING id, monthly_budget_id, category_id, budgeted_amount",
        )?
        .query_row(
            (monthly_budget_id, category_id, budgeted_amount),
            map_category_budget_row,
        )?;

    touch_monthly_budget(monthly_budget_id, &sql_transaction)?;

    sql_transaction.commit()?;

    Ok(category_budget)
}

/// Get the budgeted amount for a category in a monthly budget, zero if none was set.
pub fn get_budgeted_amount(
    monthly_budget_id: MonthlyBudgetId,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<i64, Error> {
    let amount = connection
        .query_row(
            "SELECT budgeted_amount FROM category_budget
             WHERE monthly_budget_id = ?1 AND category_id = ?2",
            (monthly_budget_id, category_id),
            |row| row.get(0),
        )
        .optional()?;

    Ok(amount.unwrap_or(0))
}

/// Get the budgeted amounts of a monthly budget keyed by category ID.
///
/// Categories without a category budget are absent from the map.
pub fn get_category_budgets(
    monthly_budget_id: MonthlyBudgetId,
    connection: &Connection,
) -> Result<HashMap<CategoryId, i64>, Error> {
    connection
        .prepare(
            "SELECT category_id, budgeted_amount FROM category_budget
             WHERE monthly_budget_id = ?1",
        )?
        .query_map([monthly_budget_id], |row| Ok((row.get(0)?, row.get(1)?)))?
        .map(|maybe_pair| maybe_pair.map_err(|error| error.into()))
        .collect()
}

/// Get the total number of category budgets in the database.
pub fn count_category_budgets(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM category_budget;", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the category budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_category_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS category_budget (
                id INTEGER PRIMARY KEY,
                monthly_budget_id INTEGER NOT NULL,
                category_id INTEGER NOT NULL,
                budgeted_amount INTEGER NOT NULL CHECK (budgeted_amount BETWEEN 0 AND {MAX_AMOUNT}),
                UNIQUE(monthly_budget_id, category_id),
                FOREIGN KEY(monthly_budget_id) REFERENCES monthly_budget(id) ON UPDATE CASCADE ON DELETE CASCADE,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
                )"
        ),
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_category_budget_category ON category_budget(category_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [CategoryBudget].
pub fn map_category_budget_row(row: &Row) -> Result<CategoryBudget, rusqlite::Error> {
    Ok(CategoryBudget {
        id: row.get(0)?,
        monthly_budget_id: row.get(1)?,
        category_id: row.get(2)?,
        budgeted_amount: row.get(3)?,
    })
}
