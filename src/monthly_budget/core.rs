//! Defines the monthly budget model and its database queries.

use rusqlite::{
    Connection, Row,
    ffi::{SQLITE_CONSTRAINT_FOREIGNKEY, SQLITE_CONSTRAINT_UNIQUE},
};
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    Error, database_id::MonthlyBudgetId, error::is_constraint_violation,
    monthly_budget::YearMonth,
};

/// The anchor record for one budgeting period.
///
/// There is at most one monthly budget per (year, month). Category budgets
/// belong to it and are deleted along with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBudget {
    /// The ID of the monthly budget.
    pub id: MonthlyBudgetId,
    /// The calendar year of the period.
    pub year: i32,
    /// The month of the period, 1 to 12.
    pub month: u8,
    /// When the period was created.
    pub created_at: OffsetDateTime,
    /// When the period or one of its category budgets last changed.
    pub updated_at: OffsetDateTime,
}

impl MonthlyBudget {
    /// The (year, month) key of this period.
    ///
    /// # Errors
    /// Returns an error if the stored year or month is out of range, which the
    /// table constraints prevent.
    pub fn period(&self) -> Result<YearMonth, Error> {
        YearMonth::new(self.year.into(), self.month.into())
    }
}

/// Create the monthly budget for `period`.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateMonthlyBudget] if a monthly budget for `period` already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_monthly_budget(
    period: YearMonth,
    connection: &Connection,
) -> Result<MonthlyBudget, Error> {
    let now = OffsetDateTime::now_utc();

    connection
        .prepare(
            "INSERT INTO monthly_budget (year, month, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             RETURNING id, year, month, created_at, updated_at",
        )?
        .query_row((period.year(), period.month(), now), map_monthly_budget_row)
        .map_err(|error| {
            // The uniqueness check happens in the insert itself, so two
            // concurrent requests for the same month cannot both succeed.
            if is_constraint_violation(&error, SQLITE_CONSTRAINT_UNIQUE) {
                Error::DuplicateMonthlyBudget {
                    year: period.year(),
                    month: period.month(),
                }
            } else {
                error.into()
            }
        })
}

/// Retrieve the monthly budget for `period`.
///
/// # Errors
/// Returns [Error::NotFound] if no monthly budget exists for `period`.
pub fn get_monthly_budget(
    period: YearMonth,
    connection: &Connection,
) -> Result<MonthlyBudget, Error> {
    connection
        .prepare(
            "SELECT id, year, month, created_at, updated_at FROM monthly_budget
             WHERE year = ?1 AND month = ?2",
        )?
        .query_row((period.year(), period.month()), map_monthly_budget_row)
        .map_err(|error| error.into())
}

/// Retrieve a monthly budget by its ID.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a monthly budget.
pub fn get_monthly_budget_by_id(
    id: MonthlyBudgetId,
    connection: &Connection,
) -> Result<MonthlyBudget, Error> {
    connection
        .prepare(
            "SELECT id, year, month, created_at, updated_at FROM monthly_budget WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_monthly_budget_row)
        .map_err(|error| error.into())
}

/// Retrieve all monthly budgets, newest period first.
pub fn get_monthly_budgets(connection: &Connection) -> Result<Vec<MonthlyBudget>, Error> {
    connection
        .prepare(
            "SELECT id, year, month, created_at, updated_at FROM monthly_budget
             ORDER BY year DESC, month DESC",
        )?
        .query_map([], map_monthly_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
        .collect()
}

/// Mark the monthly budget as changed now.
pub fn touch_monthly_budget(id: MonthlyBudgetId, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "UPDATE monthly_budget SET updated_at = ?1 WHERE id = ?2",
        (OffsetDateTime::now_utc(), id),
    )?;

    Ok(())
}

/// Delete a monthly budget and its category budgets.
///
/// Only transactions that link to the monthly budget by ID block the delete.
/// Transactions that merely fall within the same calendar month do not.
///
/// # Errors
/// This function will return a:
/// - [Error::MonthlyBudgetInUse] if a transaction is linked to the monthly budget,
/// - [Error::DeleteMissingMonthlyBudget] if the monthly budget does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_monthly_budget(id: MonthlyBudgetId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection
        .execute("DELETE FROM monthly_budget WHERE id = ?1", [id])
        .map_err(|error| {
            if is_constraint_violation(&error, SQLITE_CONSTRAINT_FOREIGNKEY) {
                Error::MonthlyBudgetInUse(id)
            } else {
                error.into()
            }
        })?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingMonthlyBudget);
    }

    Ok(())
}

/// Create the monthly budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_monthly_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS monthly_budget (
                id INTEGER PRIMARY KEY,
                year INTEGER NOT NULL CHECK (year BETWEEN 1 AND 9999),
                month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(year, month)
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [MonthlyBudget].
pub fn map_monthly_budget_row(row: &Row) -> Result<MonthlyBudget, rusqlite::Error> {
    let id = row.get(0)?;
    let year = row.get(1)?;
    let month = row.get(2)?;
    let created_at = row.get(3)?;
    let updated_at = row.get(4)?;

    Ok(MonthlyBudget {
        id,
        year,
        month,
        created_at,
        updated_at,
    })
}
