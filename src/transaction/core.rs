//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row, ffi::SQLITE_CONSTRAINT_FOREIGNKEY};
use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    amount::{MAX_AMOUNT, validate_amount},
    category::{CategoryKind, get_category},
    database_id::{CategoryId, MonthlyBudgetId, TransactionId},
    error::is_constraint_violation,
    monthly_budget::{DateRange, get_monthly_budget_by_id},
};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Whether a transaction is income or expense is decided by its category.
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money in whole currency units, never negative.
    pub amount: i64,
    /// When the transaction happened.
    pub date: Date,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
    /// The monthly budget the transaction was entered against, if any.
    ///
    /// Reports select transactions by date, this link only decides whether
    /// the monthly budget can be deleted.
    pub monthly_budget_id: Option<MonthlyBudgetId>,
    /// When the transaction was recorded.
    pub created_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        amount: i64,
        date: Date,
        description: &str,
        category_id: CategoryId,
    ) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            date,
            description: description.to_owned(),
            category_id,
            monthly_budget_id: None,
            kind: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::transaction::{Transaction, create_transaction};
///
/// let transaction = Transaction::build(45000, date!(2025 - 01 - 15), "Coffee beans", food.id)
///     .monthly_budget_id(Some(january.id))
///     .kind(Some(CategoryKind::Expense));
/// create_transaction(transaction, &connection)?;
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The amount in whole currency units. Must not be negative.
    pub amount: i64,

    /// The date when the transaction occurred.
    ///
    /// If the transaction is linked to a monthly budget, the date must fall
    /// within that budget's month.
    pub date: Date,

    /// A human-readable description of the transaction.
    pub description: String,

    /// The category the transaction belongs to.
    pub category_id: CategoryId,

    /// The monthly budget the transaction is entered against.
    pub monthly_budget_id: Option<MonthlyBudgetId>,

    /// The kind the transaction was submitted as, e.g. from an "add expense"
    /// form. When set, the category must be of this kind.
    pub kind: Option<CategoryKind>,
}

impl TransactionBuilder {
    /// Set the monthly budget for the transaction.
    pub fn monthly_budget_id(mut self, monthly_budget_id: Option<MonthlyBudgetId>) -> Self {
        self.monthly_budget_id = monthly_budget_id;
        self
    }

    /// Set the kind the transaction must match.
    pub fn kind(mut self, kind: Option<CategoryKind>) -> Self {
        self.kind = kind;
        self
    }
}

/// The fields of a transaction that can be changed after it is created.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionUpdate {
    pub amount: i64,
    pub date: Date,
    pub description: String,
    pub category_id: CategoryId,
}

/// Filters for listing transactions.
#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct TransactionFilter {
    /// Only include transactions whose category has this kind.
    pub kind: Option<CategoryKind>,
    /// Only include transactions dated within this range.
    pub date_range: Option<DateRange>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// Every check runs before the insert, so a rejected transaction leaves no
/// trace in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if the amount is below zero,
/// - [Error::AmountTooLarge] if the amount is above [MAX_AMOUNT],
/// - [Error::InvalidCategory] if the category ID does not refer to a category,
/// - [Error::CategoryKindMismatch] if a kind was given and the category is of the other kind,
/// - [Error::InvalidMonthlyBudget] if the monthly budget ID does not refer to a monthly budget,
/// - [Error::DateOutsideMonth] if the date is not in the linked monthly budget's month,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate_amount(builder.amount)?;

    let category = get_category(builder.category_id, connection).map_err(|error| match error {
        // A 'not found' error does not make sense on an insert, the foreign key is invalid.
        Error::NotFound => Error::InvalidCategory(builder.category_id),
        error => error,
    })?;

    if let Some(expected) = builder.kind {
        if expected != category.kind {
            return Err(Error::CategoryKindMismatch {
                expected,
                actual: category.kind,
            });
        }
    }

    if let Some(monthly_budget_id) = builder.monthly_budget_id {
        let monthly_budget = get_monthly_budget_by_id(monthly_budget_id, connection).map_err(
            |error| match error {
                Error::NotFound => Error::InvalidMonthlyBudget(monthly_budget_id),
                error => error,
            },
        )?;

        if !monthly_budget.period()?.contains(builder.date) {
            return Err(Error::DateOutsideMonth {
                date: builder.date,
                year: monthly_budget.year,
                month: monthly_budget.month,
            });
        }
    }

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (description, amount, date, category_id, monthly_budget_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, description, amount, date, category_id, monthly_budget_id, created_at",
        )?
        .query_row(
            (
                builder.description,
                builder.amount,
                builder.date,
                builder.category_id,
                builder.monthly_budget_id,
                OffsetDateTime::now_utc(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, description, amount, date, category_id, monthly_budget_id, created_at
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve the transactions matching `filter`, newest first.
///
/// A date range selects transactions by their date only; whether they are
/// linked to a monthly budget makes no difference.
pub fn get_transactions(
    filter: TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let start = filter.date_range.map(|range| range.start);
    let end = filter.date_range.map(|range| range.end);

    connection
        .prepare(
            "SELECT t.id, t.description, t.amount, t.date, t.category_id, t.monthly_budget_id, t.created_at
             FROM \"transaction\" t
             INNER JOIN category c ON c.id = t.category_id
             WHERE (?1 IS NULL OR c.kind = ?1)
               AND (?2 IS NULL OR t.date >= ?2)
               AND (?3 IS NULL OR t.date <= ?3)
             ORDER BY t.date DESC, t.created_at DESC, t.id DESC",
        )?
        .query_map((filter.kind, start, end), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Update the amount, date, description and category of a transaction.
///
/// The link to a monthly budget cannot be changed, and the date is not
/// checked against the linked monthly budget's month again.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if the amount is below zero,
/// - [Error::AmountTooLarge] if the amount is above [MAX_AMOUNT],
/// - [Error::InvalidCategory] if the category ID does not refer to a category,
/// - [Error::UpdateMissingTransaction] if the transaction does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    update: TransactionUpdate,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate_amount(update.amount)?;

    let category_id = update.category_id;

    connection
        .prepare(
            "UPDATE \"transaction\" SET description = ?1, amount = ?2, date = ?3, category_id = ?4
             WHERE id = ?5
             RETURNING id, description, amount, date, category_id, monthly_budget_id, created_at",
        )?
        .query_row(
            (
                update.description,
                update.amount,
                update.date,
                update.category_id,
                id,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error if is_constraint_violation(&error, SQLITE_CONSTRAINT_FOREIGNKEY) => {
                Error::InvalidCategory(category_id)
            }
            error => error.into(),
        })
}

/// Delete a transaction. Nothing else is deleted with it.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if the transaction does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                amount INTEGER NOT NULL CHECK (amount BETWEEN 0 AND {MAX_AMOUNT}),
                date TEXT NOT NULL,
                category_id INTEGER NOT NULL,
                monthly_budget_id INTEGER,
                created_at TEXT NOT NULL,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT,
                FOREIGN KEY(monthly_budget_id) REFERENCES monthly_budget(id) ON UPDATE CASCADE ON DELETE RESTRICT
                )"
        ),
        (),
    )?;

    // Used by the month report and the transaction list.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_category ON \"transaction\"(date, category_id);",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_monthly_budget ON \"transaction\"(monthly_budget_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let description = row.get(1)?;
    let amount = row.get(2)?;
    let date = row.get(3)?;
    let category_id = row.get(4)?;
    let monthly_budget_id = row.get(5)?;
    let created_at = row.get(6)?;

    Ok(Transaction {
        id,
        description,
        amount,
        date,
        category_id,
        monthly_budget_id,
        created_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================
