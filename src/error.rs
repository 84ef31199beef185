//! Defines the app level error type and its conversion into HTTP responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use time::Date;

use crate::{
    category::CategoryKind,
    database_id::{CategoryId, MonthlyBudgetId},
};

/// The broad classes of failure that callers need to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request carried a value that breaks a domain rule.
    Validation,
    /// The record already exists under a key that must be unique.
    DuplicateKey,
    /// The operation is blocked by a record that still refers to the target.
    ReferenceConflict,
    /// The requested record does not exist.
    NotFound,
    /// Something went wrong that the client cannot fix.
    Internal,
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction or budget amount was below zero.
    #[error("amount {0} is negative, amounts must be zero or greater")]
    NegativeAmount(i64),

    /// A transaction or budget amount was above the largest accepted amount.
    #[error(
        "amount {0} is too large, amounts must be at most {max}",
        max = crate::amount::MAX_AMOUNT
    )]
    AmountTooLarge(i64),

    /// A total of amounts did not fit in a 64-bit integer.
    #[error("the total of the amounts is too large to calculate")]
    AmountOverflow,

    /// A transaction linked to a monthly budget had a date in another month.
    #[error("{date} is not in {year}-{month:02}")]
    DateOutsideMonth {
        /// The date of the rejected transaction.
        date: Date,
        /// The year of the monthly budget.
        year: i32,
        /// The month of the monthly budget.
        month: u8,
    },

    /// A month number outside of 1 to 12.
    #[error("{0} is not a valid month, months must be between 1 and 12")]
    InvalidMonth(i64),

    /// A year that cannot be represented as a calendar date.
    #[error("{0} is not a valid year")]
    InvalidYear(i64),

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// A category kind other than "income" or "expense".
    #[error("\"{0}\" is not a valid category kind, expected \"income\" or \"expense\"")]
    InvalidCategoryKind(String),

    /// The category ID did not refer to a valid category.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(CategoryId),

    /// The monthly budget ID did not refer to a valid monthly budget.
    #[error("the monthly budget ID {0} does not refer to a valid monthly budget")]
    InvalidMonthlyBudget(MonthlyBudgetId),

    /// A transaction was submitted for one kind but its category is the other kind.
    #[error("the category is an {actual} category but the transaction was submitted as {expected}")]
    CategoryKindMismatch {
        /// The kind the transaction was submitted for.
        expected: CategoryKind,
        /// The kind of the selected category.
        actual: CategoryKind,
    },

    /// A form field could not be parsed into its typed value.
    #[error("invalid value {value:?} for the field \"{field}\"")]
    InvalidFormValue {
        /// The name of the form field.
        field: &'static str,
        /// The raw text that failed to parse.
        value: String,
    },

    /// A monthly budget for the year and month already exists.
    #[error("a monthly budget for {year}-{month:02} already exists")]
    DuplicateMonthlyBudget {
        /// The year of the duplicate.
        year: i32,
        /// The month of the duplicate.
        month: u8,
    },

    /// The category is still used by transactions or category budgets.
    #[error("category {0} is still used by transactions or budgets")]
    CategoryInUse(CategoryId),

    /// The monthly budget still has transactions linked to it.
    #[error("monthly budget {0} still has transactions, delete them first")]
    MonthlyBudgetInUse(MonthlyBudgetId),

    /// Tried to change the kind of a category that is already referenced.
    #[error("the kind of category {0} cannot change while it is used by transactions or budgets")]
    CategoryKindLocked(CategoryId),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to delete a monthly budget that does not exist
    #[error("tried to delete a monthly budget that is not in the database")]
    DeleteMissingMonthlyBudget,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl Error {
    /// The class of failure this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NegativeAmount(_)
            | Error::AmountTooLarge(_)
            | Error::DateOutsideMonth { .. }
            | Error::InvalidMonth(_)
            | Error::InvalidYear(_)
            | Error::EmptyCategoryName
            | Error::InvalidCategoryKind(_)
            | Error::InvalidCategory(_)
            | Error::InvalidMonthlyBudget(_)
            | Error::CategoryKindMismatch { .. }
            | Error::InvalidFormValue { .. } => ErrorKind::Validation,
            Error::DuplicateMonthlyBudget { .. } => ErrorKind::DuplicateKey,
            Error::CategoryInUse(_)
            | Error::MonthlyBudgetInUse(_)
            | Error::CategoryKindLocked(_) => ErrorKind::ReferenceConflict,
            Error::NotFound
            | Error::UpdateMissingCategory
            | Error::DeleteMissingCategory
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::DeleteMissingMonthlyBudget => ErrorKind::NotFound,
            Error::SqlError(_) | Error::DatabaseLockError | Error::AmountOverflow => {
                ErrorKind::Internal
            }
        }
    }

    fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::DuplicateKey | ErrorKind::ReferenceConflict => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self.kind() {
            // The SQL error text is only meant for the server logs.
            ErrorKind::Internal => {
                tracing::error!("An unexpected error occurred: {}", self);
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Whether `error` is an SQLite constraint failure with the extended code `extended_code`.
pub(crate) fn is_constraint_violation(error: &rusqlite::Error, extended_code: i32) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(sql_error, _) if sql_error.extended_code == extended_code
    )
}
