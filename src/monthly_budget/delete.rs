//! Defines the endpoint for deleting a monthly budget.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    db::lock_connection,
    form::parse_year_month,
    monthly_budget::{delete_monthly_budget, get_monthly_budget},
};

/// The state needed to delete a monthly budget.
#[derive(Debug, Clone)]
pub struct DeleteMonthlyBudgetState {
    /// The database connection for managing monthly budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteMonthlyBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting the monthly budget of a year and month.
///
/// Responds with 409 Conflict while transactions are linked to the period.
pub async fn delete_monthly_budget_endpoint(
    State(state): State<DeleteMonthlyBudgetState>,
    Path((year, month)): Path<(String, String)>,
) -> Response {
    match delete_period(&state, &year, &month) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error @ (Error::MonthlyBudgetInUse(_) | Error::NotFound)) => {
            tracing::debug!("Could not delete monthly budget {year}-{month}: {error}");
            error.into_response()
        }
        Err(error) => {
            tracing::error!("Could not delete monthly budget {year}-{month}: {error}");
            error.into_response()
        }
    }
}

fn delete_period(state: &DeleteMonthlyBudgetState, year: &str, month: &str) -> Result<(), Error> {
    let period = parse_year_month(year, month)?;
    let connection = lock_connection(&state.db_connection)?;
    let monthly_budget = get_monthly_budget(period, &connection)?;

    delete_monthly_budget(monthly_budget.id, &connection)?;
    tracing::info!("Deleted monthly budget for {period}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use time::macros::date;

    use crate::{
        category::{CategoryKind, CategoryName, create_category},
        monthly_budget::{YearMonth, create_monthly_budget, delete_monthly_budget_endpoint},
        test_utils::get_test_connection,
        transaction::{Transaction, create_transaction},
    };

    use super::DeleteMonthlyBudgetState;

    fn path(year: &str, month: &str) -> Path<(String, String)> {
        Path((year.to_owned(), month.to_owned()))
    }

    #[tokio::test]
    async fn deletes_empty_period() {
        let connection = get_test_connection();
        create_monthly_budget(YearMonth::new(2025, 6).unwrap(), &connection).unwrap();
        let state = DeleteMonthlyBudgetState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_monthly_budget_endpoint(State(state), path("2025", "6")).await;

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn linked_transactions_block_delete() {
        let connection = get_test_connection();
        let category = create_category(
            CategoryName::new_unchecked("Salary"),
            CategoryKind::Income,
            &connection,
        )
        .unwrap();
        let monthly_budget =
            create_monthly_budget(YearMonth::new(2025, 6).unwrap(), &connection).unwrap();
        create_transaction(
            Transaction::build(1000000, date!(2025 - 06 - 25), "Pay", category.id)
                .monthly_budget_id(Some(monthly_budget.id)),
            &connection,
        )
        .unwrap();
        let state = DeleteMonthlyBudgetState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_monthly_budget_endpoint(State(state), path("2025", "6")).await;

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn missing_period_returns_not_found() {
        let state = DeleteMonthlyBudgetState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = delete_monthly_budget_endpoint(State(state), path("2025", "6")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
