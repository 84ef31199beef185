//! Defines the endpoint for setting a category's budgeted amount in a month.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    category_budget::{CategoryBudget, upsert_category_budget},
    db::lock_connection,
    error::ErrorKind,
    form::{parse_amount, parse_id, parse_year_month},
    monthly_budget::get_monthly_budget,
};

/// The state needed to set category budgets.
#[derive(Debug, Clone)]
pub struct UpsertCategoryBudgetState {
    /// The database connection for managing category budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpsertCategoryBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw form data for a category budget.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryBudgetForm {
    pub budgeted_amount: String,
}

/// A route handler for setting the budgeted amount of a category in the
/// monthly budget of a year and month.
pub async fn upsert_category_budget_endpoint(
    State(state): State<UpsertCategoryBudgetState>,
    Path((year, month, category_id)): Path<(String, String, String)>,
    Form(form): Form<CategoryBudgetForm>,
) -> Response {
    match upsert(&state, &year, &month, &category_id, &form) {
        Ok(category_budget) => Json(category_budget).into_response(),
        Err(error) if error.kind() == ErrorKind::Internal => {
            tracing::error!(
                "Could not set the budget for category {category_id} in {year}-{month}: {error}"
            );
            error.into_response()
        }
        Err(error) => {
            tracing::debug!(
                "Rejected budget for category {category_id} in {year}-{month}: {error}"
            );
            error.into_response()
        }
    }
}

fn upsert(
    state: &UpsertCategoryBudgetState,
    year: &str,
    month: &str,
    category_id: &str,
    form: &CategoryBudgetForm,
) -> Result<CategoryBudget, Error> {
    let period = parse_year_month(year, month)?;
    let category_id = parse_id("category_id", category_id)?;
    let budgeted_amount = parse_amount("budgeted_amount", &form.budgeted_amount)?;

    let connection = lock_connection(&state.db_connection)?;
    let monthly_budget = get_monthly_budget(period, &connection)?;

    let category_budget =
        upsert_category_budget(monthly_budget.id, category_id, budgeted_amount, &connection)?;
    tracing::info!(
        "Set the budget for category {category_id} in {period} to {budgeted_amount}"
    );

    Ok(category_budget)
}

#[cfg(test)]
mod upsert_category_budget_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;

    use crate::{
        category::{CategoryKind, CategoryName, create_category},
        category_budget::{count_category_budgets, get_budgeted_amount, upsert_category_budget_endpoint},
        monthly_budget::{YearMonth, create_monthly_budget},
        test_utils::{get_test_connection, parse_json_body},
    };

    use super::{CategoryBudgetForm, UpsertCategoryBudgetState};

    fn get_state() -> UpsertCategoryBudgetState {
        let connection = get_test_connection();
        create_monthly_budget(YearMonth::new(2025, 3).unwrap(), &connection).unwrap();
        create_category(
            CategoryName::new_unchecked("Food"),
            CategoryKind::Expense,
            &connection,
        )
        .unwrap();

        UpsertCategoryBudgetState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn path(year: &str, month: &str, category_id: &str) -> Path<(String, String, String)> {
        Path((year.to_owned(), month.to_owned(), category_id.to_owned()))
    }

    fn form(amount: &str) -> Form<CategoryBudgetForm> {
        Form(CategoryBudgetForm {
            budgeted_amount: amount.to_owned(),
        })
    }

    #[tokio::test]
    async fn sets_and_replaces_budget() {
        let state = get_state();

        let first =
            upsert_category_budget_endpoint(State(state.clone()), path("2025", "3", "1"), form("100000"))
                .await;
        let second =
            upsert_category_budget_endpoint(State(state.clone()), path("2025", "3", "1"), form("150000"))
                .await;

        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(second.status(), StatusCode::OK);
        let body = parse_json_body(second).await;
        assert_eq!(body["budgeted_amount"], 150000);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_category_budgets(&connection), Ok(1));
        assert_eq!(get_budgeted_amount(1, 1, &connection), Ok(150000));
    }

    #[tokio::test]
    async fn missing_month_is_not_found() {
        let response =
            upsert_category_budget_endpoint(State(get_state()), path("2025", "4", "1"), form("1"))
                .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rejects_negative_amount() {
        let state = get_state();

        let response =
            upsert_category_budget_endpoint(State(state.clone()), path("2025", "3", "1"), form("-10"))
                .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(count_category_budgets(&state.db_connection.lock().unwrap()), Ok(0));
    }
}
