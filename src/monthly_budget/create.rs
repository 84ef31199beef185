//! Defines the endpoint for creating a monthly budget.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, db::lock_connection, form::parse_year_month,
    monthly_budget::create_monthly_budget,
};

/// The state needed to create a monthly budget.
#[derive(Debug, Clone)]
pub struct CreateMonthlyBudgetState {
    /// The database connection for managing monthly budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateMonthlyBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a monthly budget.
#[derive(Debug, Serialize, Deserialize)]
pub struct MonthlyBudgetForm {
    /// The calendar year, e.g. "2025".
    pub year: String,
    /// The month number, "1" to "12".
    pub month: String,
}

/// A route handler for creating a new monthly budget.
///
/// Responds with 409 Conflict if the month already has a budget.
pub async fn create_monthly_budget_endpoint(
    State(state): State<CreateMonthlyBudgetState>,
    Form(form): Form<MonthlyBudgetForm>,
) -> Response {
    let period = match parse_year_month(&form.year, &form.month) {
        Ok(period) => period,
        Err(error) => return error.into_response(),
    };

    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match create_monthly_budget(period, &connection) {
        Ok(monthly_budget) => {
            tracing::info!("Created monthly budget for {period}");
            (StatusCode::CREATED, Json(monthly_budget)).into_response()
        }
        Err(error @ Error::DuplicateMonthlyBudget { .. }) => {
            tracing::debug!("{error}");
            error.into_response()
        }
        Err(error) => {
            tracing::error!("could not create monthly budget for {period}: {error}");
            error.into_response()
        }
    }
}
