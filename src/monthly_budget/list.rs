//! Defines the endpoint that lists monthly budgets with their month totals.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, db::lock_connection, report::get_monthly_summaries};

/// The state needed to list monthly budgets.
#[derive(Debug, Clone)]
pub struct ListMonthlyBudgetsState {
    /// The database connection for reading monthly budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListMonthlyBudgetsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List every monthly budget, newest first, with the income, expense and
/// balance of its calendar month.
pub async fn get_monthly_budgets_endpoint(
    State(state): State<ListMonthlyBudgetsState>,
) -> Response {
    let result = lock_connection(&state.db_connection)
        .and_then(|connection| get_monthly_summaries(&connection));

    match result {
        Ok(summaries) => Json(summaries).into_response(),
        Err(error) => {
            tracing::error!("Could not list monthly budgets: {error}");
            error.into_response()
        }
    }
}
