//! Defines the endpoint for a month's budget report.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    db::lock_connection,
    form::parse_year_month,
    report::{MonthReport, get_month_report},
};

/// The state needed to build month reports.
#[derive(Debug, Clone)]
pub struct MonthReportState {
    /// The database connection for reading budgets and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for MonthReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for the budget versus actual report of a year and month.
pub async fn get_month_report_endpoint(
    State(state): State<MonthReportState>,
    Path((year, month)): Path<(String, String)>,
) -> Response {
    match build_report(&state, &year, &month) {
        Ok(report) => Json(report).into_response(),
        Err(error @ (Error::SqlError(_) | Error::DatabaseLockError | Error::AmountOverflow)) => {
            tracing::error!("Could not build the report for {year}-{month}: {error}");
            error.into_response()
        }
        Err(error) => error.into_response(),
    }
}

fn build_report(state: &MonthReportState, year: &str, month: &str) -> Result<MonthReport, Error> {
    let period = parse_year_month(year, month)?;
    let connection = lock_connection(&state.db_connection)?;

    get_month_report(period, &connection)
}
