//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::CategoryKind,
    db::lock_connection,
    error::ErrorKind,
    form::{parse_amount, parse_date, parse_id, parse_optional_id},
    transaction::{Transaction, TransactionBuilder, create_transaction},
};

/// The state needed for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw form data for a new transaction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionForm {
    pub description: String,
    pub amount: String,
    pub date: String,
    pub category_id: String,
    /// Leave empty to record the transaction without a monthly budget.
    #[serde(default)]
    pub monthly_budget_id: Option<String>,
    /// "income" or "expense" when the transaction comes from a kind specific form.
    #[serde(default)]
    pub kind: Option<String>,
}

impl TransactionForm {
    fn parse(&self) -> Result<TransactionBuilder, Error> {
        let amount = parse_amount("amount", &self.amount)?;
        let date = parse_date("date", &self.date)?;
        let category_id = parse_id("category_id", &self.category_id)?;
        let monthly_budget_id =
            parse_optional_id("monthly_budget_id", self.monthly_budget_id.as_deref())?;
        let kind = match self.kind.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<CategoryKind>()?),
        };

        Ok(
            Transaction::build(amount, date, self.description.trim(), category_id)
                .monthly_budget_id(monthly_budget_id)
                .kind(kind),
        )
    }
}

/// A route handler for creating a new transaction.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let builder = match form.parse() {
        Ok(builder) => builder,
        Err(error) => return error.into_response(),
    };

    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match create_transaction(builder, &connection) {
        Ok(transaction) => {
            tracing::info!(
                "Created transaction {} for {} on {}",
                transaction.id,
                transaction.amount,
                transaction.date
            );
            (StatusCode::CREATED, Json(transaction)).into_response()
        }
        Err(error) if error.kind() == ErrorKind::Validation => {
            tracing::debug!("Rejected new transaction: {error}");
            error.into_response()
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a transaction: {error}");
            error.into_response()
        }
    }
}
