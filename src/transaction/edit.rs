//! Defines the endpoint for updating an existing transaction.

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
    database_id::TransactionId,
    db::lock_connection,
    error::ErrorKind,
    form::{parse_amount, parse_date, parse_id},
    transaction::{TransactionUpdate, update_transaction},
};

/// The state needed for updating a transaction.
#[derive(Debug, Clone)]
pub struct UpdateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw form data for editing a transaction.
///
/// The monthly budget link is fixed when the transaction is created.
#[derive(Debug, Clone, Deserialize)]
pub struct EditTransactionForm {
    pub description: String,
    pub amount: String,
    pub date: String,
    pub category_id: String,
}

impl EditTransactionForm {
    fn parse(&self) -> Result<TransactionUpdate, Error> {
        Ok(TransactionUpdate {
            amount: parse_amount("amount", &self.amount)?,
            date: parse_date("date", &self.date)?,
            description: self.description.trim().to_owned(),
            category_id: parse_id("category_id", &self.category_id)?,
        })
    }
}

/// A route handler for updating a transaction.
pub async fn update_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<UpdateTransactionState>,
    Form(form): Form<EditTransactionForm>,
) -> Response {
    let update = match form.parse() {
        Ok(update) => update,
        Err(error) => return error.into_response(),
    };

    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match update_transaction(transaction_id, update, &connection) {
        Ok(transaction) => Json(transaction).into_response(),
        Err(error) if matches!(error.kind(), ErrorKind::Validation | ErrorKind::NotFound) => {
            tracing::debug!("Rejected update to transaction {transaction_id}: {error}");
            error.into_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating transaction {transaction_id}: {error}"
            );
            error.into_response()
        }
    }
}

#[cfg(test)]
mod update_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;
    use time::macros::date;

    use crate::{
        category::{CategoryKind, CategoryName, create_category},
        test_utils::{get_test_connection, parse_json_body},
        transaction::{Transaction, create_transaction, get_transaction, update_transaction_endpoint},
    };

    use super::{EditTransactionForm, UpdateTransactionState};

    fn get_state() -> (UpdateTransactionState, Transaction) {
        let connection = get_test_connection();
        let food = create_category(
            CategoryName::new_unchecked("Food"),
            CategoryKind::Expense,
            &connection,
        )
        .unwrap();
        let transaction = create_transaction(
            Transaction::build(1200, date!(2025 - 05 - 02), "Lunch", food.id),
            &connection,
        )
        .unwrap();

        let state = UpdateTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, transaction)
    }

    fn form(amount: &str) -> EditTransactionForm {
        EditTransactionForm {
            description: "Dinner".to_owned(),
            amount: amount.to_owned(),
            date: "2025-05-03".to_owned(),
            category_id: "1".to_owned(),
        }
    }

    #[tokio::test]
    async fn can_update_transaction() {
        let (state, transaction) = get_state();

        let response = update_transaction_endpoint(
            Path(transaction.id),
            State(state.clone()),
            Form(form("3400")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response).await;
        assert_eq!(body["description"], "Dinner");
        let updated = get_transaction(transaction.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(updated.amount, 3400);
        assert_eq!(updated.date, date!(2025 - 05 - 03));
    }

    #[tokio::test]
    async fn negative_amount_leaves_transaction_unchanged() {
        let (state, transaction) = get_state();

        let response = update_transaction_endpoint(
            Path(transaction.id),
            State(state.clone()),
            Form(form("-1")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_transaction(transaction.id, &state.db_connection.lock().unwrap()),
            Ok(transaction)
        );
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let (state, _) = get_state();

        let response = update_transaction_endpoint(Path(99), State(state), Form(form("1"))).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
