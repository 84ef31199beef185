//! Defines the endpoint for listing transactions with their income and expense totals.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    category::{CategoryKind, get_categories},
    db::lock_connection,
    form::{parse_field, parse_year_month},
    monthly_budget::{DateRange, YearMonth},
    report::{IncomeExpenseTotals, income_expense_totals},
    transaction::{Transaction, TransactionFilter, get_transactions},
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw query parameters for filtering the transaction list.
///
/// A year on its own selects the whole year, a month needs a year.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    pub kind: Option<String>,
    pub year: Option<String>,
    pub month: Option<String>,
}

impl TransactionQuery {
    fn parse(&self) -> Result<TransactionFilter, Error> {
        let kind = match non_empty(&self.kind) {
            None => None,
            Some(raw) => Some(raw.parse::<CategoryKind>()?),
        };

        let date_range = match (non_empty(&self.year), non_empty(&self.month)) {
            (None, None) => None,
            (Some(year), Some(month)) => Some(parse_year_month(year, month)?.date_range()),
            (Some(year), None) => {
                let year: i64 = parse_field("year", year)?;
                Some(DateRange {
                    start: YearMonth::new(year, 1)?.date_range().start,
                    end: YearMonth::new(year, 12)?.date_range().end,
                })
            }
            (None, Some(_)) => {
                return Err(Error::InvalidFormValue {
                    field: "year",
                    value: String::new(),
                });
            }
        };

        Ok(TransactionFilter { kind, date_range })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// The transactions matching a query and the totals over them.
#[derive(Debug, Serialize)]
pub struct TransactionList {
    pub transactions: Vec<Transaction>,
    pub total_income: i64,
    pub total_expense: i64,
    pub balance: i64,
}

/// A route handler for listing transactions, newest first.
pub async fn get_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Query(query): Query<TransactionQuery>,
) -> Response {
    let filter = match query.parse() {
        Ok(filter) => filter,
        Err(error) => return error.into_response(),
    };

    match list_transactions(&state, filter) {
        Ok(list) => Json(list).into_response(),
        Err(error) => {
            tracing::error!("Could not list transactions: {error}");
            error.into_response()
        }
    }
}

fn list_transactions(
    state: &ListTransactionsState,
    filter: TransactionFilter,
) -> Result<TransactionList, Error> {
    let connection = lock_connection(&state.db_connection)?;
    let transactions = get_transactions(filter, &connection)?;
    let categories = get_categories(None, &connection)?;

    let IncomeExpenseTotals {
        income,
        expense,
        balance,
    } = income_expense_totals(&categories, &transactions)?;

    Ok(TransactionList {
        transactions,
        total_income: income,
        total_expense: expense,
        balance,
    })
}
