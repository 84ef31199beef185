//! Application router configuration.

use axum::{
    Router,
    response::{IntoResponse, Redirect, Response},
    routing::{get, put},
};

use crate::{
    AppState, Error,
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_endpoint,
        update_category_endpoint,
    },
    category_budget::upsert_category_budget_endpoint,
    endpoints,
    monthly_budget::{
        create_monthly_budget_endpoint, delete_monthly_budget_endpoint,
        get_monthly_budgets_endpoint,
    },
    report::get_month_report_endpoint,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transactions_endpoint,
        update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            put(update_category_endpoint).delete(delete_category_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            put(update_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::MONTHS,
            get(get_monthly_budgets_endpoint).post(create_monthly_budget_endpoint),
        )
        .route(
            endpoints::MONTH,
            get(get_month_report_endpoint).delete(delete_monthly_budget_endpoint),
        )
        .route(
            endpoints::MONTH_CATEGORY_BUDGET,
            put(upsert_category_budget_endpoint),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the list of monthly budgets.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::MONTHS)
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
