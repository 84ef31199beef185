//! Category listing endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState,
    category::{CategoryKind, get_categories},
    db::lock_connection,
};

/// The state needed for listing categories.
#[derive(Debug, Clone)]
pub struct ListCategoriesState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListCategoriesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Optional filters for the category list.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub kind: Option<String>,
}

/// List categories, income first, each group ordered by name.
pub async fn get_categories_endpoint(
    State(state): State<ListCategoriesState>,
    Query(query): Query<CategoryQuery>,
) -> Response {
    let kind = match query.kind.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match raw.parse::<CategoryKind>() {
            Ok(kind) => Some(kind),
            Err(error) => return error.into_response(),
        },
    };

    let result = lock_connection(&state.db_connection)
        .and_then(|connection| get_categories(kind, &connection));

    match result {
        Ok(categories) => Json(categories).into_response(),
        Err(error) => {
            tracing::error!("Could not list categories: {error}");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod list_categories_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };

    use crate::{
        category::{CategoryKind, CategoryName, create_category, get_categories_endpoint},
        test_utils::{get_test_connection, parse_json_body},
    };

    use super::{CategoryQuery, ListCategoriesState};

    fn get_state() -> ListCategoriesState {
        let connection = get_test_connection();
        create_category(
            CategoryName::new_unchecked("Salary"),
            CategoryKind::Income,
            &connection,
        )
        .unwrap();
        create_category(
            CategoryName::new_unchecked("Food"),
            CategoryKind::Expense,
            &connection,
        )
        .unwrap();

        ListCategoriesState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn lists_all_categories() {
        let response =
            get_categories_endpoint(State(get_state()), Query(CategoryQuery::default())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response).await;
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|category| category["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Salary", "Food"]);
    }

    #[tokio::test]
    async fn filters_by_kind() {
        let query = CategoryQuery {
            kind: Some("expense".to_owned()),
        };

        let response = get_categories_endpoint(State(get_state()), Query(query)).await;

        let body = parse_json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], "Food");
    }

    #[tokio::test]
    async fn invalid_kind_is_rejected() {
        let query = CategoryQuery {
            kind: Some("other".to_owned()),
        };

        let response = get_categories_endpoint(State(get_state()), Query(query)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
