//! Category update endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form, Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{CategoryFormData, update_category},
    database_id::CategoryId,
    db::lock_connection,
};

/// The state needed for updating a category.
#[derive(Debug, Clone)]
pub struct UpdateCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Handle category edit form submission.
pub async fn update_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<UpdateCategoryState>,
    Form(form): Form<CategoryFormData>,
) -> Response {
    let (name, kind) = match form.parse() {
        Ok(fields) => fields,
        Err(error) => return error.into_response(),
    };

    let connection = match lock_connection(&state.db_connection) {
        Ok(connection) => connection,
        Err(error) => return error.into_response(),
    };

    match update_category(category_id, name, kind, &connection) {
        Ok(category) => Json(category).into_response(),
        Err(error @ (Error::UpdateMissingCategory | Error::CategoryKindLocked(_))) => {
            tracing::debug!("Rejected update to category {category_id}: {error}");
            error.into_response()
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating category {category_id}: {error}"
            );
            error.into_response()
        }
    }
}

#[cfg(test)]
mod update_category_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
    };

    use crate::{
        category::{
            CategoryFormData, CategoryKind, CategoryName, create_category, get_category,
            update_category_endpoint,
        },
        test_utils::{get_test_connection, parse_json_body},
    };

    use super::UpdateCategoryState;

    #[tokio::test]
    async fn update_category_endpoint_succeeds() {
        let connection = get_test_connection();
        let category = create_category(
            CategoryName::new_unchecked("Food"),
            CategoryKind::Expense,
            &connection,
        )
        .unwrap();
        let state = UpdateCategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let form = CategoryFormData {
            name: "Groceries".to_owned(),
            kind: "expense".to_owned(),
        };

        let response =
            update_category_endpoint(Path(category.id), State(state.clone()), Form(form)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response).await;
        assert_eq!(body["name"], "Groceries");
        let stored = get_category(category.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(stored.name.as_ref(), "Groceries");
    }

    #[tokio::test]
    async fn update_missing_category_returns_not_found() {
        let state = UpdateCategoryState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };
        let form = CategoryFormData {
            name: "Groceries".to_owned(),
            kind: "expense".to_owned(),
        };

        let response = update_category_endpoint(Path(999), State(state), Form(form)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
