//! The API endpoints URIs.
//!
//! For endpoints that take parameters, e.g., '/api/months/{year}/{month}', use [format_endpoint].

/// The root route which redirects to the list of monthly budgets.
pub const ROOT: &str = "/";

/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to update or delete a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to list and create monthly budgets.
pub const MONTHS: &str = "/api/months";
/// The route for the report of a monthly budget, or to delete it.
pub const MONTH: &str = "/api/months/{year}/{month}";
/// The route to set the budgeted amount of a category in a monthly budget.
pub const MONTH_CATEGORY_BUDGET: &str = "/api/months/{year}/{month}/categories/{category_id}";

/// Replace the parameters in `endpoint_path` with `params`, in order.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/months/{year}/{month}', '{year}'
/// and '{month}' are the parameters.
///
/// Parameters without a matching value are left as is, and extra values are ignored.
pub fn format_endpoint(endpoint_path: &str, params: &[i64]) -> String {
    let mut formatted = String::with_capacity(endpoint_path.len());
    let mut params = params.iter();
    let mut rest = endpoint_path;

    while let Some(start) = rest.find('{') {
        let Some(length) = rest[start..].find('}') else {
            break;
        };
        let Some(param) = params.next() else {
            break;
        };

        formatted.push_str(&rest[..start]);
        formatted.push_str(&param.to_string());
        rest = &rest[start + length + 1..];
    }

    formatted.push_str(rest);
    formatted
}
