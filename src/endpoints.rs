//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/delete/{expense_id}', use [format_endpoint].

/// The expense list page, also the target for creating expenses.
pub const ROOT: &str = "/";
/// The route for deleting an expense.
pub const DELETE_EXPENSE: &str = "/delete/{expense_id}";
/// The route for changing the budget limit.
pub const UPDATE_BUDGET: &str = "/update_budget";
/// The route for the category totals used by the chart.
pub const CHART_DATA: &str = "/api/chart-data";
/// The route for downloading expenses as a CSV file.
pub const EXPORT: &str = "/export";
/// The route for static files.
pub const STATIC: &str = "/static";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/delete/{expense_id}', '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

/// Append a query string to `endpoint_path`, skipping the `?` when `query` is empty.
pub fn with_query(endpoint_path: &str, query: &str) -> String {
    if query.is_empty() {
        endpoint_path.to_owned()
    } else {
        format!("{endpoint_path}?{query}")
    }
}
