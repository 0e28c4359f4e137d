//! Application router configuration.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    budget::update_budget_endpoint,
    chart::get_chart_data,
    endpoints,
    export::get_export,
    expense::{create_expense_endpoint, delete_expense_endpoint, get_expenses_page},
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::ROOT,
            get(get_expenses_page).post(create_expense_endpoint),
        )
        .route(endpoints::DELETE_EXPENSE, post(delete_expense_endpoint))
        .route(endpoints::UPDATE_BUDGET, post(update_budget_endpoint))
        .route(endpoints::CHART_DATA, get(get_chart_data))
        .route(endpoints::EXPORT, get(get_export))
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}
