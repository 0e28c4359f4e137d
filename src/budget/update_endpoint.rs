//! Defines the endpoint for changing the budget limit.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use serde::{Deserialize, Serialize};

use crate::{AppState, budget::BudgetMonitor, endpoints};

/// The state needed to update the budget.
#[derive(Debug, Clone)]
pub struct UpdateBudgetState {
    /// The shared budget limit.
    pub budget: BudgetMonitor,
}

impl FromRef<AppState> for UpdateBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            budget: state.budget.clone(),
        }
    }
}

/// The form data for changing the budget limit.
#[derive(Debug, Deserialize, Serialize)]
pub struct BudgetForm {
    /// The new budget limit as entered by the user.
    #[serde(default)]
    pub budget: String,
}

/// A route handler for changing the budget limit, always redirects to the expense list.
///
/// Values that are not numbers leave the limit unchanged and are only logged.
pub async fn update_budget_endpoint(
    State(state): State<UpdateBudgetState>,
    Form(form): Form<BudgetForm>,
) -> Response {
    match state.budget.update(&form.budget) {
        Some(limit) => tracing::info!("Budget limit set to {limit}"),
        None => tracing::warn!(
            "Ignoring budget update, could not parse {:?} as a number",
            form.budget
        ),
    }

    Redirect::to(endpoints::ROOT).into_response()
}

#[cfg(test)]
mod tests {
    use axum::{Router, routing::post};
    use axum_test::TestServer;

    use crate::{
        budget::{BudgetMonitor, update_budget_endpoint},
        endpoints,
    };

    use super::{BudgetForm, UpdateBudgetState};

    fn get_test_server(budget: BudgetMonitor) -> TestServer {
        let app = Router::new()
            .route(endpoints::UPDATE_BUDGET, post(update_budget_endpoint))
            .with_state(UpdateBudgetState { budget });

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn updates_budget_and_redirects() {
        let budget = BudgetMonitor::new(100.0);
        let server = get_test_server(budget.clone());

        let response = server
            .post(endpoints::UPDATE_BUDGET)
            .form(&BudgetForm {
                budget: "2500".to_owned(),
            })
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::ROOT);
        assert_eq!(budget.limit(), 2500.0);
    }

    #[tokio::test]
    async fn invalid_budget_is_ignored() {
        let budget = BudgetMonitor::new(100.0);
        let server = get_test_server(budget.clone());

        let response = server
            .post(endpoints::UPDATE_BUDGET)
            .form(&BudgetForm {
                budget: "a lot".to_owned(),
            })
            .await;

        response.assert_status_see_other();
        assert_eq!(budget.limit(), 100.0);
    }

    #[tokio::test]
    async fn missing_budget_field_is_ignored() {
        let budget = BudgetMonitor::new(100.0);
        let server = get_test_server(budget.clone());

        let response = server
            .post(endpoints::UPDATE_BUDGET)
            .form(&[("unrelated", "1")])
            .await;

        response.assert_status_see_other();
        assert_eq!(budget.limit(), 100.0);
    }
}
