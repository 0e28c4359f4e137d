//! Defines the endpoint for creating a new expense.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, endpoints,
    expense::{NewExpense, create_expense},
};

/// The state needed to create an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating an expense.
///
/// Fields are kept as text and validated by [NewExpense::parse] so that bad
/// input is reported with a useful message instead of a generic rejection.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ExpenseForm {
    /// The date the money was spent, formatted as `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    /// What the money was spent on.
    #[serde(default)]
    pub description: String,
    /// The label to group the expense under.
    #[serde(default)]
    pub category: String,
    /// The amount of money spent.
    #[serde(default)]
    pub amount: String,
}

/// A route handler for creating a new expense, redirects to the expense list on success.
///
/// Invalid input is rejected with a plain text error and nothing is saved.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let expense = match NewExpense::parse(&form.date, &form.description, &form.category, &form.amount)
    {
        Ok(expense) => expense,
        Err(error) => {
            tracing::warn!("Rejected new expense {form:?}: {error}");
            return error.into_plain_text_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_plain_text_response();
        }
    };

    match create_expense(expense, &connection) {
        Ok(expense) => {
            tracing::info!("Created expense {}", expense.id);
            Redirect::to(endpoints::ROOT).into_response()
        }
        Err(error) => {
            tracing::error!("could not create expense: {error}");
            error.into_plain_text_response()
        }
    }
}
