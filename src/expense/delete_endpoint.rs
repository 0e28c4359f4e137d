use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, database_id::ExpenseId, endpoints, expense::delete_expense};

/// The state needed to delete an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an expense, redirects to the expense list on success.
///
/// Responds with a plain text 404 if the expense does not exist.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_plain_text_response();
        }
    };

    match delete_expense(expense_id, &connection) {
        Ok(()) => {
            tracing::info!("Deleted expense {expense_id}");
            Redirect::to(endpoints::ROOT).into_response()
        }
        Err(error) => {
            tracing::error!("Could not delete expense {expense_id}: {error}");
            error.into_plain_text_response()
        }
    }
}
