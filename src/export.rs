//! Downloading expenses as a CSV file.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    expense::{Expense, get_expenses},
    filter::{ExpenseFilter, FilterQuery},
};

/// The column names written as the first row of an export.
const HEADER: [&str; 5] = ["ID", "Date", "Description", "Category", "Amount"];

/// A CSV file ready to be sent to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub bytes: Vec<u8>,
    pub filename: String,
}

/// The name of the file an export for `filter` is saved as.
pub fn export_filename(filter: ExpenseFilter) -> String {
    match filter {
        ExpenseFilter::All => "expenses_all.csv".to_owned(),
        ExpenseFilter::Month(period) => {
            format!("expenses_{}_{}.csv", period.year, period.month)
        }
    }
}

/// Write `expenses` as CSV in the order given.
///
/// # Errors
/// Returns an [Error::CsvError] if the CSV could not be written.
pub fn export_expenses(expenses: &[Expense], filter: ExpenseFilter) -> Result<CsvExport, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for expense in expenses {
        writer.write_record([
            expense.id.to_string(),
            expense.date.to_string(),
            expense.description.clone(),
            expense.category.clone(),
            expense.amount.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    Ok(CsvExport {
        bytes,
        filename: export_filename(filter),
    })
}

impl IntoResponse for CsvExport {
    fn into_response(self) -> Response {
        (
            [
                (CONTENT_TYPE, "text/csv".to_owned()),
                (
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", self.filename),
                ),
            ],
            self.bytes,
        )
            .into_response()
    }
}

/// The state needed to export expenses.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that downloads the expenses matching the `year`/`month` query as CSV.
pub async fn get_export(
    State(state): State<ExportState>,
    Query(query): Query<FilterQuery>,
) -> Result<CsvExport, Error> {
    let filter = query.filter();

    let expenses = {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        get_expenses(filter, &connection)?
    };

    export_expenses(&expenses, filter)
}
