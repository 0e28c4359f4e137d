//! Defines the app level error type and conversions to HTTP responses.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    expense::{MAX_CATEGORY_LENGTH, MAX_DESCRIPTION_LENGTH},
    internal_server_error::InternalServerError,
    not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The date of an expense could not be parsed as `YYYY-MM-DD`.
    ///
    /// Callers should pass in the text that failed to parse.
    #[error("invalid date \"{0}\", expected a date in the format YYYY-MM-DD")]
    InvalidDate(String),

    /// The amount of an expense could not be parsed as a finite number.
    #[error("invalid amount \"{0}\", expected a number")]
    InvalidAmount(String),

    /// An empty string was used for the description of an expense.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// An empty string was used for the category of an expense.
    #[error("category cannot be empty")]
    EmptyCategory,

    /// The description is longer than [MAX_DESCRIPTION_LENGTH] characters.
    #[error("description cannot be longer than {MAX_DESCRIPTION_LENGTH} characters")]
    DescriptionTooLong,

    /// The category is longer than [MAX_CATEGORY_LENGTH] characters.
    #[error("category cannot be longer than {MAX_CATEGORY_LENGTH} characters")]
    CategoryTooLong,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to delete an expense that does not exist.
    #[error("expense {0} could not be found")]
    DeleteMissingExpense(i64),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The expenses could not be written as CSV.
    #[error("could not write CSV: {0}")]
    CsvError(String),
}

impl Error {
    /// Whether the error was caused by invalid user input.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidDate(_)
                | Error::InvalidAmount(_)
                | Error::EmptyDescription
                | Error::EmptyCategory
                | Error::DescriptionTooLong
                | Error::CategoryTooLong
        )
    }

    /// Convert the error into an HTTP response with a plain text body.
    ///
    /// Used by the form endpoints, which report failures as a bare message
    /// rather than a rendered page.
    pub fn into_plain_text_response(self) -> Response {
        let status_code = match &self {
            error if error.is_validation_error() => StatusCode::BAD_REQUEST,
            Error::NotFound | Error::DeleteMissingExpense(_) => StatusCode::NOT_FOUND,
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details.",
                )
                    .into_response();
            }
        };

        (status_code, format!("Error: {self}")).into_response()
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            Error::CsvError(error) => {
                tracing::error!("Could not export expenses: {error}");
                InternalServerError {
                    description: "Export Failed",
                    fix: "The expenses could not be exported. Please try again.",
                }
                .into_response()
            }
            error if error.is_validation_error() => error.into_plain_text_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    async fn body_text(response: axum::response::Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Could not get response body");
        String::from_utf8_lossy(&body).to_string()
    }

    #[tokio::test]
    async fn validation_errors_are_bad_requests_with_plain_text() {
        let response = Error::InvalidDate("2024-13-01".to_owned()).into_plain_text_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_text(response).await,
            "Error: invalid date \"2024-13-01\", expected a date in the format YYYY-MM-DD"
        );
    }

    #[tokio::test]
    async fn missing_expense_is_not_found() {
        let response = Error::DeleteMissingExpense(42).into_plain_text_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "Error: expense 42 could not be found");
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = Error::DatabaseLockError.into_plain_text_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body_text(response).await.contains("lock"));
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn not_found_page_has_not_found_status() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
