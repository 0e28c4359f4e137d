//! Defines the core data models and database queries for expenses.

use rusqlite::{Connection, Row};
use serde::Serialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, database_id::ExpenseId, filter::ExpenseFilter};

/// The maximum number of characters in an expense description.
pub const MAX_DESCRIPTION_LENGTH: usize = 100;
/// The maximum number of characters in an expense category.
pub const MAX_CATEGORY_LENGTH: usize = 50;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

// ============================================================================
// MODELS
// ============================================================================

/// An amount of money spent on a given day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    /// The ID of the expense, assigned by the database.
    pub id: ExpenseId,
    /// When the money was spent.
    pub date: Date,
    /// A text description of what the money was spent on.
    pub description: String,
    /// A free-form label used for grouping, e.g. "Groceries".
    ///
    /// Categories are compared as exact strings, so "food" and "Food" are
    /// different categories.
    pub category: String,
    /// The amount of money spent.
    pub amount: f64,
}

/// A validated expense that has not been saved to the database yet.
///
/// Use [NewExpense::parse] for user input and [NewExpense::new] when the
/// date and amount are already typed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    date: Date,
    description: String,
    category: String,
    amount: f64,
}

impl NewExpense {
    /// Create a new expense.
    ///
    /// Negative and zero amounts are allowed.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyDescription] or [Error::EmptyCategory] if either is empty or only whitespace,
    /// - [Error::DescriptionTooLong] or [Error::CategoryTooLong] if either exceeds its maximum length,
    /// - or [Error::InvalidAmount] if `amount` is not finite.
    pub fn new(date: Date, description: &str, category: &str, amount: f64) -> Result<Self, Error> {
        if description.trim().is_empty() {
            return Err(Error::EmptyDescription);
        }

        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(Error::DescriptionTooLong);
        }

        if category.trim().is_empty() {
            return Err(Error::EmptyCategory);
        }

        if category.chars().count() > MAX_CATEGORY_LENGTH {
            return Err(Error::CategoryTooLong);
        }

        if !amount.is_finite() {
            return Err(Error::InvalidAmount(amount.to_string()));
        }

        Ok(Self {
            date,
            description: description.to_owned(),
            category: category.to_owned(),
            amount,
        })
    }

    /// Create a new expense from text, e.g. submitted form fields.
    ///
    /// `date` must be in the format `YYYY-MM-DD`.
    ///
    /// # Errors
    /// This function will return an [Error::InvalidDate] or [Error::InvalidAmount]
    /// if `date` or `amount` cannot be parsed, otherwise see [NewExpense::new].
    pub fn parse(date: &str, description: &str, category: &str, amount: &str) -> Result<Self, Error> {
        let parsed_date = Date::parse(date.trim(), DATE_FORMAT)
            .map_err(|_| Error::InvalidDate(date.to_owned()))?;

        let parsed_amount = amount
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::InvalidAmount(amount.to_owned()))?;

        if !parsed_amount.is_finite() {
            return Err(Error::InvalidAmount(amount.to_owned()));
        }

        Self::new(parsed_date, description, category, parsed_amount)
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Save a new expense to the database.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_expense(expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "INSERT INTO expense (date, description, category, amount)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, date, description, category, amount",
        )?
        .query_row(
            (
                expense.date,
                expense.description,
                expense.category,
                expense.amount,
            ),
            map_expense_row,
        )?;

    Ok(expense)
}

/// Retrieve an expense from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] there is some other SQL error.
#[cfg(test)]
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare("SELECT id, date, description, category, amount FROM expense WHERE id = :id")?
        .query_row(&[(":id", &id)], map_expense_row)?;

    Ok(expense)
}

/// Retrieve the expenses that match `filter`, most recent first.
///
/// Expenses on the same day are ordered by decreasing ID, i.e. the most
/// recently created first.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_expenses(filter: ExpenseFilter, connection: &Connection) -> Result<Vec<Expense>, Error> {
    const SELECT: &str = "SELECT id, date, description, category, amount FROM expense";
    const ORDER_BY: &str = "ORDER BY date DESC, id DESC";

    match filter {
        ExpenseFilter::All => connection
            .prepare(&format!("{SELECT} {ORDER_BY}"))?
            .query_map([], map_expense_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::SqlError))
            .collect(),
        ExpenseFilter::Month(period) => connection
            .prepare(&format!(
                "{SELECT}
                WHERE CAST(strftime('%Y', date) AS INTEGER) = :year
                AND CAST(strftime('%m', date) AS INTEGER) = :month
                {ORDER_BY}"
            ))?
            .query_map(
                &[(":year", &period.year), (":month", &i32::from(period.month))],
                map_expense_row,
            )?
            .map(|maybe_expense| maybe_expense.map_err(Error::SqlError))
            .collect(),
    }
}

/// Permanently delete an expense.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingExpense] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense(id));
    }

    Ok(())
}

/// Get the total number of expenses in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_expenses(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM expense;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the expense table in the database.
///
/// IDs use `AUTOINCREMENT` so that the ID of a deleted expense is never reused.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            amount REAL NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);",
    )
}

/// Map a database row to an Expense.
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let date = row.get(1)?;
    let description = row.get(2)?;
    let category = row.get(3)?;
    let amount = row.get(4)?;

    Ok(Expense {
        id,
        date,
        description,
        category,
        amount,
    })
}

// ============================================================================
// TESTS
// ============================================================================
