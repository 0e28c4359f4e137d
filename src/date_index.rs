//! Lists the months that have at least one expense, for the period selector.

use std::collections::BTreeSet;

use rusqlite::Connection;
use time::Date;

use crate::{Error, filter::YearMonth};

/// The distinct months in `dates`, most recent first.
pub fn available_periods(dates: &[Date]) -> Vec<YearMonth> {
    dates
        .iter()
        .map(|&date| YearMonth::of(date))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect()
}

/// Get the distinct dates of every stored expense.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_expense_dates(connection: &Connection) -> Result<Vec<Date>, Error> {
    connection
        .prepare("SELECT DISTINCT date FROM expense")?
        .query_map([], |row| row.get(0))?
        .map(|maybe_date| maybe_date.map_err(Error::SqlError))
        .collect()
}

/// Get the months that have at least one expense, most recent first.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_available_periods(connection: &Connection) -> Result<Vec<YearMonth>, Error> {
    get_expense_dates(connection).map(|dates| available_periods(&dates))
}
