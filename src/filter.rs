//! Narrowing the expenses shown, charted and exported to a single month.
//!
//! Every read path resolves its query parameters through [FilterQuery] so the
//! list, the chart data and the CSV export always agree for the same request.

use serde::Deserialize;
use time::{Date, Month};

/// A calendar month in a specific year.
///
/// Ordered by year first, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    /// The month number, January is 1.
    pub month: u8,
}

impl YearMonth {
    /// The month that `date` falls in.
    pub fn of(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()),
        }
    }

    /// A human readable label, e.g. "January 2024".
    pub fn label(&self) -> String {
        match Month::try_from(self.month) {
            Ok(month) => format!("{month} {}", self.year),
            Err(_) => format!("{}-{:02}", self.year, self.month),
        }
    }
}

/// Which expenses a read should include.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseFilter {
    /// Every expense in the database.
    #[default]
    All,
    /// Only expenses whose date falls in the given month.
    Month(YearMonth),
}

impl ExpenseFilter {
    /// Resolve the filter from an optional year and month.
    ///
    /// A filter is only applied if both the year and the month are given,
    /// otherwise all expenses are included.
    pub fn resolve(year: Option<i32>, month: Option<u8>) -> Self {
        match (year, month) {
            (Some(year), Some(month)) => ExpenseFilter::Month(YearMonth { year, month }),
            _ => ExpenseFilter::All,
        }
    }

    /// The query string that reproduces this filter, empty for [ExpenseFilter::All].
    pub fn to_query_string(&self) -> String {
        match self {
            ExpenseFilter::All => String::new(),
            ExpenseFilter::Month(period) => {
                serde_urlencoded::to_string(&[
                    ("year", period.year),
                    ("month", i32::from(period.month)),
                ])
                .unwrap_or_else(|error| {
                    tracing::error!("Could not encode filter {period:?}: {error}");
                    String::new()
                })
            }
        }
    }
}

/// The query parameters accepted by the pages that can be filtered by month.
///
/// Values are kept as text so that a malformed value is treated like a
/// missing one instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    pub year: Option<String>,
    pub month: Option<String>,
}

impl FilterQuery {
    /// Resolve the query into a filter, ignoring values that are not integers.
    pub fn filter(&self) -> ExpenseFilter {
        let year = self.year.as_deref().and_then(|year| year.trim().parse().ok());
        let month = self.month.as_deref().and_then(|month| month.trim().parse().ok());

        ExpenseFilter::resolve(year, month)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{ExpenseFilter, FilterQuery, YearMonth};

    const JANUARY_2024: YearMonth = YearMonth {
        year: 2024,
        month: 1,
    };

    fn query(year: Option<&str>, month: Option<&str>) -> FilterQuery {
        FilterQuery {
            year: year.map(str::to_owned),
            month: month.map(str::to_owned),
        }
    }

    #[test]
    fn resolves_month_when_both_parts_present() {
        assert_eq!(
            ExpenseFilter::resolve(Some(2024), Some(1)),
            ExpenseFilter::Month(JANUARY_2024)
        );
    }

    #[test]
    fn partial_filter_is_no_filter() {
        assert_eq!(ExpenseFilter::resolve(Some(2024), None), ExpenseFilter::All);
        assert_eq!(ExpenseFilter::resolve(None, Some(1)), ExpenseFilter::All);
        assert_eq!(ExpenseFilter::resolve(None, None), ExpenseFilter::All);
    }

    #[test]
    fn period_of_date() {
        assert_eq!(YearMonth::of(date!(2024 - 01 - 31)), JANUARY_2024);
        assert_ne!(YearMonth::of(date!(2023 - 01 - 15)), JANUARY_2024);
    }

    #[test]
    fn query_ignores_malformed_values() {
        assert_eq!(query(Some("2024"), Some("1")).filter(), ExpenseFilter::Month(JANUARY_2024));
        assert_eq!(query(Some("2024"), Some("")).filter(), ExpenseFilter::All);
        assert_eq!(query(Some("twenty"), Some("1")).filter(), ExpenseFilter::All);
        assert_eq!(query(None, Some("1")).filter(), ExpenseFilter::All);
    }

    #[test]
    fn query_string_round_trips() {
        let filter = ExpenseFilter::Month(YearMonth {
            year: 2023,
            month: 12,
        });

        assert_eq!(filter.to_query_string(), "year=2023&month=12");
        assert_eq!(ExpenseFilter::All.to_query_string(), "");
    }

    #[test]
    fn periods_order_by_year_then_month() {
        let december_2023 = YearMonth {
            year: 2023,
            month: 12,
        };

        assert!(december_2023 < JANUARY_2024);
    }

    #[test]
    fn label_uses_month_name() {
        assert_eq!(JANUARY_2024.label(), "January 2024");
        assert_eq!(
            YearMonth {
                year: 2024,
                month: 13
            }
            .label(),
            "2024-13"
        );
    }
}
