//! Expense aggregation for charts and budget tracking.

use std::collections::HashMap;

use crate::expense::Expense;

/// The total amount spent in a category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Sums the amount spent in each category.
///
/// Categories are matched as exact strings, and are returned in the order
/// they are first seen in `expenses`.
pub fn aggregate_by_category(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index_by_category: HashMap<&str, usize> = HashMap::new();

    for expense in expenses {
        match index_by_category.get(expense.category.as_str()) {
            Some(&index) => totals[index].total += expense.amount,
            None => {
                index_by_category.insert(&expense.category, totals.len());
                totals.push(CategoryTotal {
                    category: expense.category.clone(),
                    total: expense.amount,
                });
            }
        }
    }

    totals
}

/// The sum of the amounts of `expenses`.
pub fn total_amount(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|expense| expense.amount).sum()
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::expense::Expense;

    use super::{CategoryTotal, aggregate_by_category, total_amount};

    fn create_test_expense(amount: f64, category: &str) -> Expense {
        Expense {
            id: 1,
            date: date!(2024 - 01 - 15),
            description: "Test".to_owned(),
            category: category.to_owned(),
            amount,
        }
    }

    #[test]
    fn sums_by_category_in_first_seen_order() {
        let expenses = vec![
            create_test_expense(10.0, "Transport"),
            create_test_expense(20.0, "Food"),
            create_test_expense(5.0, "Transport"),
            create_test_expense(2.5, "Rent"),
        ];

        let totals = aggregate_by_category(&expenses);

        assert_eq!(
            totals,
            vec![
                CategoryTotal {
                    category: "Transport".to_owned(),
                    total: 15.0
                },
                CategoryTotal {
                    category: "Food".to_owned(),
                    total: 20.0
                },
                CategoryTotal {
                    category: "Rent".to_owned(),
                    total: 2.5
                },
            ]
        );
    }

    #[test]
    fn categories_are_case_and_whitespace_sensitive() {
        let expenses = vec![
            create_test_expense(1.0, "Food"),
            create_test_expense(1.0, "food"),
            create_test_expense(1.0, "Food "),
        ];

        let totals = aggregate_by_category(&expenses);

        assert_eq!(totals.len(), 3);
    }

    #[test]
    fn totals_sum_to_input_total() {
        let expenses = vec![
            create_test_expense(12.25, "Food"),
            create_test_expense(-3.0, "Food"),
            create_test_expense(100.0, "Rent"),
            create_test_expense(0.75, "Transport"),
        ];

        let aggregated: f64 = aggregate_by_category(&expenses)
            .iter()
            .map(|category_total| category_total.total)
            .sum();

        assert_eq!(aggregated, total_amount(&expenses));
        assert_eq!(total_amount(&expenses), 110.0);
    }

    #[test]
    fn handles_empty_input() {
        assert!(aggregate_by_category(&[]).is_empty());
        assert_eq!(total_amount(&[]), 0.0);
    }
}
