//! Expense management for the expense tracker.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and `NewExpense` for validating user input
//! - Database functions for storing, querying, and deleting expenses
//! - The expense list page and the endpoints its forms submit to

mod core;
mod create_endpoint;
mod delete_endpoint;
mod expenses_page;

pub use core::{
    Expense, MAX_CATEGORY_LENGTH, MAX_DESCRIPTION_LENGTH, NewExpense, create_expense,
    create_expense_table, delete_expense, get_expenses,
};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use expenses_page::get_expenses_page;

#[cfg(test)]
pub use core::{count_expenses, get_expense};
