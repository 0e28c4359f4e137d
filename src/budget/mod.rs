//! Tracking spending against a budget limit shared by every request.

mod monitor;
mod update_endpoint;

pub use monitor::{BudgetBand, BudgetMonitor, BudgetStatus, DEFAULT_BUDGET_LIMIT};
pub use update_endpoint::update_budget_endpoint;
