//! The budget limit and the status derived from it.

use std::{
    fmt::Display,
    sync::{Arc, PoisonError, RwLock},
};

/// The budget limit used when none is configured.
pub const DEFAULT_BUDGET_LIMIT: f64 = 50_000.0;

/// Percentages below this are [BudgetBand::Low].
const MEDIUM_THRESHOLD: f64 = 50.0;
/// Percentages at or above this are [BudgetBand::High].
const HIGH_THRESHOLD: f64 = 80.0;

/// How close spending is to the budget limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetBand {
    /// Less than half of the budget has been spent.
    Low,
    /// Between half and 80% of the budget has been spent.
    Medium,
    /// At least 80% of the budget has been spent, or the budget was exceeded.
    High,
}

impl BudgetBand {
    fn from_percentage(percentage: f64) -> Self {
        if percentage < MEDIUM_THRESHOLD {
            BudgetBand::Low
        } else if percentage < HIGH_THRESHOLD {
            BudgetBand::Medium
        } else {
            BudgetBand::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BudgetBand::Low => "low",
            BudgetBand::Medium => "medium",
            BudgetBand::High => "high",
        }
    }
}

impl Display for BudgetBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The share of the budget that has been spent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetStatus {
    /// The percentage of the budget spent, capped at 100.
    ///
    /// Spending 85% and 250% of the budget are both [BudgetBand::High], use
    /// the total and the limit to tell how far over budget the spending is.
    pub percentage: f64,
    pub band: BudgetBand,
}

impl BudgetStatus {
    /// Compare `total_spent` against `limit`.
    ///
    /// A limit that is zero or negative yields 0%.
    pub fn new(total_spent: f64, limit: f64) -> Self {
        let percentage = if limit > 0.0 {
            (total_spent / limit * 100.0).min(100.0)
        } else {
            0.0
        };

        Self {
            percentage,
            band: BudgetBand::from_percentage(percentage),
        }
    }
}

/// Holds the budget limit shared between requests.
///
/// The limit lives for as long as the process and is reset to the configured
/// value on restart. Writes replace the limit, so concurrent updates are
/// last-write-wins.
#[derive(Debug, Clone)]
pub struct BudgetMonitor {
    limit: Arc<RwLock<f64>>,
}

impl BudgetMonitor {
    /// Create a monitor starting with `limit`.
    pub fn new(limit: f64) -> Self {
        Self {
            limit: Arc::new(RwLock::new(limit)),
        }
    }

    /// The current budget limit.
    pub fn limit(&self) -> f64 {
        // A poisoned lock still holds a whole f64, so it is safe to keep using.
        *self.limit.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the budget limit.
    pub fn set_limit(&self, limit: f64) {
        *self.limit.write().unwrap_or_else(PoisonError::into_inner) = limit;
    }

    /// Parse `new_limit` as a number and replace the budget limit with it.
    ///
    /// Returns the new limit, or `None` if `new_limit` is not a finite number,
    /// in which case the limit is left unchanged. No other bounds are enforced.
    pub fn update(&self, new_limit: &str) -> Option<f64> {
        let limit = new_limit
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|limit| limit.is_finite())?;
        self.set_limit(limit);

        Some(limit)
    }

    /// Compare `total_spent` against the current limit.
    pub fn status(&self, total_spent: f64) -> BudgetStatus {
        BudgetStatus::new(total_spent, self.limit())
    }
}

impl Default for BudgetMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET_LIMIT)
    }
}
