//! Validation and replacement of an owner's budget.

use crate::core::errors::{ExpenseError, Result};
use crate::domain::{Budget, BudgetLimits, BudgetWindow, CurrencyCode, OwnerId};

pub struct BudgetService;

impl BudgetService {
    /// Every limit must be a finite amount no lower than zero.
    pub fn validate_limits(limits: &BudgetLimits) -> Result<()> {
        for window in BudgetWindow::ALL {
            let value = limits.get(window);
            if !value.is_finite() || value < 0.0 {
                return Err(ExpenseError::validation(format!(
                    "{} limit must be zero or greater, got {}",
                    window, value
                )));
            }
        }
        Ok(())
    }

    /// Builds the budget that replaces `current`. Identity and currency of an
    /// existing budget carry over; otherwise `currency` is used.
    pub fn replace(
        current: Option<&Budget>,
        owner: &OwnerId,
        limits: BudgetLimits,
        currency: &CurrencyCode,
    ) -> Result<Budget> {
        Self::validate_limits(&limits)?;
        Ok(match current {
            Some(existing) => Budget {
                id: existing.id,
                owner: owner.clone(),
                limits,
                currency: existing.currency.clone(),
            },
            None => Budget::new(owner.clone(), limits, currency.clone()),
        })
    }
}
