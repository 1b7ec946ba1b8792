//! Validation and construction of expense records.

use chrono::{DateTime, Utc};

use crate::core::errors::{ExpenseError, Result};
use crate::domain::{Expense, ExpenseCategory, OwnerId};

/// Upper bound on description length, counted in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 100;

pub struct ExpenseService;

impl ExpenseService {
    /// Validates user input and builds a new record dated `date`.
    pub fn create(
        owner: &OwnerId,
        amount: f64,
        category: ExpenseCategory,
        description: &str,
        date: DateTime<Utc>,
    ) -> Result<Expense> {
        Self::validate_amount(amount)?;
        let description = Self::normalize_description(description)?;
        Ok(Expense::new(owner.clone(), amount, category, description, date))
    }

    pub fn validate_amount(amount: f64) -> Result<()> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ExpenseError::validation(format!(
                "amount must be a positive number, got {}",
                amount
            )));
        }
        Ok(())
    }

    /// Trims the description and enforces the non-empty and length rules.
    pub fn normalize_description(description: &str) -> Result<String> {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return Err(ExpenseError::validation("description must not be empty"));
        }
        let length = trimmed.chars().count();
        if length > MAX_DESCRIPTION_CHARS {
            return Err(ExpenseError::validation(format!(
                "description is {} characters; the limit is {}",
                length, MAX_DESCRIPTION_CHARS
            )));
        }
        Ok(trimmed.to_string())
    }

    /// Parses a user-entered amount such as `12.50`.
    pub fn parse_amount(raw: &str) -> Result<f64> {
        let amount: f64 = raw
            .trim()
            .parse()
            .map_err(|_| ExpenseError::validation(format!("`{}` is not a valid amount", raw)))?;
        Self::validate_amount(amount)?;
        Ok(amount)
    }

    /// Inserts the record at the front so the list stays most-recent-first.
    pub fn prepend(expenses: &mut Vec<Expense>, expense: Expense) {
        expenses.insert(0, expense);
    }
}
