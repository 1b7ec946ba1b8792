//! Submission of expense events to an external ledger.
//!
//! The store treats submission as best effort: a failed submission never
//! removes or blocks the local record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::errors::{ExpenseError, Result};
use crate::domain::{to_minor_units, CurrencyCode, Expense, ExpenseCategory, OwnerId, TransactionReference};

/// Ledger-facing view of a newly added expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseEvent {
    pub owner: OwnerId,
    pub amount_minor: i64,
    pub currency: CurrencyCode,
    pub category: ExpenseCategory,
    pub description: String,
    pub timestamp: i64,
}

impl ExpenseEvent {
    pub fn from_expense(expense: &Expense, currency: &CurrencyCode) -> Self {
        Self {
            owner: expense.owner.clone(),
            amount_minor: to_minor_units(expense.amount, currency),
            currency: currency.clone(),
            category: expense.category,
            description: expense.description.clone(),
            timestamp: expense.date.timestamp(),
        }
    }

    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Accepts expense events and returns a reference token.
pub trait TransactionSubmitter: Send + Sync {
    fn submit(&self, event: &ExpenseEvent) -> Result<TransactionReference>;
}

/// Fabricates `0x`-prefixed references without contacting any ledger.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockLedgerSubmitter;

impl TransactionSubmitter for MockLedgerSubmitter {
    fn submit(&self, _event: &ExpenseEvent) -> Result<TransactionReference> {
        let digits = Uuid::new_v4().simple().to_string();
        Ok(TransactionReference::new(format!("0x{}", &digits[..8])))
    }
}

/// Rejects every event; used when no ledger is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSubmitter;

impl TransactionSubmitter for DisabledSubmitter {
    fn submit(&self, _event: &ExpenseEvent) -> Result<TransactionReference> {
        Err(ExpenseError::Submission("no ledger configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn event_carries_cents_and_unix_seconds() {
        let date = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let expense = Expense::new("0x1".into(), 12.34, ExpenseCategory::Food, "Soup", date);
        let event = ExpenseEvent::from_expense(&expense, &CurrencyCode::default());
        assert_eq!(event.amount_minor, 1234);
        assert_eq!(event.timestamp, date.timestamp());
        assert_eq!(event.occurred_at(), Some(date));
    }

    #[test]
    fn mock_references_are_short_hex() {
        let date = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let expense = Expense::new("0x1".into(), 1.0, ExpenseCategory::Misc, "x", date);
        let event = ExpenseEvent::from_expense(&expense, &CurrencyCode::default());
        let reference = MockLedgerSubmitter.submit(&event).unwrap();
        let text = reference.as_str();
        assert_eq!(text.len(), 10);
        assert!(text.starts_with("0x"));
        assert!(text[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn disabled_submitter_reports_failure() {
        let date = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let expense = Expense::new("0x1".into(), 1.0, ExpenseCategory::Misc, "x", date);
        let event = ExpenseEvent::from_expense(&expense, &CurrencyCode::default());
        assert!(matches!(
            DisabledSubmitter.submit(&event),
            Err(ExpenseError::Submission(_))
        ));
    }
}
