//! Expense records and the reference returned by an external ledger.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{category::ExpenseCategory, common::OwnerId};

/// A single logged expense. Records are never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub amount: f64,
    pub category: ExpenseCategory,
    pub description: String,
    pub date: DateTime<Utc>,
    pub owner: OwnerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_reference: Option<TransactionReference>,
}

impl Expense {
    /// Builds a record without validation; use `ExpenseService::create` for
    /// user-supplied input.
    pub fn new(
        owner: OwnerId,
        amount: f64,
        category: ExpenseCategory,
        description: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            category,
            description: description.into(),
            date,
            owner,
            transaction_reference: None,
        }
    }

    pub fn with_reference(mut self, reference: TransactionReference) -> Self {
        self.transaction_reference = Some(reference);
        self
    }
}

/// Token handed back by the ledger submitter for an accepted expense event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionReference(String);

impl TransactionReference {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form `0x1234...abcd`; short references are returned as-is.
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 10 {
            return self.0.clone();
        }
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

impl fmt::Display for TransactionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
