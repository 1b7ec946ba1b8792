//! The closed set of expense categories and their presentation attributes.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::core::errors::ExpenseError;

/// Classification attached to every expense. The set is closed: adding a
/// variant forces every `match` below to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Food,
    Transport,
    School,
    Misc,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 4] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::School,
        ExpenseCategory::Misc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::School => "School",
            ExpenseCategory::Misc => "Misc",
        }
    }

    /// Hex colour used by charts.
    pub fn color(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "#ef4444",
            ExpenseCategory::Transport => "#3b82f6",
            ExpenseCategory::School => "#10b981",
            ExpenseCategory::Misc => "#f59e0b",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "🍕",
            ExpenseCategory::Transport => "🚌",
            ExpenseCategory::School => "📚",
            ExpenseCategory::Misc => "🎯",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = ExpenseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim();
        ExpenseCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                ExpenseError::validation(format!(
                    "unknown category `{}` (expected one of Food, Transport, School, Misc)",
                    wanted
                ))
            })
    }
}
