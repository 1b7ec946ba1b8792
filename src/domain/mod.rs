//! Domain models for expenses, budgets, and derived analytics.

pub mod budget;
pub mod category;
pub mod common;
pub mod currency;
pub mod expense;
pub mod health;
pub mod summary;

pub use budget::{Budget, BudgetLimits, BudgetWindow};
pub use category::ExpenseCategory;
pub use common::OwnerId;
pub use currency::{format_currency, to_minor_units, CurrencyCode};
pub use expense::{Expense, TransactionReference};
pub use health::{BudgetHealth, HealthScore, WindowHealth};
pub use summary::{CategoryBreakdown, DashboardStats, SpendingTotals};
