//! Stable, public-facing entry points for presentation layers.
//!
//! The three `compute_*` functions are pure; `add_expense` and `set_budget`
//! operate on an [`ExpenseStore`] on behalf of a specific owner.

use chrono::{DateTime, TimeZone, Weekday};

use crate::core::{
    errors::Result,
    expense_store::ExpenseStore,
    identity::StaticIdentity,
    services::SummaryService,
};
use crate::domain::{
    Budget, BudgetHealth, CategoryBreakdown, Expense, ExpenseCategory, OwnerId, SpendingTotals,
};

/// Week boundaries used when no configuration is involved (local day-of-week 0).
pub const DEFAULT_FIRST_WEEKDAY: Weekday = Weekday::Sun;

pub fn compute_spending_totals<Tz: TimeZone>(
    expenses: &[Expense],
    now: &DateTime<Tz>,
) -> SpendingTotals {
    SummaryService::spending_totals(expenses, now, DEFAULT_FIRST_WEEKDAY)
}

pub fn compute_budget_health<Tz: TimeZone>(
    expenses: &[Expense],
    budget: &Budget,
    now: &DateTime<Tz>,
) -> Result<BudgetHealth> {
    SummaryService::budget_health(expenses, budget, now, DEFAULT_FIRST_WEEKDAY)
}

pub fn compute_category_breakdown(expenses: &[Expense]) -> Vec<CategoryBreakdown> {
    SummaryService::category_breakdown(expenses)
}

/// Records an expense for `owner`, switching the store's session to that
/// owner first when needed. The switch is refused with
/// `ExpenseError::Persistence` while the current owner has changes that
/// failed to save.
pub fn add_expense(
    store: &mut ExpenseStore,
    owner: &OwnerId,
    amount: f64,
    category: ExpenseCategory,
    description: &str,
) -> Result<Expense> {
    ensure_owner(store, owner)?;
    store.add_expense(amount, category, description)
}

/// Replaces the budget of `owner`, switching the store's session to that
/// owner first when needed (refused while unsaved changes exist, as for
/// [`add_expense`]).
pub fn set_budget(
    store: &mut ExpenseStore,
    owner: &OwnerId,
    daily: f64,
    weekly: f64,
    monthly: f64,
) -> Result<Budget> {
    ensure_owner(store, owner)?;
    store.set_budget(daily, weekly, monthly)
}

fn ensure_owner(store: &mut ExpenseStore, owner: &OwnerId) -> Result<()> {
    if store.owner().ok() == Some(owner) {
        return Ok(());
    }
    store.connect(&StaticIdentity::connected(owner.clone()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::errors::ExpenseError;
    use crate::storage::{MemoryStorage, OwnerSnapshot, StorageBackend};

    #[test]
    fn add_expense_switches_between_owners() {
        let mut store = ExpenseStore::new(Box::new(MemoryStorage::new()), Config::default());
        let alice = OwnerId::new("alice");
        let bob = OwnerId::new("bob");

        add_expense(&mut store, &alice, 4.0, ExpenseCategory::Food, "Bagel").unwrap();
        add_expense(&mut store, &bob, 9.0, ExpenseCategory::Transport, "Taxi").unwrap();
        add_expense(&mut store, &alice, 1.0, ExpenseCategory::Misc, "Gum").unwrap();

        assert_eq!(store.owner().unwrap(), &alice);
        let descriptions: Vec<_> = store
            .expenses()
            .unwrap()
            .iter()
            .map(|expense| expense.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["Gum", "Bagel"]);
    }

    struct NoSaveStorage;

    impl StorageBackend for NoSaveStorage {
        fn load(&self, owner: &OwnerId) -> Result<OwnerSnapshot> {
            Ok(OwnerSnapshot::empty(owner.clone()))
        }

        fn save(&self, _owner: &OwnerId, _snapshot: &OwnerSnapshot) -> Result<()> {
            Err(ExpenseError::Persistence("read-only".into()))
        }
    }

    #[test]
    fn unsaved_owner_is_not_silently_replaced() {
        let mut store = ExpenseStore::new(Box::new(NoSaveStorage), Config::default());
        let alice = OwnerId::new("alice");
        let bob = OwnerId::new("bob");

        let err = add_expense(&mut store, &alice, 4.0, ExpenseCategory::Food, "Bagel").unwrap_err();
        assert!(matches!(err, ExpenseError::Persistence(_)));
        // Same owner keeps working on the in-memory session.
        let _ = add_expense(&mut store, &alice, 1.0, ExpenseCategory::Misc, "Gum");
        assert_eq!(store.expenses().unwrap().len(), 2);

        let err = set_budget(&mut store, &bob, 1.0, 2.0, 3.0).unwrap_err();
        assert!(matches!(err, ExpenseError::Persistence(_)));
        assert_eq!(store.owner().unwrap(), &alice);
        assert_eq!(store.expenses().unwrap().len(), 2);
    }

    #[test]
    fn blank_owner_is_not_authenticated() {
        let mut store = ExpenseStore::new(Box::new(MemoryStorage::new()), Config::default());
        let err = set_budget(&mut store, &OwnerId::new(""), 1.0, 2.0, 3.0).unwrap_err();
        assert!(matches!(err, ExpenseError::NotAuthenticated));
    }
}
