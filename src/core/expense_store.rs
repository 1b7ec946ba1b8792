//! Session facade that owns one owner's expenses and budget.

use tracing::{info, warn};

use crate::config::Config;
use crate::core::{
    errors::{ExpenseError, Result},
    identity::IdentityProvider,
    services::{BudgetService, ExpenseService, SummaryService},
    submitter::{ExpenseEvent, TransactionSubmitter},
    time::{Clock, SystemClock},
    windows::SpendingWindows,
};
use crate::domain::{
    Budget, BudgetHealth, BudgetLimits, CategoryBreakdown, DashboardStats, Expense,
    ExpenseCategory, OwnerId, SpendingTotals,
};
use crate::storage::{OwnerSnapshot, StorageBackend};

struct OwnerSession {
    owner: OwnerId,
    expenses: Vec<Expense>,
    budget: Budget,
    // False while the owner runs on the configured starter budget.
    budget_stored: bool,
    // Set when the last write-through failed.
    unsaved: bool,
}

impl OwnerSession {
    fn snapshot(&self) -> OwnerSnapshot {
        OwnerSnapshot::new(
            self.owner.clone(),
            self.expenses.clone(),
            self.budget_stored.then(|| self.budget.clone()),
        )
    }
}

/// Holds the connected owner's expense list (most recent first) and active
/// budget, and writes every mutation through to the storage backend.
///
/// A store is created per session: `connect` loads an owner, `disconnect`
/// drops all in-memory state. Mutations take `&mut self`, so a single
/// owner's read-modify-write sequence is never interleaved.
pub struct ExpenseStore {
    config: Config,
    storage: Box<dyn StorageBackend>,
    submitter: Option<Box<dyn TransactionSubmitter>>,
    clock: Box<dyn Clock>,
    session: Option<OwnerSession>,
}

impl ExpenseStore {
    pub fn new(storage: Box<dyn StorageBackend>, config: Config) -> Self {
        Self {
            config,
            storage,
            submitter: None,
            clock: Box::new(SystemClock),
            session: None,
        }
    }

    pub fn with_submitter(mut self, submitter: Box<dyn TransactionSubmitter>) -> Self {
        self.submitter = Some(submitter);
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    /// Loads the owner reported by `identity`. Any previous session is
    /// replaced only when the load succeeds.
    ///
    /// Refuses with `ExpenseError::Persistence` while the current session
    /// holds changes that failed to save; call [`save`](Self::save) or
    /// [`disconnect`](Self::disconnect) first.
    pub fn connect(&mut self, identity: &dyn IdentityProvider) -> Result<&OwnerId> {
        let owner = identity
            .current_owner()
            .ok_or(ExpenseError::NotAuthenticated)?;
        if let Some(current) = self.session.as_ref().filter(|session| session.unsaved) {
            return Err(ExpenseError::Persistence(format!(
                "unsaved changes for `{}`; save or disconnect before switching owner",
                current.owner
            )));
        }
        let session = self.load_session(owner)?;
        info!(
            owner = %session.owner,
            expenses = session.expenses.len(),
            "owner connected"
        );
        let session = self.session.insert(session);
        Ok(&session.owner)
    }

    /// Tears down the session, returning the owner that was connected.
    /// Changes that failed to save are dropped.
    pub fn disconnect(&mut self) -> Option<OwnerId> {
        let session = self.session.take()?;
        if session.unsaved {
            warn!(owner = %session.owner, "discarding unsaved changes on disconnect");
        }
        info!(owner = %session.owner, "owner disconnected");
        Some(session.owner)
    }

    /// Retries writing the session to storage.
    pub fn save(&mut self) -> Result<()> {
        let session = self.session.as_mut().ok_or(ExpenseError::NotAuthenticated)?;
        Self::persist(self.storage.as_ref(), session)
    }

    /// True when the last write-through failed and memory is ahead of storage.
    pub fn has_unsaved_changes(&self) -> bool {
        self.session.as_ref().is_some_and(|session| session.unsaved)
    }

    /// Re-reads the connected owner from storage, discarding unsaved state.
    pub fn reload(&mut self) -> Result<()> {
        let owner = self.owner()?.clone();
        let session = self.load_session(owner)?;
        self.session = Some(session);
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn owner(&self) -> Result<&OwnerId> {
        Ok(&self.session()?.owner)
    }

    pub fn expenses(&self) -> Result<&[Expense]> {
        Ok(&self.session()?.expenses)
    }

    pub fn budget(&self) -> Result<&Budget> {
        Ok(&self.session()?.budget)
    }

    /// Validates and records a new expense dated now.
    ///
    /// Ledger submission is best effort: on failure the expense is kept
    /// without a reference. When saving fails the expense stays in memory,
    /// `ExpenseError::Persistence` is returned, and switching owner is
    /// refused until [`save`](Self::save) succeeds or the owner disconnects.
    pub fn add_expense(
        &mut self,
        amount: f64,
        category: ExpenseCategory,
        description: &str,
    ) -> Result<Expense> {
        let now = self.clock.now_utc();
        let session = self.session.as_mut().ok_or(ExpenseError::NotAuthenticated)?;
        let mut expense =
            ExpenseService::create(&session.owner, amount, category, description, now)?;

        if let Some(submitter) = self.submitter.as_ref() {
            let event = ExpenseEvent::from_expense(&expense, &session.budget.currency);
            match submitter.submit(&event) {
                Ok(reference) => expense = expense.with_reference(reference),
                Err(err) => {
                    warn!(owner = %session.owner, error = %err, "ledger submission failed; keeping local record")
                }
            }
        }

        ExpenseService::prepend(&mut session.expenses, expense.clone());
        info!(
            owner = %session.owner,
            amount = expense.amount,
            category = %expense.category,
            "expense added"
        );
        Self::persist(self.storage.as_ref(), session)?;
        Ok(expense)
    }

    /// Replaces the owner's budget, keeping its currency.
    pub fn set_budget(&mut self, daily: f64, weekly: f64, monthly: f64) -> Result<Budget> {
        let session = self.session.as_mut().ok_or(ExpenseError::NotAuthenticated)?;
        let budget = BudgetService::replace(
            Some(&session.budget),
            &session.owner,
            BudgetLimits::new(daily, weekly, monthly),
            &self.config.currency,
        )?;
        session.budget = budget.clone();
        session.budget_stored = true;
        info!(owner = %session.owner, daily, weekly, monthly, "budget updated");
        Self::persist(self.storage.as_ref(), session)?;
        Ok(budget)
    }

    pub fn spending_totals(&self) -> Result<SpendingTotals> {
        let session = self.session()?;
        Ok(SummaryService::totals_in(&session.expenses, &self.windows()))
    }

    pub fn budget_health(&self) -> Result<BudgetHealth> {
        let session = self.session()?;
        let totals = SummaryService::totals_in(&session.expenses, &self.windows());
        SummaryService::health_from_totals(&totals, &session.budget)
    }

    pub fn category_breakdown(&self) -> Result<Vec<CategoryBreakdown>> {
        Ok(SummaryService::category_breakdown(&self.session()?.expenses))
    }

    pub fn recent_expenses(&self) -> Result<Vec<Expense>> {
        Ok(SummaryService::recent(
            &self.session()?.expenses,
            self.config.recent_limit,
        ))
    }

    pub fn dashboard(&self) -> Result<DashboardStats> {
        let session = self.session()?;
        SummaryService::dashboard_in(
            &session.expenses,
            Some(&session.budget),
            &self.windows(),
            self.config.recent_limit,
        )
    }

    fn windows(&self) -> SpendingWindows {
        self.clock.windows(self.config.week_start)
    }

    fn session(&self) -> Result<&OwnerSession> {
        self.session.as_ref().ok_or(ExpenseError::NotAuthenticated)
    }

    fn load_session(&self, owner: OwnerId) -> Result<OwnerSession> {
        let snapshot = self.storage.load(&owner)?;
        let (budget, budget_stored) = match snapshot.budget {
            Some(budget) => (budget, true),
            None => (
                Budget::new(
                    owner.clone(),
                    self.config.default_budget,
                    self.config.currency.clone(),
                ),
                false,
            ),
        };
        Ok(OwnerSession {
            owner,
            expenses: snapshot.expenses,
            budget,
            budget_stored,
            unsaved: false,
        })
    }

    fn persist(storage: &dyn StorageBackend, session: &mut OwnerSession) -> Result<()> {
        let result = storage.save(&session.owner, &session.snapshot());
        session.unsaved = result.is_err();
        result.map_err(|err| {
            warn!(owner = %session.owner, error = %err, "failed to persist owner state");
            match err {
                ExpenseError::Persistence(message) => ExpenseError::Persistence(message),
                other => ExpenseError::Persistence(other.to_string()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::StaticIdentity;
    use crate::core::submitter::MockLedgerSubmitter;
    use crate::core::time::FixedClock;
    use crate::domain::HealthScore;
    use crate::storage::MemoryStorage;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn store() -> ExpenseStore {
        let clock = FixedClock::utc(Utc.with_ymd_and_hms(2024, 5, 16, 12, 0, 0).unwrap());
        ExpenseStore::new(Box::new(MemoryStorage::new()), Config::default())
            .with_clock(Box::new(clock))
    }

    #[test]
    fn operations_require_a_connected_owner() {
        let mut store = store();
        assert!(matches!(
            store.add_expense(5.0, ExpenseCategory::Food, "Tea"),
            Err(ExpenseError::NotAuthenticated)
        ));
        assert!(matches!(
            store.set_budget(1.0, 2.0, 3.0),
            Err(ExpenseError::NotAuthenticated)
        ));
        assert!(matches!(store.spending_totals(), Err(ExpenseError::NotAuthenticated)));
        assert!(matches!(
            store.connect(&StaticIdentity::disconnected()),
            Err(ExpenseError::NotAuthenticated)
        ));
    }

    #[test]
    fn new_owner_starts_with_configured_budget() {
        let mut store = store();
        store.connect(&StaticIdentity::connected("0xabc")).unwrap();
        assert_eq!(store.budget().unwrap().limits, BudgetLimits::default());
        assert!(store.expenses().unwrap().is_empty());
        let stored = store.storage().load(&OwnerId::new("0xabc")).unwrap();
        assert!(stored.budget.is_none());
    }

    #[test]
    fn add_expense_prepends_and_persists() {
        let mut store = store().with_submitter(Box::new(MockLedgerSubmitter));
        store.connect(&StaticIdentity::connected("0xabc")).unwrap();
        store.add_expense(12.5, ExpenseCategory::Food, "Lunch").unwrap();
        let latest = store
            .add_expense(5.75, ExpenseCategory::Transport, "Bus fare")
            .unwrap();

        let expenses = store.expenses().unwrap();
        assert_eq!(expenses[0].id, latest.id);
        assert!(latest.transaction_reference.is_some());

        let stored = store.storage().load(&OwnerId::new("0xabc")).unwrap();
        assert_eq!(stored.expenses.len(), 2);
        assert_eq!(stored.expenses[0].description, "Bus fare");
    }

    #[test]
    fn rejected_expense_leaves_store_unchanged() {
        let mut store = store();
        store.connect(&StaticIdentity::connected("0xabc")).unwrap();
        let err = store
            .add_expense(-5.0, ExpenseCategory::Misc, "Refund")
            .unwrap_err();
        assert!(err.is_validation());
        assert!(store.expenses().unwrap().is_empty());
    }

    #[test]
    fn set_budget_replaces_limits_and_drives_health() {
        let mut store = store();
        store.connect(&StaticIdentity::connected("0xabc")).unwrap();
        store.add_expense(23.0, ExpenseCategory::School, "Books").unwrap();
        assert_eq!(store.budget_health().unwrap().score, HealthScore::Red);

        let budget = store.set_budget(100.0, 300.0, 900.0).unwrap();
        assert_eq!(budget.daily_limit(), 100.0);
        assert_eq!(store.budget_health().unwrap().score, HealthScore::Green);
        let stored = store.storage().load(&OwnerId::new("0xabc")).unwrap();
        assert_eq!(stored.budget, Some(budget));
    }

    #[test]
    fn disconnect_clears_session() {
        let mut store = store();
        store.connect(&StaticIdentity::connected("0xabc")).unwrap();
        assert_eq!(store.disconnect(), Some(OwnerId::new("0xabc")));
        assert!(!store.is_connected());
        assert!(store.disconnect().is_none());
    }

    #[test]
    fn month_window_uses_offset_in_force_on_the_first() {
        use chrono_tz::America::New_York;

        // 00:30 EDT on Nov 1; the store's clock reads Nov 10 in EST.
        let owner = OwnerId::new("0xabc");
        let early = Expense::new(
            owner.clone(),
            10.0,
            ExpenseCategory::Food,
            "Bagel",
            Utc.with_ymd_and_hms(2024, 11, 1, 4, 30, 0).unwrap(),
        );
        let storage = MemoryStorage::new()
            .with_snapshot(OwnerSnapshot::new(owner, vec![early], None));
        let clock = FixedClock(New_York.with_ymd_and_hms(2024, 11, 10, 12, 0, 0).unwrap());
        let mut store = ExpenseStore::new(Box::new(storage), Config::default())
            .with_clock(Box::new(clock));
        store.connect(&StaticIdentity::connected("0xabc")).unwrap();

        let totals = store.spending_totals().unwrap();
        assert_eq!(totals.month, 10.0);
        assert_eq!(totals.week, 0.0);
        assert_eq!(store.dashboard().unwrap().totals, totals);
    }

    struct SwitchableStorage {
        inner: MemoryStorage,
        failing: Arc<AtomicBool>,
    }

    impl StorageBackend for SwitchableStorage {
        fn load(&self, owner: &OwnerId) -> Result<OwnerSnapshot> {
            self.inner.load(owner)
        }

        fn save(&self, owner: &OwnerId, snapshot: &OwnerSnapshot) -> Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(ExpenseError::Persistence("disk full".into()));
            }
            self.inner.save(owner, snapshot)
        }
    }

    #[test]
    fn unsaved_changes_block_owner_switch_until_saved() {
        let failing = Arc::new(AtomicBool::new(true));
        let storage = SwitchableStorage {
            inner: MemoryStorage::new(),
            failing: Arc::clone(&failing),
        };
        let clock = FixedClock::utc(Utc.with_ymd_and_hms(2024, 5, 16, 12, 0, 0).unwrap());
        let mut store = ExpenseStore::new(Box::new(storage), Config::default())
            .with_clock(Box::new(clock));
        store.connect(&StaticIdentity::connected("0xabc")).unwrap();

        let err = store
            .add_expense(4.0, ExpenseCategory::Food, "Tea")
            .unwrap_err();
        assert!(matches!(err, ExpenseError::Persistence(_)));
        assert!(store.has_unsaved_changes());
        assert!(matches!(
            store.connect(&StaticIdentity::connected("0xdef")),
            Err(ExpenseError::Persistence(_))
        ));
        assert_eq!(store.owner().unwrap(), &OwnerId::new("0xabc"));

        failing.store(false, Ordering::SeqCst);
        store.save().unwrap();
        assert!(!store.has_unsaved_changes());
        store.connect(&StaticIdentity::connected("0xdef")).unwrap();

        store.connect(&StaticIdentity::connected("0xabc")).unwrap();
        assert_eq!(store.expenses().unwrap().len(), 1);
    }
}
