//! Pure spending analytics over an owner's expense list.

use chrono::{DateTime, TimeZone, Weekday};
use tracing::debug;

use crate::core::errors::{ExpenseError, Result};
use crate::core::windows::SpendingWindows;
use crate::domain::{
    Budget, BudgetHealth, BudgetWindow, CategoryBreakdown, DashboardStats, Expense,
    ExpenseCategory, HealthScore, SpendingTotals, WindowHealth,
};

/// Stateless analytics helpers. Identical inputs always yield identical outputs.
pub struct SummaryService;

impl SummaryService {
    /// Sums expenses falling in the day, week and month windows ending at `now`.
    pub fn spending_totals<Tz: TimeZone>(
        expenses: &[Expense],
        now: &DateTime<Tz>,
        first_weekday: Weekday,
    ) -> SpendingTotals {
        let windows = SpendingWindows::containing(now, first_weekday);
        Self::totals_in(expenses, &windows)
    }

    pub fn totals_in(expenses: &[Expense], windows: &SpendingWindows) -> SpendingTotals {
        let sum = |window: BudgetWindow| -> f64 {
            expenses
                .iter()
                .filter(|expense| windows.contains(window, &expense.date))
                .fold(0.0, |total, expense| total + expense.amount)
        };
        SpendingTotals {
            today: sum(BudgetWindow::Daily),
            week: sum(BudgetWindow::Weekly),
            month: sum(BudgetWindow::Monthly),
        }
    }

    /// Classifies a single spent/limit pair.
    pub fn window_health(window: BudgetWindow, spent: f64, limit: f64) -> Result<WindowHealth> {
        if limit == 0.0 {
            return Err(ExpenseError::DivideByZeroConfig { window });
        }
        if !limit.is_finite() || limit < 0.0 {
            return Err(ExpenseError::validation(format!(
                "{} limit must be a positive amount, got {}",
                window, limit
            )));
        }
        let percentage = spent / limit * 100.0;
        Ok(WindowHealth {
            window,
            spent,
            limit,
            percentage,
            score: HealthScore::classify(percentage),
        })
    }

    /// Evaluates every window against the budget and folds them into the
    /// overall health (worst score, highest percentage).
    pub fn budget_health<Tz: TimeZone>(
        expenses: &[Expense],
        budget: &Budget,
        now: &DateTime<Tz>,
        first_weekday: Weekday,
    ) -> Result<BudgetHealth> {
        let totals = Self::spending_totals(expenses, now, first_weekday);
        Self::health_from_totals(&totals, budget)
    }

    pub fn health_from_totals(totals: &SpendingTotals, budget: &Budget) -> Result<BudgetHealth> {
        let evaluate = |window: BudgetWindow| {
            Self::window_health(window, totals.for_window(window), budget.limits.get(window))
        };
        let health = BudgetHealth::from_windows(
            evaluate(BudgetWindow::Daily)?,
            evaluate(BudgetWindow::Weekly)?,
            evaluate(BudgetWindow::Monthly)?,
        );
        debug!(
            score = %health.score,
            percentage = health.percentage,
            "computed budget health"
        );
        Ok(health)
    }

    /// Totals per category with each category's share of all spending.
    ///
    /// Categories without expenses are omitted. Entries are ordered by amount
    /// descending; equal amounts keep the order of first occurrence.
    pub fn category_breakdown(expenses: &[Expense]) -> Vec<CategoryBreakdown> {
        let mut totals: Vec<(ExpenseCategory, f64)> = Vec::new();
        for expense in expenses {
            match totals.iter_mut().find(|(category, _)| *category == expense.category) {
                Some((_, amount)) => *amount += expense.amount,
                None => totals.push((expense.category, expense.amount)),
            }
        }
        totals.sort_by(|a, b| b.1.total_cmp(&a.1));

        let grand_total = totals.iter().fold(0.0, |total, (_, amount)| total + amount);
        totals
            .into_iter()
            .map(|(category, amount)| CategoryBreakdown {
                category,
                amount,
                percentage: if grand_total > 0.0 {
                    amount / grand_total * 100.0
                } else {
                    0.0
                },
                color: category.color().to_string(),
            })
            .collect()
    }

    /// The `limit` most recent expenses by date, newest first.
    pub fn recent(expenses: &[Expense], limit: usize) -> Vec<Expense> {
        let mut sorted: Vec<&Expense> = expenses.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted.into_iter().take(limit).cloned().collect()
    }

    pub fn dashboard<Tz: TimeZone>(
        expenses: &[Expense],
        budget: Option<&Budget>,
        now: &DateTime<Tz>,
        first_weekday: Weekday,
        recent_limit: usize,
    ) -> Result<DashboardStats> {
        let windows = SpendingWindows::containing(now, first_weekday);
        Self::dashboard_in(expenses, budget, &windows, recent_limit)
    }

    /// Dashboard over precomputed window boundaries.
    pub fn dashboard_in(
        expenses: &[Expense],
        budget: Option<&Budget>,
        windows: &SpendingWindows,
        recent_limit: usize,
    ) -> Result<DashboardStats> {
        let totals = Self::totals_in(expenses, windows);
        let budget_health = budget
            .map(|budget| Self::health_from_totals(&totals, budget))
            .transpose()?;
        Ok(DashboardStats {
            totals,
            budget_health,
            recent_expenses: Self::recent(expenses, recent_limit),
            category_breakdown: Self::category_breakdown(expenses),
            expense_count: expenses.len(),
        })
    }
}
