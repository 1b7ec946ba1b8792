use serde::{Deserialize, Serialize};

use crate::domain::{
    budget::BudgetWindow, category::ExpenseCategory, expense::Expense, health::BudgetHealth,
};

/// Sums of expense amounts per spending window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpendingTotals {
    pub today: f64,
    pub week: f64,
    pub month: f64,
}

impl SpendingTotals {
    pub fn for_window(&self, window: BudgetWindow) -> f64 {
        match window {
            BudgetWindow::Daily => self.today,
            BudgetWindow::Weekly => self.week,
            BudgetWindow::Monthly => self.month,
        }
    }
}

/// Share of total spending attributed to a single category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: ExpenseCategory,
    pub amount: f64,
    pub percentage: f64,
    pub color: String,
}

/// Everything the dashboard view renders, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub totals: SpendingTotals,
    pub budget_health: Option<BudgetHealth>,
    pub recent_expenses: Vec<Expense>,
    pub category_breakdown: Vec<CategoryBreakdown>,
    pub expense_count: usize,
}
