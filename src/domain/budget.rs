use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{common::OwnerId, currency::CurrencyCode};

/// The three overlapping spending windows a budget constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BudgetWindow {
    Daily,
    Weekly,
    Monthly,
}

impl BudgetWindow {
    pub const ALL: [BudgetWindow; 3] = [
        BudgetWindow::Daily,
        BudgetWindow::Weekly,
        BudgetWindow::Monthly,
    ];
}

impl fmt::Display for BudgetWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetWindow::Daily => "daily",
            BudgetWindow::Weekly => "weekly",
            BudgetWindow::Monthly => "monthly",
        };
        f.write_str(label)
    }
}

/// Spending caps for each window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetLimits {
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
}

impl BudgetLimits {
    pub fn new(daily: f64, weekly: f64, monthly: f64) -> Self {
        Self {
            daily,
            weekly,
            monthly,
        }
    }

    pub fn get(&self, window: BudgetWindow) -> f64 {
        match window {
            BudgetWindow::Daily => self.daily,
            BudgetWindow::Weekly => self.weekly,
            BudgetWindow::Monthly => self.monthly,
        }
    }
}

impl Default for BudgetLimits {
    fn default() -> Self {
        Self::new(25.0, 150.0, 600.0)
    }
}

/// The single active budget of an owner. Replaced wholesale on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub owner: OwnerId,
    pub limits: BudgetLimits,
    pub currency: CurrencyCode,
}

impl Budget {
    pub fn new(owner: OwnerId, limits: BudgetLimits, currency: CurrencyCode) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            limits,
            currency,
        }
    }

    pub fn daily_limit(&self) -> f64 {
        self.limits.daily
    }

    pub fn weekly_limit(&self) -> f64 {
        self.limits.weekly
    }

    pub fn monthly_limit(&self) -> f64 {
        self.limits.monthly
    }
}
