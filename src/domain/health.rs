//! Budget health classification types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::budget::BudgetWindow;

/// Traffic-light utilisation tier. Ordering is by severity, so the worst of
/// several scores is their `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthScore {
    Green,
    Yellow,
    Red,
}

impl HealthScore {
    /// Upper bound (inclusive) of the green tier, in percent.
    pub const GREEN_MAX: f64 = 70.0;
    /// Upper bound (inclusive) of the yellow tier, in percent.
    pub const YELLOW_MAX: f64 = 90.0;

    pub fn classify(percentage: f64) -> Self {
        if percentage <= Self::GREEN_MAX {
            HealthScore::Green
        } else if percentage <= Self::YELLOW_MAX {
            HealthScore::Yellow
        } else {
            HealthScore::Red
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            HealthScore::Green => "Great job staying within budget!",
            HealthScore::Yellow => "Close to limit - watch spending",
            HealthScore::Red => "Over budget - time to cut back!",
        }
    }
}

impl fmt::Display for HealthScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HealthScore::Green => "green",
            HealthScore::Yellow => "yellow",
            HealthScore::Red => "red",
        };
        f.write_str(label)
    }
}

/// Utilisation of a single window against its limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowHealth {
    pub window: BudgetWindow,
    pub spent: f64,
    pub limit: f64,
    pub percentage: f64,
    pub score: HealthScore,
}

impl WindowHealth {
    /// Never negative, even when the window is over budget.
    pub fn remaining(&self) -> f64 {
        (self.limit - self.spent).max(0.0)
    }
}

/// Overall budget health across the daily, weekly and monthly windows.
///
/// `score` is the worst per-window score while `percentage` is the highest
/// per-window utilisation. The two can come from different windows: a
/// monthly window at 95% and a daily window at 120% yield `Red` with 120%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetHealth {
    pub score: HealthScore,
    pub percentage: f64,
    pub message: String,
    pub remaining_daily: f64,
    pub remaining_weekly: f64,
    pub remaining_monthly: f64,
    pub daily: WindowHealth,
    pub weekly: WindowHealth,
    pub monthly: WindowHealth,
}

impl BudgetHealth {
    pub fn from_windows(daily: WindowHealth, weekly: WindowHealth, monthly: WindowHealth) -> Self {
        let score = daily.score.max(weekly.score).max(monthly.score);
        let percentage = daily
            .percentage
            .max(weekly.percentage)
            .max(monthly.percentage);
        Self {
            score,
            percentage,
            message: score.message().to_string(),
            remaining_daily: daily.remaining(),
            remaining_weekly: weekly.remaining(),
            remaining_monthly: monthly.remaining(),
            daily,
            weekly,
            monthly,
        }
    }

    /// Percentage as shown to users: rounded and clamped to 100.
    pub fn display_percentage(&self) -> u32 {
        self.percentage.round().clamp(0.0, 100.0) as u32
    }

    pub fn window(&self, window: BudgetWindow) -> &WindowHealth {
        match window {
            BudgetWindow::Daily => &self.daily,
            BudgetWindow::Weekly => &self.weekly,
            BudgetWindow::Monthly => &self.monthly,
        }
    }
}
