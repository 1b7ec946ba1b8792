mod common;

use chrono::{DateTime, Duration, TimeZone, Utc};
use common::reference_now;
use expense_core::{
    compute_budget_health, compute_category_breakdown, compute_spending_totals,
    domain::{Budget, BudgetLimits, CurrencyCode, Expense, ExpenseCategory, HealthScore, OwnerId},
    ExpenseError,
};

fn expense(amount: f64, category: ExpenseCategory, date: DateTime<Utc>) -> Expense {
    Expense::new(OwnerId::new("0xabc"), amount, category, "item", date)
}

fn budget(daily: f64, weekly: f64, monthly: f64) -> Budget {
    Budget::new(
        OwnerId::new("0xabc"),
        BudgetLimits::new(daily, weekly, monthly),
        CurrencyCode::default(),
    )
}

#[test]
fn totals_follow_calendar_windows() {
    let now = reference_now();
    let today = now.with_timezone(&Utc) - Duration::hours(1);
    let monday = Utc.with_ymd_and_hms(2024, 5, 13, 9, 0, 0).unwrap();
    let first_of_month = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    let last_month = Utc.with_ymd_and_hms(2024, 4, 30, 23, 59, 59).unwrap();
    let tomorrow = now.with_timezone(&Utc) + Duration::days(1);
    let expenses = vec![
        expense(10.0, ExpenseCategory::Food, today),
        expense(20.0, ExpenseCategory::Transport, monday),
        expense(40.0, ExpenseCategory::School, first_of_month),
        expense(80.0, ExpenseCategory::Misc, last_month),
        expense(160.0, ExpenseCategory::Misc, tomorrow),
    ];

    let totals = compute_spending_totals(&expenses, &now);
    assert_eq!(totals.today, 10.0);
    assert_eq!(totals.week, 30.0);
    assert_eq!(totals.month, 70.0);
}

#[test]
fn empty_list_is_green_with_full_remaining() {
    let health = compute_budget_health(&[], &budget(25.0, 150.0, 600.0), &reference_now()).unwrap();
    assert_eq!(health.score, HealthScore::Green);
    assert_eq!(health.percentage, 0.0);
    assert_eq!(health.remaining_daily, 25.0);
    assert_eq!(health.remaining_weekly, 150.0);
    assert_eq!(health.remaining_monthly, 600.0);
}

#[test]
fn worst_window_decides_score() {
    let now = reference_now();
    let expenses = vec![expense(48.0, ExpenseCategory::Food, now.with_timezone(&Utc))];
    let health = compute_budget_health(&expenses, &budget(1000.0, 1000.0, 55.0), &now).unwrap();
    assert_eq!(health.score, HealthScore::Yellow);
    assert!((health.percentage - 87.27).abs() < 0.01);
    assert_eq!(health.remaining_monthly, 7.0);
}

#[test]
fn zero_limit_is_reported() {
    let err = compute_budget_health(&[], &budget(0.0, 150.0, 600.0), &reference_now()).unwrap_err();
    assert!(matches!(err, ExpenseError::DivideByZeroConfig { .. }));
}

#[test]
fn breakdown_is_sorted_and_sums_to_hundred() {
    let now = reference_now().with_timezone(&Utc);
    let expenses = vec![
        expense(5.0, ExpenseCategory::Misc, now),
        expense(30.0, ExpenseCategory::Food, now),
        expense(15.0, ExpenseCategory::Transport, now),
        expense(5.0, ExpenseCategory::Food, now),
    ];
    let breakdown = compute_category_breakdown(&expenses);
    let order: Vec<_> = breakdown.iter().map(|entry| entry.category).collect();
    assert_eq!(
        order,
        vec![ExpenseCategory::Food, ExpenseCategory::Transport, ExpenseCategory::Misc]
    );
    let total: f64 = breakdown.iter().map(|entry| entry.percentage).sum();
    assert!((total - 100.0).abs() < 1e-9);
    assert_eq!(breakdown[0].color, "#ef4444");
}
