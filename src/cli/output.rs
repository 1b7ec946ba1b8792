use std::io::IsTerminal;

use colored::{Color, Colorize};

use crate::domain::{
    format_currency, BudgetHealth, CategoryBreakdown, CurrencyCode, Expense, HealthScore,
    SpendingTotals,
};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

/// Colour is used only on an interactive terminal and when `NO_COLOR` is unset.
pub fn configure_colors() {
    let enabled = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    colored::control::set_override(enabled);
}

pub fn styled(kind: MessageKind, message: &str) -> String {
    match kind {
        MessageKind::Info => message.to_string(),
        MessageKind::Success => format!("{} {}", "[ok]".green(), message),
        MessageKind::Warning => format!("{} {}", "[!]".yellow(), message),
        MessageKind::Error => format!("{} {}", "[x]".red(), message),
        MessageKind::Section => message.bold().to_string(),
    }
}

fn score_color(score: HealthScore) -> Color {
    match score {
        HealthScore::Green => Color::Green,
        HealthScore::Yellow => Color::Yellow,
        HealthScore::Red => Color::Red,
    }
}

pub fn render_totals(totals: &SpendingTotals, currency: &CurrencyCode) -> String {
    format!(
        "{}\n  Today:      {}\n  This week:  {}\n  This month: {}",
        styled(MessageKind::Section, "Spending"),
        format_currency(totals.today, currency),
        format_currency(totals.week, currency),
        format_currency(totals.month, currency),
    )
}

pub fn render_health(health: &BudgetHealth, currency: &CurrencyCode) -> String {
    let badge = health
        .score
        .to_string()
        .color(score_color(health.score))
        .bold();
    format!(
        "{} {}\n  {}% of budget used\n  {}\n  Daily left:   {}\n  Weekly left:  {}\n  Monthly left: {}",
        styled(MessageKind::Section, "Budget health:"),
        badge,
        health.display_percentage(),
        health.message,
        format_currency(health.remaining_daily, currency),
        format_currency(health.remaining_weekly, currency),
        format_currency(health.remaining_monthly, currency),
    )
}

pub fn render_breakdown(entries: &[CategoryBreakdown], currency: &CurrencyCode) -> String {
    if entries.is_empty() {
        return "No expenses recorded yet.".to_string();
    }
    let mut lines = vec![styled(MessageKind::Section, "By category")];
    for entry in entries {
        lines.push(format!(
            "  {} {:<10} {:>12} {:>5.1}%",
            entry.category.icon(),
            entry.category.as_str(),
            format_currency(entry.amount, currency),
            entry.percentage
        ));
    }
    lines.join("\n")
}

pub fn render_expenses(expenses: &[Expense], total: usize, currency: &CurrencyCode) -> String {
    if expenses.is_empty() {
        return "No expenses recorded yet.".to_string();
    }
    let mut lines = vec![styled(
        MessageKind::Section,
        &format!("Recent expenses ({} total)", total),
    )];
    for expense in expenses {
        let reference = expense
            .transaction_reference
            .as_ref()
            .map(|reference| format!("  {}", reference.short()))
            .unwrap_or_default();
        lines.push(format!(
            "  {} {}  {}  {}{}",
            expense.date.format("%Y-%m-%d %H:%M"),
            expense.category.icon(),
            format_currency(expense.amount, currency),
            expense.description,
            reference
        ));
    }
    lines.join("\n")
}
