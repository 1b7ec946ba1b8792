#![doc(test(attr(deny(warnings))))]

//! Expense Core keeps a per-owner list of expenses and a spending budget,
//! and derives spending totals, budget health, and category breakdowns
//! from them.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod storage;
pub mod utils;

use std::sync::Once;

pub use crate::core::public_api::{
    add_expense, compute_budget_health, compute_category_breakdown, compute_spending_totals,
    set_budget,
};
pub use crate::core::{ExpenseError, ExpenseStore, Result};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense Core tracing initialized.");
    });
}
