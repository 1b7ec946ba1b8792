//! Business logic: validation, analytics, and the owner-scoped store.

pub mod errors;
pub mod expense_store;
pub mod identity;
pub mod public_api;
pub mod services;
pub mod submitter;
pub mod time;
pub mod utils;
pub mod windows;

pub use errors::{ExpenseError, Result};
pub use expense_store::ExpenseStore;
