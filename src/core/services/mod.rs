pub mod budget_service;
pub mod expense_service;
pub mod summary_service;

pub use budget_service::BudgetService;
pub use expense_service::{ExpenseService, MAX_DESCRIPTION_CHARS};
pub use summary_service::SummaryService;
