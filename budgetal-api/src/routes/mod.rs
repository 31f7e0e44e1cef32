/// API route handlers
///
/// - `health`: Health check endpoint
/// - `annual_budgets`: Get-or-create of a user's budget for a year
/// - `annual_budget_items`: Create, update and delete budget items
/// - `monthly_statistics`: Per-category spending for a month
///
/// Handlers only translate between HTTP and the budget services; rules
/// live in `budgetal_shared::budget`.

pub mod annual_budget_items;
pub mod annual_budgets;
pub mod health;
pub mod monthly_statistics;
