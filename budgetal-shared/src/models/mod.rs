/// Database models for Budgetal
///
/// This module contains the row models and the queries that read and write
/// them. Business rules live in [`crate::budget`]; these types only know how
/// to move rows in and out of Postgres.
///
/// # Models
///
/// - `user`: Owners of budgets and transactions
/// - `annual_budget`: One budget per user and year, plus its line items
/// - `transaction`: Spending records consumed by the statistics aggregator
///
/// # Example
///
/// ```no_run
/// use budgetal_shared::models::annual_budget::AnnualBudget;
/// use budgetal_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let budget = AnnualBudget::find_by_user_and_year(&pool, Uuid::new_v4(), 2017).await?;
/// assert!(budget.is_none());
/// # Ok(())
/// # }
/// ```

pub mod annual_budget;
pub mod transaction;
pub mod user;
