/// Storage capabilities used by the budget core
///
/// The provisioner and the statistics aggregator never talk to Postgres
/// directly. They depend on the two traits below, which keeps them testable
/// against [`memory::MemoryStore`] and lets [`postgres::PgStore`] own every
/// SQL and transaction detail.
///
/// # Contract
///
/// - [`AnnualBudgetStore::create`] writes the budget row and its default
///   items atomically. It returns `Ok(None)` when a budget for the same
///   `(user, year)` already exists so the caller can fall back to a lookup.
/// - [`AnnualBudgetStore::create`] reports [`StoreError::UnknownUser`] when
///   the owner has no user row.
/// - Item writes are scoped to the caller: an item or budget that belongs to
///   another user is reported exactly like a missing one.
/// - [`TransactionSource::list_for_period`] returns rows ordered by
///   `(date, id)`.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::annual_budget::{AnnualBudget, AnnualBudgetItem, NewAnnualBudgetItem};
use crate::models::transaction::Transaction;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Query or connection failure in the database driver
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Backend is not reachable or refused the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The owning user has no row, so nothing can reference it
    #[error("Unknown user: {0}")]
    UnknownUser(Uuid),
}

/// Storage result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// A budget as returned by [`AnnualBudgetStore::create`]
pub type CreatedBudget = (AnnualBudget, Vec<AnnualBudgetItem>);

/// Persistence for annual budgets and their items
#[async_trait]
pub trait AnnualBudgetStore: Send + Sync {
    /// Looks up the budget a user has for a year
    async fn find_by_user_and_year(
        &self,
        user_id: Uuid,
        year: i32,
    ) -> StoreResult<Option<AnnualBudget>>;

    /// Creates a budget together with its default items
    ///
    /// Returns `Ok(None)` if the `(user_id, year)` budget already exists.
    /// Nothing is persisted when any part of the write fails.
    async fn create(
        &self,
        user_id: Uuid,
        year: i32,
        defaults: &[NewAnnualBudgetItem],
    ) -> StoreResult<Option<CreatedBudget>>;

    /// Lists a budget's items ordered by due date
    async fn list_items(&self, annual_budget_id: i64) -> StoreResult<Vec<AnnualBudgetItem>>;

    /// Adds an item to a budget owned by `user_id`
    ///
    /// Returns `Ok(None)` if the budget does not exist or is not the user's.
    async fn create_item(
        &self,
        user_id: Uuid,
        annual_budget_id: i64,
        item: &NewAnnualBudgetItem,
    ) -> StoreResult<Option<AnnualBudgetItem>>;

    /// Replaces an item's fields if it belongs to one of `user_id`'s budgets
    async fn update_item(
        &self,
        user_id: Uuid,
        item_id: i64,
        item: &NewAnnualBudgetItem,
    ) -> StoreResult<Option<AnnualBudgetItem>>;

    /// Deletes an item if it belongs to one of `user_id`'s budgets
    ///
    /// Returns whether an item was removed.
    async fn delete_item(&self, user_id: Uuid, item_id: i64) -> StoreResult<bool>;

    /// Verifies the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}

/// Read-only access to spending transactions
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Lists a user's transactions dated within `[start, end]`
    async fn list_for_period(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<Transaction>>;
}
