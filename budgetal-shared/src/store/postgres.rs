/// Postgres-backed store
///
/// Provisioning runs in a single transaction: the budget insert uses
/// `ON CONFLICT (user_id, year) DO NOTHING`, and the default items are
/// written on the same connection. A conflict rolls back and reports
/// `None`; an item failure rolls back the budget row with it. A budget for a
/// user without a `users` row is reported as [`StoreError::UnknownUser`].
///
/// Item writes join through `annual_budgets` so a user can only touch items
/// of their own budgets.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{AnnualBudgetStore, CreatedBudget, StoreError, StoreResult, TransactionSource};
use crate::db::pool::health_check;
use crate::models::annual_budget::{AnnualBudget, AnnualBudgetItem, NewAnnualBudgetItem};
use crate::models::transaction::Transaction;

/// Store backed by a Postgres connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AnnualBudgetStore for PgStore {
    async fn find_by_user_and_year(
        &self,
        user_id: Uuid,
        year: i32,
    ) -> StoreResult<Option<AnnualBudget>> {
        Ok(AnnualBudget::find_by_user_and_year(&self.pool, user_id, year).await?)
    }

    async fn create(
        &self,
        user_id: Uuid,
        year: i32,
        defaults: &[NewAnnualBudgetItem],
    ) -> StoreResult<Option<CreatedBudget>> {
        let mut tx = self.pool.begin().await?;

        let inserted = AnnualBudget::insert_if_absent(&mut *tx, user_id, year)
            .await
            .map_err(|err| owner_error(err, user_id))?;
        let Some(budget) = inserted else {
            debug!(%user_id, year, "Annual budget already exists, skipping insert");
            tx.rollback().await?;
            return Ok(None);
        };

        let items = AnnualBudgetItem::create_defaults(&mut *tx, budget.id, defaults).await?;
        tx.commit().await?;

        debug!(
            %user_id,
            year,
            annual_budget_id = budget.id,
            items = items.len(),
            "Inserted annual budget with default items"
        );

        Ok(Some((budget, items)))
    }

    async fn list_items(&self, annual_budget_id: i64) -> StoreResult<Vec<AnnualBudgetItem>> {
        Ok(AnnualBudgetItem::list_by_budget(&self.pool, annual_budget_id).await?)
    }

    async fn create_item(
        &self,
        user_id: Uuid,
        annual_budget_id: i64,
        item: &NewAnnualBudgetItem,
    ) -> StoreResult<Option<AnnualBudgetItem>> {
        let mut tx = self.pool.begin().await?;

        if AnnualBudget::find_owned(&mut *tx, annual_budget_id, user_id)
            .await?
            .is_none()
        {
            tx.rollback().await?;
            return Ok(None);
        }

        let created = AnnualBudgetItem::create(&mut *tx, annual_budget_id, item).await?;
        tx.commit().await?;

        Ok(Some(created))
    }

    async fn update_item(
        &self,
        user_id: Uuid,
        item_id: i64,
        item: &NewAnnualBudgetItem,
    ) -> StoreResult<Option<AnnualBudgetItem>> {
        Ok(AnnualBudgetItem::update_owned(&self.pool, item_id, user_id, item).await?)
    }

    async fn delete_item(&self, user_id: Uuid, item_id: i64) -> StoreResult<bool> {
        Ok(AnnualBudgetItem::delete_owned(&self.pool, item_id, user_id).await?)
    }

    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }
}

/// SQLSTATE for `foreign_key_violation`
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// A budget insert can only violate the `users` foreign key
fn owner_error(err: sqlx::Error, user_id: Uuid) -> StoreError {
    let is_fk_violation = err
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == FOREIGN_KEY_VIOLATION);

    if is_fk_violation {
        StoreError::UnknownUser(user_id)
    } else {
        StoreError::Database(err)
    }
}

#[async_trait]
impl TransactionSource for PgStore {
    async fn list_for_period(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<Transaction>> {
        Ok(Transaction::list_for_period(&self.pool, user_id, start, end).await?)
    }
}
