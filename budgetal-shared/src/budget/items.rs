/// Annual budget item edits
///
/// Budgets are provisioned with their default items, after which the owner
/// adds, changes and removes lines. Every operation is scoped to the calling
/// user: a budget or item owned by someone else is reported as
/// [`BudgetError::NotFound`], the same as one that does not exist.
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::{BudgetError, BudgetResult};
use crate::models::annual_budget::{AnnualBudgetItem, NewAnnualBudgetItem};
use crate::store::AnnualBudgetStore;

const BUDGET: &str = "annual budget";
const ITEM: &str = "annual budget item";

/// Owner-scoped item service
#[derive(Clone)]
pub struct AnnualBudgetItems {
    store: Arc<dyn AnnualBudgetStore>,
}

impl AnnualBudgetItems {
    /// Creates the service over a store
    pub fn new(store: Arc<dyn AnnualBudgetStore>) -> Self {
        Self { store }
    }

    /// Adds an item to one of the user's budgets
    pub async fn create(
        &self,
        user_id: Uuid,
        annual_budget_id: i64,
        item: &NewAnnualBudgetItem,
    ) -> BudgetResult<AnnualBudgetItem> {
        let created = self
            .store
            .create_item(user_id, annual_budget_id, item)
            .await?
            .ok_or(BudgetError::NotFound {
                resource: BUDGET,
                id: annual_budget_id,
            })?;

        info!(%user_id, annual_budget_id, item_id = created.id, "Created annual budget item");
        Ok(created)
    }

    /// Replaces the fields of one of the user's items
    pub async fn update(
        &self,
        user_id: Uuid,
        item_id: i64,
        item: &NewAnnualBudgetItem,
    ) -> BudgetResult<AnnualBudgetItem> {
        let updated = self
            .store
            .update_item(user_id, item_id, item)
            .await?
            .ok_or(BudgetError::NotFound {
                resource: ITEM,
                id: item_id,
            })?;

        info!(%user_id, item_id, "Updated annual budget item");
        Ok(updated)
    }

    /// Removes one of the user's items
    pub async fn delete(&self, user_id: Uuid, item_id: i64) -> BudgetResult<()> {
        if !self.store.delete_item(user_id, item_id).await? {
            return Err(BudgetError::NotFound {
                resource: ITEM,
                id: item_id,
            });
        }

        info!(%user_id, item_id, "Deleted annual budget item");
        Ok(())
    }
}
