/// Annual budget provisioning
///
/// A user's budget for a year is created the first time they ask for it.
/// The flow is:
///
/// ```text
/// ensure_budget(user, "2017", now_year)
///   ├─> validate year against window          (Rejected on failure)
///   ├─> find_by_user_and_year                 (found: return it + items)
///   └─> create budget + default items         (conflict: look up the winner)
/// ```
///
/// Concurrent first requests for the same `(user, year)` are resolved by the
/// store: exactly one `create` succeeds, the others get `None` and return the
/// winner's budget.

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::template::DefaultTemplate;
use super::year::{validate_year, YearWindow};
use super::{BudgetError, BudgetResult};
use crate::models::annual_budget::{AnnualBudget, AnnualBudgetItem};
use crate::store::{AnnualBudgetStore, StoreError};

/// Lookups attempted after losing a creation race before giving up
const MAX_ATTEMPTS: usize = 3;

/// Budget returned by [`BudgetProvisioner::ensure_budget`]
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionedBudget {
    /// The budget row
    pub budget: AnnualBudget,

    /// Its items, ordered by due date
    pub items: Vec<AnnualBudgetItem>,

    /// Whether this call created the budget
    pub created: bool,
}

impl ProvisionedBudget {
    /// Budget ID
    pub fn budget_id(&self) -> i64 {
        self.budget.id
    }
}

/// Get-or-create service for annual budgets
#[derive(Clone)]
pub struct BudgetProvisioner {
    store: Arc<dyn AnnualBudgetStore>,
    template: Arc<DefaultTemplate>,
    window: YearWindow,
}

impl BudgetProvisioner {
    /// Creates a provisioner over a store
    pub fn new(store: Arc<dyn AnnualBudgetStore>, template: DefaultTemplate, window: YearWindow) -> Self {
        Self {
            store,
            template: Arc::new(template),
            window,
        }
    }

    /// Returns the user's budget for `raw_year`, creating it on first access
    ///
    /// # Errors
    ///
    /// - [`BudgetError::Rejected`] if `raw_year` is not a number or falls
    ///   outside the window around `current_year`
    /// - [`BudgetError::Storage`] if the store fails
    pub async fn ensure_budget(
        &self,
        user_id: Uuid,
        raw_year: &str,
        current_year: i32,
    ) -> BudgetResult<ProvisionedBudget> {
        let year = validate_year(raw_year, current_year, self.window)?;

        for attempt in 1..=MAX_ATTEMPTS {
            if let Some(existing) = self.load_existing(user_id, year).await? {
                debug!(%user_id, year, annual_budget_id = existing.budget.id, "Annual budget found");
                return Ok(existing);
            }

            let defaults = self.template.materialize(year);
            match self.store.create(user_id, year, &defaults).await? {
                Some((budget, items)) => {
                    info!(
                        %user_id,
                        year,
                        annual_budget_id = budget.id,
                        items = items.len(),
                        "Provisioned annual budget"
                    );
                    return Ok(ProvisionedBudget {
                        budget,
                        items,
                        created: true,
                    });
                }
                None => {
                    warn!(%user_id, year, attempt, "Lost annual budget creation race, retrying lookup");
                }
            }
        }

        Err(BudgetError::Storage(StoreError::Unavailable(format!(
            "annual budget for year {} neither found nor created after {} attempts",
            year, MAX_ATTEMPTS
        ))))
    }

    async fn load_existing(&self, user_id: Uuid, year: i32) -> BudgetResult<Option<ProvisionedBudget>> {
        let Some(budget) = self.store.find_by_user_and_year(user_id, year).await? else {
            return Ok(None);
        };

        let items = self.store.list_items(budget.id).await?;
        Ok(Some(ProvisionedBudget {
            budget,
            items,
            created: false,
        }))
    }
}
