/// In-memory store
///
/// Implements both storage traits over plain vectors behind one async mutex.
/// The check-and-insert in `create` happens under a single lock, giving the
/// same at-most-one-budget guarantee the unique constraint gives in Postgres.
///
/// Used by unit tests and the HTTP tests; it can also be flipped into an
/// unavailable state to exercise storage-failure paths. A store built with
/// [`MemoryStore::with_known_users`] rejects budgets for any other user the
/// way the `users` foreign key does.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{AnnualBudgetStore, CreatedBudget, StoreError, StoreResult, TransactionSource};
use crate::models::annual_budget::{AnnualBudget, AnnualBudgetItem, NewAnnualBudgetItem};
use crate::models::transaction::{NewTransaction, Transaction};

#[derive(Debug, Default)]
struct State {
    users: Option<HashSet<Uuid>>,
    budgets: Vec<AnnualBudget>,
    items: Vec<AnnualBudgetItem>,
    transactions: Vec<Transaction>,
    next_budget_id: i64,
    next_item_id: i64,
    next_transaction_id: i64,
}

impl State {
    fn owns_budget(&self, user_id: Uuid, annual_budget_id: i64) -> bool {
        self.budgets
            .iter()
            .any(|b| b.id == annual_budget_id && b.user_id == user_id)
    }

    fn owned_item_index(&self, user_id: Uuid, item_id: i64) -> Option<usize> {
        self.items
            .iter()
            .position(|i| i.id == item_id && self.owns_budget(user_id, i.annual_budget_id))
    }
}

/// Store that keeps everything in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that only accepts budgets for `users`
    pub fn with_known_users(users: impl IntoIterator<Item = Uuid>) -> Self {
        let state = State {
            users: Some(users.into_iter().collect()),
            ..State::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            unavailable: Arc::default(),
        }
    }

    /// Makes every subsequent call fail with [`StoreError::Unavailable`]
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store disabled".to_string()));
        }
        Ok(())
    }

    /// Records a transaction
    pub async fn insert_transaction(&self, data: NewTransaction) -> Transaction {
        let mut state = self.state.lock().await;
        state.next_transaction_id += 1;

        let transaction = Transaction {
            id: state.next_transaction_id,
            user_id: data.user_id,
            category: data.category,
            amount: data.amount,
            date: data.date,
            created_at: Utc::now(),
        };
        state.transactions.push(transaction.clone());
        transaction
    }

    /// Number of budgets owned by a user
    pub async fn budget_count(&self, user_id: Uuid) -> usize {
        let state = self.state.lock().await;
        state.budgets.iter().filter(|b| b.user_id == user_id).count()
    }

    /// Number of items across all budgets
    pub async fn item_count(&self) -> usize {
        self.state.lock().await.items.len()
    }
}

#[async_trait]
impl AnnualBudgetStore for MemoryStore {
    async fn find_by_user_and_year(
        &self,
        user_id: Uuid,
        year: i32,
    ) -> StoreResult<Option<AnnualBudget>> {
        self.check_available()?;

        let state = self.state.lock().await;
        Ok(state
            .budgets
            .iter()
            .find(|b| b.user_id == user_id && b.year == year)
            .cloned())
    }

    async fn create(
        &self,
        user_id: Uuid,
        year: i32,
        defaults: &[NewAnnualBudgetItem],
    ) -> StoreResult<Option<CreatedBudget>> {
        self.check_available()?;

        let mut state = self.state.lock().await;
        if let Some(users) = &state.users {
            if !users.contains(&user_id) {
                return Err(StoreError::UnknownUser(user_id));
            }
        }
        if state
            .budgets
            .iter()
            .any(|b| b.user_id == user_id && b.year == year)
        {
            return Ok(None);
        }

        let now = Utc::now();
        state.next_budget_id += 1;
        let budget = AnnualBudget {
            id: state.next_budget_id,
            user_id,
            year,
            created_at: now,
            updated_at: now,
        };

        let mut items = Vec::with_capacity(defaults.len());
        for item in defaults {
            state.next_item_id += 1;
            items.push(AnnualBudgetItem {
                id: state.next_item_id,
                annual_budget_id: budget.id,
                name: item.name.clone(),
                amount: item.amount,
                due_date: item.due_date,
                interval_months: item.interval_months,
                paid: item.paid,
                created_at: now,
                updated_at: now,
            });
        }

        state.budgets.push(budget.clone());
        state.items.extend(items.iter().cloned());

        Ok(Some((budget, items)))
    }

    async fn list_items(&self, annual_budget_id: i64) -> StoreResult<Vec<AnnualBudgetItem>> {
        self.check_available()?;

        let state = self.state.lock().await;
        let mut items: Vec<AnnualBudgetItem> = state
            .items
            .iter()
            .filter(|i| i.annual_budget_id == annual_budget_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| (i.due_date, i.id));
        Ok(items)
    }

    async fn create_item(
        &self,
        user_id: Uuid,
        annual_budget_id: i64,
        item: &NewAnnualBudgetItem,
    ) -> StoreResult<Option<AnnualBudgetItem>> {
        self.check_available()?;

        let mut state = self.state.lock().await;
        if !state.owns_budget(user_id, annual_budget_id) {
            return Ok(None);
        }

        let now = Utc::now();
        state.next_item_id += 1;
        let created = AnnualBudgetItem {
            id: state.next_item_id,
            annual_budget_id,
            name: item.name.clone(),
            amount: item.amount,
            due_date: item.due_date,
            interval_months: item.interval_months,
            paid: item.paid,
            created_at: now,
            updated_at: now,
        };
        state.items.push(created.clone());

        Ok(Some(created))
    }

    async fn update_item(
        &self,
        user_id: Uuid,
        item_id: i64,
        item: &NewAnnualBudgetItem,
    ) -> StoreResult<Option<AnnualBudgetItem>> {
        self.check_available()?;

        let mut state = self.state.lock().await;
        let Some(index) = state.owned_item_index(user_id, item_id) else {
            return Ok(None);
        };

        let existing = &mut state.items[index];
        existing.name = item.name.clone();
        existing.amount = item.amount;
        existing.due_date = item.due_date;
        existing.interval_months = item.interval_months;
        existing.paid = item.paid;
        existing.updated_at = Utc::now();

        Ok(Some(existing.clone()))
    }

    async fn delete_item(&self, user_id: Uuid, item_id: i64) -> StoreResult<bool> {
        self.check_available()?;

        let mut state = self.state.lock().await;
        match state.owned_item_index(user_id, item_id) {
            Some(index) => {
                state.items.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check_available()
    }
}

#[async_trait]
impl TransactionSource for MemoryStore {
    async fn list_for_period(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<Transaction>> {
        self.check_available()?;

        let state = self.state.lock().await;
        let mut rows: Vec<Transaction> = state
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id && t.date >= start && t.date <= end)
            .cloned()
            .collect();
        rows.sort_by_key(|t| (t.date, t.id));
        Ok(rows)
    }
}
