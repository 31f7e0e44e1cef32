/// Annual budget and annual budget item models
///
/// An annual budget is the container for one user's savings plan for one
/// calendar year. Its items are the lines of that plan: how much to put aside
/// for a category, by when, and over how many months.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE annual_budgets (
///     id BIGSERIAL PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     year INTEGER NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT annual_budgets_user_year_key UNIQUE (user_id, year)
/// );
///
/// CREATE TABLE annual_budget_items (
///     id BIGSERIAL PRIMARY KEY,
///     annual_budget_id BIGINT NOT NULL REFERENCES annual_budgets(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     amount NUMERIC(12, 2) NOT NULL DEFAULT 0,
///     due_date DATE NOT NULL,
///     interval_months INTEGER NOT NULL DEFAULT 12,
///     paid BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// The queries take any Postgres executor so the store can run them inside a
/// single transaction when provisioning.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgExecutor};
use uuid::Uuid;

/// Annual budget row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnnualBudget {
    /// Budget ID
    pub id: i64,

    /// Owning user
    pub user_id: Uuid,

    /// Calendar year the budget covers
    pub year: i32,

    /// When the budget was provisioned
    pub created_at: DateTime<Utc>,

    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Annual budget item row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnnualBudgetItem {
    /// Item ID
    pub id: i64,

    /// Parent budget
    pub annual_budget_id: i64,

    /// Category name
    pub name: String,

    /// Amount to have saved by `due_date`
    pub amount: Decimal,

    /// Date the full amount is needed
    pub due_date: NaiveDate,

    /// Number of months the saving is spread over
    pub interval_months: i32,

    /// Whether the item has been paid
    pub paid: bool,

    /// When the item was created
    pub created_at: DateTime<Utc>,

    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an annual budget item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAnnualBudgetItem {
    /// Category name
    pub name: String,

    /// Allocated amount
    pub amount: Decimal,

    /// Due date
    pub due_date: NaiveDate,

    /// Months to spread saving over
    pub interval_months: i32,

    /// Initial paid flag
    pub paid: bool,
}

const BUDGET_COLUMNS: &str = "id, user_id, year, created_at, updated_at";

const ITEM_COLUMNS: &str =
    "id, annual_budget_id, name, amount, due_date, interval_months, paid, created_at, updated_at";

const ITEM_COLUMNS_QUALIFIED: &str = "i.id, i.annual_budget_id, i.name, i.amount, i.due_date, \
     i.interval_months, i.paid, i.created_at, i.updated_at";

impl AnnualBudget {
    /// Finds the budget a user has for a year
    pub async fn find_by_user_and_year<'e, E>(
        executor: E,
        user_id: Uuid,
        year: i32,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {} FROM annual_budgets WHERE user_id = $1 AND year = $2",
            BUDGET_COLUMNS
        );

        sqlx::query_as::<_, AnnualBudget>(&query)
            .bind(user_id)
            .bind(year)
            .fetch_optional(executor)
            .await
    }

    /// Inserts a budget unless one already exists for `(user_id, year)`
    ///
    /// Returns `None` when the unique constraint turned the insert into a
    /// no-op, which means another request provisioned the budget first.
    pub async fn insert_if_absent<'e, E>(
        executor: E,
        user_id: Uuid,
        year: i32,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            r#"
            INSERT INTO annual_budgets (user_id, year)
            VALUES ($1, $2)
            ON CONFLICT (user_id, year) DO NOTHING
            RETURNING {}
            "#,
            BUDGET_COLUMNS
        );

        sqlx::query_as::<_, AnnualBudget>(&query)
            .bind(user_id)
            .bind(year)
            .fetch_optional(executor)
            .await
    }

    /// Finds a budget by ID if it belongs to `user_id`
    pub async fn find_owned<'e, E>(
        executor: E,
        id: i64,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {} FROM annual_budgets WHERE id = $1 AND user_id = $2",
            BUDGET_COLUMNS
        );

        sqlx::query_as::<_, AnnualBudget>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(executor)
            .await
    }

    /// Counts the budgets owned by a user
    pub async fn count_for_user<'e, E>(executor: E, user_id: Uuid) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT COUNT(*) FROM annual_budgets WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(executor)
            .await
    }
}

impl AnnualBudgetItem {
    /// Inserts the default item set for a freshly created budget
    ///
    /// Takes a connection rather than a generic executor because it issues
    /// one insert per item; callers pass a transaction.
    pub async fn create_defaults(
        conn: &mut PgConnection,
        annual_budget_id: i64,
        items: &[NewAnnualBudgetItem],
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO annual_budget_items
                (annual_budget_id, name, amount, due_date, interval_months, paid)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        );

        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, AnnualBudgetItem>(&query)
                .bind(annual_budget_id)
                .bind(&item.name)
                .bind(item.amount)
                .bind(item.due_date)
                .bind(item.interval_months)
                .bind(item.paid)
                .fetch_one(&mut *conn)
                .await?;
            created.push(row);
        }

        Ok(created)
    }

    /// Inserts one item into a budget
    pub async fn create<'e, E>(
        executor: E,
        annual_budget_id: i64,
        item: &NewAnnualBudgetItem,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            r#"
            INSERT INTO annual_budget_items
                (annual_budget_id, name, amount, due_date, interval_months, paid)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        );

        sqlx::query_as::<_, AnnualBudgetItem>(&query)
            .bind(annual_budget_id)
            .bind(&item.name)
            .bind(item.amount)
            .bind(item.due_date)
            .bind(item.interval_months)
            .bind(item.paid)
            .fetch_one(executor)
            .await
    }

    /// Overwrites an item's fields if its budget belongs to `user_id`
    ///
    /// Returns `None` when the item does not exist or is someone else's.
    pub async fn update_owned<'e, E>(
        executor: E,
        id: i64,
        user_id: Uuid,
        item: &NewAnnualBudgetItem,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            r#"
            UPDATE annual_budget_items AS i
            SET name = $3,
                amount = $4,
                due_date = $5,
                interval_months = $6,
                paid = $7,
                updated_at = NOW()
            FROM annual_budgets AS b
            WHERE i.id = $1
              AND i.annual_budget_id = b.id
              AND b.user_id = $2
            RETURNING {}
            "#,
            ITEM_COLUMNS_QUALIFIED
        );

        sqlx::query_as::<_, AnnualBudgetItem>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&item.name)
            .bind(item.amount)
            .bind(item.due_date)
            .bind(item.interval_months)
            .bind(item.paid)
            .fetch_optional(executor)
            .await
    }

    /// Deletes an item if its budget belongs to `user_id`
    pub async fn delete_owned<'e, E>(executor: E, id: i64, user_id: Uuid) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            r#"
            DELETE FROM annual_budget_items AS i
            USING annual_budgets AS b
            WHERE i.id = $1
              AND i.annual_budget_id = b.id
              AND b.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists a budget's items ordered by due date
    pub async fn list_by_budget<'e, E>(
        executor: E,
        annual_budget_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {} FROM annual_budget_items WHERE annual_budget_id = $1 ORDER BY due_date, id",
            ITEM_COLUMNS
        );

        sqlx::query_as::<_, AnnualBudgetItem>(&query)
            .bind(annual_budget_id)
            .fetch_all(executor)
            .await
    }

    /// Counts the items that belong to a budget
    pub async fn count_by_budget<'e, E>(
        executor: E,
        annual_budget_id: i64,
    ) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar("SELECT COUNT(*) FROM annual_budget_items WHERE annual_budget_id = $1")
            .bind(annual_budget_id)
            .fetch_one(executor)
            .await
    }
}
