/// Spending transaction model
///
/// Transactions are written by the ledger side of the product. This crate
/// only reads them to build monthly statistics; `create` exists for seeding.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE transactions (
///     id BIGSERIAL PRIMARY KEY,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     category VARCHAR(255) NOT NULL,
///     amount NUMERIC(12, 2) NOT NULL,
///     date DATE NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// CREATE INDEX idx_transactions_user_date ON transactions(user_id, date);
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Transaction row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    /// Transaction ID
    pub id: i64,

    /// Owning user
    pub user_id: Uuid,

    /// Spending category
    pub category: String,

    /// Amount spent
    pub amount: Decimal,

    /// Day the money was spent
    pub date: NaiveDate,

    /// When the row was recorded
    pub created_at: DateTime<Utc>,
}

/// Input for recording a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Owning user
    pub user_id: Uuid,

    /// Spending category
    pub category: String,

    /// Amount spent
    pub amount: Decimal,

    /// Day the money was spent
    pub date: NaiveDate,
}

impl Transaction {
    /// Records a transaction
    pub async fn create<'e, E>(executor: E, data: NewTransaction) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (user_id, category, amount, date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, category, amount, date, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.category)
        .bind(data.amount)
        .bind(data.date)
        .fetch_one(executor)
        .await
    }

    /// Lists a user's transactions dated within `[start, end]`
    ///
    /// Rows come back ordered by `(date, id)`.
    pub async fn list_for_period<'e, E>(
        executor: E,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, category, amount, date, created_at
            FROM transactions
            WHERE user_id = $1
              AND date >= $2
              AND date <= $3
            ORDER BY date, id
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(executor)
        .await
    }
}
