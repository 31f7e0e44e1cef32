/// Monthly spending statistics
///
/// Totals a user's transactions for one calendar month per category.
/// Categories with no spending that month are left out entirely, so an empty
/// month yields an empty list. Categories are listed in the order they first
/// appear when the month's transactions are sorted by `(date, id)`.
///
/// Sums use [`Decimal`] and are rendered with exactly two decimal places.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use super::year::YearError;
use super::{month_bounds, BudgetResult};
use crate::models::transaction::Transaction;
use crate::store::TransactionSource;

fn validate_month_number(month: u32) -> Result<u32, YearError> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(YearError::OutOfRange {
            value: i32::try_from(month).unwrap_or(i32::MAX),
            min: 1,
            max: 12,
        })
    }
}

/// Total spent in one category over a month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStatistic {
    /// Category name
    pub name: String,

    /// Sum of the category's transactions, two decimal places
    pub amount_spent: String,
}

/// Renders an amount with exactly two decimal places
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);
    rounded.to_string()
}

/// Groups transactions by category and sums each group
pub fn aggregate(transactions: &[Transaction]) -> Vec<CategoryStatistic> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(&str, Decimal)> = Vec::new();

    for transaction in transactions {
        let category = transaction.category.as_str();
        match index.get(category) {
            Some(&i) => totals[i].1 += transaction.amount,
            None => {
                index.insert(category, totals.len());
                totals.push((category, transaction.amount));
            }
        }
    }

    totals
        .into_iter()
        .map(|(name, total)| CategoryStatistic {
            name: name.to_string(),
            amount_spent: format_amount(total),
        })
        .collect()
}

/// Computes monthly statistics from a transaction source
#[derive(Clone)]
pub struct StatisticsAggregator {
    source: Arc<dyn TransactionSource>,
}

impl StatisticsAggregator {
    /// Creates an aggregator over a transaction source
    pub fn new(source: Arc<dyn TransactionSource>) -> Self {
        Self { source }
    }

    /// Per-category totals of a user's spending in `year`-`month`
    ///
    /// # Errors
    ///
    /// - [`super::BudgetError::Rejected`] if the month is not 1-12 or the
    ///   year cannot be represented as a date
    /// - [`super::BudgetError::Storage`] if the source fails
    pub async fn monthly_statistics(
        &self,
        user_id: Uuid,
        year: i32,
        month: u32,
    ) -> BudgetResult<Vec<CategoryStatistic>> {
        let month = validate_month_number(month)?;
        let (start, end) = month_bounds(year, month).ok_or(YearError::OutOfRange {
            value: year,
            min: NaiveDate::MIN.year(),
            max: NaiveDate::MAX.year(),
        })?;

        let transactions = self.source.list_for_period(user_id, start, end).await?;
        let statistics = aggregate(&transactions);

        debug!(
            %user_id,
            year,
            month,
            transactions = transactions.len(),
            categories = statistics.len(),
            "Computed monthly statistics"
        );

        Ok(statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::BudgetError;
    use crate::models::transaction::NewTransaction;
    use crate::store::MemoryStore;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn transaction(id: i64, category: &str, amount: Decimal) -> Transaction {
        Transaction {
            id,
            user_id: Uuid::nil(),
            category: category.to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2017, 11, 1).unwrap(),
            created_at: Utc::now(),
        }
    }

    async fn record(store: &MemoryStore, user_id: Uuid, category: &str, amount: Decimal, date: (i32, u32, u32)) {
        store
            .insert_transaction(NewTransaction {
                user_id,
                category: category.to_string(),
                amount,
                date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            })
            .await;
    }

    #[test]
    fn test_aggregate_groups_and_sums() {
        let statistics = aggregate(&[
            transaction(1, "Food", dec!(10.00)),
            transaction(2, "Food", dec!(5.50)),
            transaction(3, "Gas", dec!(20.00)),
        ]);

        assert_eq!(
            statistics,
            vec![
                CategoryStatistic {
                    name: "Food".to_string(),
                    amount_spent: "15.50".to_string(),
                },
                CategoryStatistic {
                    name: "Gas".to_string(),
                    amount_spent: "20.00".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_aggregate_keeps_first_seen_order() {
        let statistics = aggregate(&[
            transaction(1, "Utilities", dec!(1)),
            transaction(2, "Food", dec!(2)),
            transaction(3, "Utilities", dec!(3)),
            transaction(4, "Charity", dec!(4)),
        ]);

        let names: Vec<&str> = statistics.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Utilities", "Food", "Charity"]);
        assert_eq!(statistics[0].amount_spent, "4.00");
    }

    #[test]
    fn test_aggregate_is_decimal_exact() {
        let items: Vec<Transaction> = (0..10).map(|i| transaction(i, "Coffee", dec!(0.10))).collect();
        assert_eq!(aggregate(&items)[0].amount_spent, "1.00");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec!(20)), "20.00");
        assert_eq!(format_amount(dec!(15.5)), "15.50");
        assert_eq!(format_amount(dec!(0.125)), "0.12");
        assert_eq!(format_amount(dec!(-3.456)), "-3.46");
    }

    #[test]
    fn test_category_statistic_serializes_camel_case() {
        let stat = CategoryStatistic {
            name: "Food".to_string(),
            amount_spent: "15.50".to_string(),
        };
        let json = serde_json::to_value(&stat).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Food", "amountSpent": "15.50"}));
    }

    #[tokio::test]
    async fn test_monthly_statistics_empty_month() {
        let store = MemoryStore::new();
        let aggregator = StatisticsAggregator::new(Arc::new(store));

        let statistics = aggregator.monthly_statistics(Uuid::new_v4(), 2017, 11).await.unwrap();
        assert!(statistics.is_empty());
    }

    #[tokio::test]
    async fn test_monthly_statistics_only_counts_target_month_and_user() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let other_user = Uuid::new_v4();

        record(&store, user_id, "Food", dec!(10.00), (2017, 11, 1)).await;
        record(&store, user_id, "Gas", dec!(20.00), (2017, 11, 15)).await;
        record(&store, user_id, "Food", dec!(5.50), (2017, 11, 30)).await;
        record(&store, user_id, "Food", dec!(99.00), (2017, 10, 31)).await;
        record(&store, user_id, "Rent", dec!(900.00), (2017, 12, 1)).await;
        record(&store, other_user, "Food", dec!(42.00), (2017, 11, 10)).await;

        let aggregator = StatisticsAggregator::new(Arc::new(store));
        let statistics = aggregator.monthly_statistics(user_id, 2017, 11).await.unwrap();

        assert_eq!(statistics.len(), 2);
        assert_eq!(statistics[0].name, "Food");
        assert_eq!(statistics[0].amount_spent, "15.50");
        assert_eq!(statistics[1].name, "Gas");
        assert_eq!(statistics[1].amount_spent, "20.00");
    }

    #[tokio::test]
    async fn test_monthly_statistics_rejects_invalid_month() {
        let aggregator = StatisticsAggregator::new(Arc::new(MemoryStore::new()));

        let result = aggregator.monthly_statistics(Uuid::new_v4(), 2017, 13).await;
        assert!(matches!(
            result,
            Err(BudgetError::Rejected(YearError::OutOfRange { value: 13, min: 1, max: 12 }))
        ));
    }

    #[tokio::test]
    async fn test_monthly_statistics_reports_unrepresentable_year() {
        let aggregator = StatisticsAggregator::new(Arc::new(MemoryStore::new()));

        let result = aggregator.monthly_statistics(Uuid::new_v4(), i32::MAX, 1).await;
        match result {
            Err(BudgetError::Rejected(YearError::OutOfRange { value, min, max })) => {
                assert_eq!(value, i32::MAX);
                assert_eq!(min, NaiveDate::MIN.year());
                assert_eq!(max, NaiveDate::MAX.year());
            }
            other => panic!("expected out of range year, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_monthly_statistics_last_representable_december() {
        let aggregator = StatisticsAggregator::new(Arc::new(MemoryStore::new()));

        let result = aggregator
            .monthly_statistics(Uuid::new_v4(), NaiveDate::MAX.year(), 12)
            .await;
        assert!(result.unwrap().is_empty());
    }
}
