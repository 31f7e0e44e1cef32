/// Budget domain logic
///
/// - [`year`]: Year and month validation
/// - [`template`]: Default item set materialized for new budgets
/// - [`provisioner`]: Get-or-create of a user's annual budget
/// - [`statistics`]: Monthly spending totals per category
/// - [`items`]: Owner-scoped edits to annual budget items

use chrono::NaiveDate;

use crate::store::StoreError;

pub mod items;
pub mod provisioner;
pub mod statistics;
pub mod template;
pub mod year;

pub use items::AnnualBudgetItems;
pub use provisioner::{BudgetProvisioner, ProvisionedBudget};
pub use statistics::{CategoryStatistic, StatisticsAggregator};
pub use template::{DefaultItem, DefaultTemplate, TemplateError};
pub use year::{YearError, YearWindow};

/// Error type for budget operations
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    /// Request parameters were rejected before touching storage
    #[error("Rejected: {0}")]
    Rejected(#[from] YearError),

    /// Target does not exist or belongs to another user
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    /// Storage layer failed
    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl BudgetError {
    /// Short label used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            BudgetError::Rejected(err) => err.kind(),
            BudgetError::NotFound { .. } => "not_found",
            BudgetError::Storage(StoreError::UnknownUser(_)) => "unknown_user",
            BudgetError::Storage(_) => "storage_failure",
        }
    }
}

/// Budget result type alias
pub type BudgetResult<T> = Result<T, BudgetError>;

/// First and last day of a calendar month
///
/// Returns `None` for an invalid month or a year chrono cannot represent.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = if month == 12 {
        NaiveDate::from_ymd_opt(year, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?.pred_opt()?
    };
    Some((first, last))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(month_bounds(2017, 11), Some((ymd(2017, 11, 1), ymd(2017, 11, 30))));
        assert_eq!(month_bounds(2017, 12), Some((ymd(2017, 12, 1), ymd(2017, 12, 31))));
        assert_eq!(month_bounds(2016, 2), Some((ymd(2016, 2, 1), ymd(2016, 2, 29))));
        assert_eq!(month_bounds(2017, 2), Some((ymd(2017, 2, 1), ymd(2017, 2, 28))));
    }

    #[test]
    fn test_month_bounds_invalid() {
        assert_eq!(month_bounds(2017, 0), None);
        assert_eq!(month_bounds(2017, 13), None);
        assert_eq!(month_bounds(i32::MAX, 1), None);
    }

    #[test]
    fn test_error_kind() {
        let err = BudgetError::from(YearError::Malformed("abcd".to_string()));
        assert_eq!(err.kind(), "malformed");

        let err = BudgetError::from(StoreError::Unavailable("down".to_string()));
        assert_eq!(err.kind(), "storage_failure");

        let err = BudgetError::from(StoreError::UnknownUser(uuid::Uuid::new_v4()));
        assert_eq!(err.kind(), "unknown_user");

        let err = BudgetError::NotFound {
            resource: "annual budget item",
            id: 7,
        };
        assert_eq!(err.kind(), "not_found");
        assert_eq!(err.to_string(), "annual budget item 7 not found");
    }
}
