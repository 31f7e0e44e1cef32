/// Default item template
///
/// When a budget is provisioned it is seeded with the template's items. The
/// template itself comes from configuration (a JSON file), so operators can
/// change the starter categories without a release.
///
/// ```json
/// [
///   { "name": "Car Insurance", "amount": "600.00", "dueMonth": 6, "interval": 12 },
///   { "name": "Holiday Gifts", "amount": "400.00", "dueMonth": 12, "interval": 10 }
/// ]
/// ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::{Validate, ValidationError};

use super::month_bounds;
use crate::models::annual_budget::NewAnnualBudgetItem;

/// Error raised while loading a template
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Template file could not be read
    #[error("Failed to read template: {0}")]
    Io(#[from] std::io::Error),

    /// Template is not valid JSON for the expected shape
    #[error("Failed to parse template: {0}")]
    Parse(#[from] serde_json::Error),

    /// An entry failed validation
    #[error("Invalid template item {index}: {message}")]
    Invalid { index: usize, message: String },
}

/// One entry of the default template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DefaultItem {
    /// Category name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Allocated amount
    #[validate(custom(function = "validate_amount"))]
    pub amount: Decimal,

    /// Month the amount is due; the due date is that month's last day
    #[validate(range(min = 1, max = 12, message = "dueMonth must be 1-12"))]
    pub due_month: u32,

    /// Months to spread the saving over
    #[validate(range(min = 1, max = 12, message = "interval must be 1-12"))]
    pub interval: i32,
}

/// Rejects negative amounts
pub fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() {
        let mut err = ValidationError::new("negative_amount");
        err.message = Some("amount must not be negative".into());
        return Err(err);
    }
    Ok(())
}

/// Validated set of default items
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultTemplate {
    items: Vec<DefaultItem>,
}

impl DefaultTemplate {
    /// Builds a template, validating every item
    pub fn new(items: Vec<DefaultItem>) -> Result<Self, TemplateError> {
        for (index, item) in items.iter().enumerate() {
            item.validate().map_err(|e| TemplateError::Invalid {
                index,
                message: e.to_string(),
            })?;
        }
        Ok(Self { items })
    }

    /// Template with no items
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a JSON array of items
    pub fn from_json_str(json: &str) -> Result<Self, TemplateError> {
        let items: Vec<DefaultItem> = serde_json::from_str(json)?;
        Self::new(items)
    }

    /// Reads and parses a JSON template file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Template entries
    pub fn items(&self) -> &[DefaultItem] {
        &self.items
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the template has no entries
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Turns the template into insertable items for a given year
    ///
    /// Entries whose due date cannot be represented for `year` are skipped.
    pub fn materialize(&self, year: i32) -> Vec<NewAnnualBudgetItem> {
        self.items
            .iter()
            .filter_map(|item| {
                let (_, due_date) = month_bounds(year, item.due_month)?;
                Some(NewAnnualBudgetItem {
                    name: item.name.clone(),
                    amount: item.amount,
                    due_date,
                    interval_months: item.interval,
                    paid: false,
                })
            })
            .collect()
    }
}
