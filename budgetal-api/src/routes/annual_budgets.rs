/// Annual budget endpoint
///
/// ```text
/// GET /annual-budgets/:year
/// ```
///
/// Returns the caller's budget for `year`, provisioning it with the default
/// items on first access:
///
/// ```json
/// {
///   "annualBudgetId": 12,
///   "annualBudgetItems": [
///     { "id": 31, "annualBudgetId": 12, "name": "Car Insurance",
///       "amount": "600.00", "dueDate": "2017-06-30", "interval": 12, "paid": false }
///   ]
/// }
/// ```
///
/// A non-numeric year or one outside the accepted window answers 404.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use budgetal_shared::{
    auth::middleware::AuthContext,
    budget::{statistics::format_amount, ProvisionedBudget},
    models::annual_budget::AnnualBudgetItem,
};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Annual budget response body
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualBudgetResponse {
    /// Budget ID
    pub annual_budget_id: i64,

    /// Budget items ordered by due date
    pub annual_budget_items: Vec<AnnualBudgetItemResponse>,
}

/// One budget item
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualBudgetItemResponse {
    pub id: i64,
    pub annual_budget_id: i64,
    pub name: String,
    /// Two-decimal amount, e.g. `"600.00"`
    pub amount: String,
    pub due_date: NaiveDate,
    /// Months the saving is spread over
    pub interval: i32,
    pub paid: bool,
}

impl From<AnnualBudgetItem> for AnnualBudgetItemResponse {
    fn from(item: AnnualBudgetItem) -> Self {
        Self {
            id: item.id,
            annual_budget_id: item.annual_budget_id,
            name: item.name,
            amount: format_amount(item.amount),
            due_date: item.due_date,
            interval: item.interval_months,
            paid: item.paid,
        }
    }
}

impl From<ProvisionedBudget> for AnnualBudgetResponse {
    fn from(provisioned: ProvisionedBudget) -> Self {
        Self {
            annual_budget_id: provisioned.budget.id,
            annual_budget_items: provisioned.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Get-or-create handler for the caller's annual budget
pub async fn get_annual_budget(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(year): Path<String>,
) -> ApiResult<Json<AnnualBudgetResponse>> {
    let current_year = Local::now().year();

    let provisioned = state
        .provisioner
        .ensure_budget(auth.user_id, &year, current_year)
        .await?;

    Ok(Json(provisioned.into()))
}
