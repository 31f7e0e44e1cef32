/// Monthly statistics endpoint
///
/// ```text
/// GET /monthly-statistics/:year/:month
/// ```
///
/// ```json
/// { "budgetCategories": [ { "name": "Food", "amountSpent": "15.50" } ] }
/// ```
///
/// Categories appear in the order they were first spent in. A month with no
/// spending returns an empty list. A malformed year or month answers 404.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use budgetal_shared::{
    auth::middleware::AuthContext,
    budget::{
        year::{parse_year, validate_month},
        BudgetError, CategoryStatistic,
    },
};
use serde::{Deserialize, Serialize};

/// Monthly statistics response body
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStatisticsResponse {
    pub budget_categories: Vec<CategoryStatistic>,
}

/// Per-category spending of the caller for one month
pub async fn get_monthly_statistics(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((year, month)): Path<(String, String)>,
) -> ApiResult<Json<MonthlyStatisticsResponse>> {
    let year = parse_year(&year).map_err(BudgetError::from)?;
    let month = validate_month(&month).map_err(BudgetError::from)?;

    let budget_categories = state
        .statistics
        .monthly_statistics(auth.user_id, year, month)
        .await?;

    Ok(Json(MonthlyStatisticsResponse { budget_categories }))
}
