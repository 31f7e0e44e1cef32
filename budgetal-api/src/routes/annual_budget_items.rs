/// Annual budget item endpoints
///
/// ```text
/// POST   /annual-budget-items        # add an item to one of the caller's budgets
/// PUT    /annual-budget-items        # replace an item, id in the body
/// DELETE /annual-budget-items/:id    # remove an item
/// ```
///
/// Request bodies use the same camelCase fields as the budget response:
///
/// ```json
/// { "annualBudgetId": 12, "name": "Gym", "amount": "240.00",
///   "dueDate": "2017-09-30", "interval": 12, "paid": false }
/// ```
///
/// Budgets and items of other users answer 404 like missing ones.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::annual_budgets::AnnualBudgetItemResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use budgetal_shared::{
    auth::middleware::AuthContext, budget::template::validate_amount,
    models::annual_budget::NewAnnualBudgetItem,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create item request
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnualBudgetItemRequest {
    /// Budget to add the item to
    pub annual_budget_id: i64,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(custom(function = "validate_amount"))]
    pub amount: Decimal,

    pub due_date: NaiveDate,

    /// Months to spread the saving over
    #[validate(range(min = 1, max = 12, message = "interval must be 1-12"))]
    pub interval: i32,

    #[serde(default)]
    pub paid: bool,
}

/// Update item request
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAnnualBudgetItemRequest {
    /// Item to replace
    pub id: i64,

    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(custom(function = "validate_amount"))]
    pub amount: Decimal,

    pub due_date: NaiveDate,

    #[validate(range(min = 1, max = 12, message = "interval must be 1-12"))]
    pub interval: i32,

    #[serde(default)]
    pub paid: bool,
}

impl From<CreateAnnualBudgetItemRequest> for NewAnnualBudgetItem {
    fn from(req: CreateAnnualBudgetItemRequest) -> Self {
        Self {
            name: req.name,
            amount: req.amount,
            due_date: req.due_date,
            interval_months: req.interval,
            paid: req.paid,
        }
    }
}

impl From<UpdateAnnualBudgetItemRequest> for NewAnnualBudgetItem {
    fn from(req: UpdateAnnualBudgetItemRequest) -> Self {
        Self {
            name: req.name,
            amount: req.amount,
            due_date: req.due_date,
            interval_months: req.interval,
            paid: req.paid,
        }
    }
}

/// Adds an item to one of the caller's budgets
pub async fn create_annual_budget_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateAnnualBudgetItemRequest>,
) -> ApiResult<(StatusCode, Json<AnnualBudgetItemResponse>)> {
    req.validate()?;

    let annual_budget_id = req.annual_budget_id;
    let item = state
        .items
        .create(auth.user_id, annual_budget_id, &req.into())
        .await?;

    Ok((StatusCode::CREATED, Json(item.into())))
}

/// Replaces one of the caller's items
pub async fn update_annual_budget_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateAnnualBudgetItemRequest>,
) -> ApiResult<Json<AnnualBudgetItemResponse>> {
    req.validate()?;

    let item_id = req.id;
    let item = state.items.update(auth.user_id, item_id, &req.into()).await?;

    Ok(Json(item.into()))
}

/// Deletes one of the caller's items
///
/// A non-numeric id answers 404 like an unknown one.
pub async fn delete_annual_budget_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let item_id: i64 = id
        .parse()
        .map_err(|_| ApiError::NotFound("Resource not found".to_string()))?;

    state.items.delete(auth.user_id, item_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
