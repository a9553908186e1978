use axum::extract::State;
use axum::Json;

use crate::api::auth::Principal;
use crate::db::investment_repo;
use crate::errors::AppError;
use crate::ledger::investments::{self, InvestmentRequest};
use crate::models::Investment;
use crate::AppState;

use super::ApiResponse;

/// POST /api/investments — invest from balance into a plan.
pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    Json(body): Json<InvestmentRequest>,
) -> Result<Json<ApiResponse<Investment>>, AppError> {
    let investment =
        investments::create_investment(&state.db, principal.profile_id, &body).await?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(investment),
        error: None,
    }))
}

/// GET /api/investments — the caller's investments, newest first.
pub async fn list(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<ApiResponse<Vec<Investment>>>, AppError> {
    let investments =
        investment_repo::get_investments_for_profile(&state.db, principal.profile_id).await?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(investments),
        error: None,
    }))
}
