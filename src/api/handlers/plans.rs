use axum::extract::State;
use axum::Json;

use crate::db::plan_repo;
use crate::errors::AppError;
use crate::models::InvestmentPlan;
use crate::AppState;

use super::ApiResponse;

/// GET /api/plans — the active investment plan catalog.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<InvestmentPlan>>>, AppError> {
    let plans = plan_repo::get_active_plans(&state.db).await?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(plans),
        error: None,
    }))
}
