use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use crate::api::auth::{Admin, Principal};
use crate::db::withdrawal_repo;
use crate::errors::AppError;
use crate::ledger::withdrawals::{self, WithdrawalRequest};
use crate::models::Withdrawal;
use crate::AppState;

use super::deposits::{RejectRequest, StatusFilter};
use super::ApiResponse;

/// POST /api/withdrawals — create a pending withdrawal, reserving balance.
pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    Json(body): Json<WithdrawalRequest>,
) -> Result<Json<ApiResponse<Withdrawal>>, AppError> {
    let withdrawal =
        withdrawals::request_withdrawal(&state.db, &state.config, principal.profile_id, &body)
            .await?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(withdrawal),
        error: None,
    }))
}

/// GET /api/withdrawals — the caller's withdrawals, newest first.
pub async fn list(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<ApiResponse<Vec<Withdrawal>>>, AppError> {
    let withdrawals =
        withdrawal_repo::get_withdrawals_for_profile(&state.db, principal.profile_id).await?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(withdrawals),
        error: None,
    }))
}

/// GET /api/admin/withdrawals — back-office listing, optional ?status= filter.
pub async fn admin_list(
    State(state): State<AppState>,
    Admin(_): Admin,
    Query(filter): Query<StatusFilter>,
) -> Result<Json<ApiResponse<Vec<Withdrawal>>>, AppError> {
    let withdrawals = withdrawal_repo::list_withdrawals(&state.db, filter.status.as_deref()).await?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(withdrawals),
        error: None,
    }))
}

/// POST /api/admin/withdrawals/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Withdrawal>>, AppError> {
    let withdrawal = withdrawals::approve_withdrawal(&state.db, id).await?;
    tracing::info!(withdrawal_id = %id, admin = %admin.username, "Withdrawal approved via back-office");

    Ok(Json(ApiResponse {
        success: true,
        data: Some(withdrawal),
        error: None,
    }))
}

/// POST /api/admin/withdrawals/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Path(id): Path<Uuid>,
    Json(body): Json<RejectRequest>,
) -> Result<Json<ApiResponse<Withdrawal>>, AppError> {
    let withdrawal = withdrawals::reject_withdrawal(&state.db, id, body.notes.as_deref()).await?;
    tracing::info!(withdrawal_id = %id, admin = %admin.username, "Withdrawal rejected via back-office");

    Ok(Json(ApiResponse {
        success: true,
        data: Some(withdrawal),
        error: None,
    }))
}
