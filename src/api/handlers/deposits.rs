use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::auth::{Admin, Principal};
use crate::db::deposit_repo;
use crate::errors::AppError;
use crate::ledger::deposits::{self, DepositRequest};
use crate::models::Deposit;
use crate::AppState;

use super::ApiResponse;

#[derive(Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct RejectRequest {
    pub notes: Option<String>,
}

/// POST /api/deposits — create a pending deposit request.
pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    Json(body): Json<DepositRequest>,
) -> Result<Json<ApiResponse<Deposit>>, AppError> {
    let deposit =
        deposits::request_deposit(&state.db, &state.config, principal.profile_id, &body).await?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(deposit),
        error: None,
    }))
}

/// GET /api/deposits — the caller's deposits, newest first.
pub async fn list(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<ApiResponse<Vec<Deposit>>>, AppError> {
    let deposits = deposit_repo::get_deposits_for_profile(&state.db, principal.profile_id).await?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(deposits),
        error: None,
    }))
}

/// GET /api/admin/deposits — back-office listing, optional ?status= filter.
pub async fn admin_list(
    State(state): State<AppState>,
    Admin(_): Admin,
    Query(filter): Query<StatusFilter>,
) -> Result<Json<ApiResponse<Vec<Deposit>>>, AppError> {
    let deposits = deposit_repo::list_deposits(&state.db, filter.status.as_deref()).await?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(deposits),
        error: None,
    }))
}

/// POST /api/admin/deposits/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Deposit>>, AppError> {
    let deposit = deposits::approve_deposit(&state.db, id).await?;
    tracing::info!(deposit_id = %id, admin = %admin.username, "Deposit approved via back-office");

    Ok(Json(ApiResponse {
        success: true,
        data: Some(deposit),
        error: None,
    }))
}

/// POST /api/admin/deposits/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Path(id): Path<Uuid>,
    Json(body): Json<RejectRequest>,
) -> Result<Json<ApiResponse<Deposit>>, AppError> {
    let deposit = deposits::reject_deposit(&state.db, id, body.notes.as_deref()).await?;
    tracing::info!(deposit_id = %id, admin = %admin.username, "Deposit rejected via back-office");

    Ok(Json(ApiResponse {
        success: true,
        data: Some(deposit),
        error: None,
    }))
}
