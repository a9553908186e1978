use axum::extract::State;
use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::api::auth::Principal;
use crate::db::referral_repo;
use crate::errors::AppError;
use crate::ledger::referrals::{self, ReferralPayout};
use crate::models::Referral;
use crate::AppState;

use super::ApiResponse;

#[derive(Serialize)]
pub struct ReferralSummary {
    pub referrals: Vec<Referral>,
    pub total_referrals: i64,
    pub pending_earnings: Decimal,
}

/// GET /api/referrals — the caller's commission rows plus pending earnings.
pub async fn list(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<ApiResponse<ReferralSummary>>, AppError> {
    let referrals =
        referral_repo::get_referrals_for_referrer(&state.db, principal.profile_id).await?;
    let pending_earnings =
        referral_repo::pending_total_for_referrer(&state.db, principal.profile_id).await?;
    let total_referrals = referrals.len() as i64;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(ReferralSummary {
            referrals,
            total_referrals,
            pending_earnings,
        }),
        error: None,
    }))
}

/// POST /api/referrals/withdraw — pay out all pending commissions to balance.
pub async fn withdraw(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<ApiResponse<ReferralPayout>>, AppError> {
    let payout = referrals::withdraw_referral_earnings(&state.db, principal.profile_id).await?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(payout),
        error: None,
    }))
}
