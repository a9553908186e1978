use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::auth::Principal;
use crate::db::{investment_repo, profile_repo, referral_repo};
use crate::errors::AppError;
use crate::AppState;

#[derive(Serialize)]
pub struct DashboardSummary {
    pub balance: String,
    pub active_deposit: String,
    pub pending_withdrawal: String,
    pub withdrawal_total: String,
    pub earned_total: String,
    pub active_investments: i64,
    pub pending_referral_earnings: String,
}

/// GET /api/dashboard/summary — the caller's financial snapshot.
pub async fn summary(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<DashboardSummary>, AppError> {
    let profile = profile_repo::get_profile(&state.db, principal.profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("profile not found".into()))?;

    let active_investments =
        investment_repo::count_active_for_profile(&state.db, principal.profile_id)
            .await
            .unwrap_or(0);
    let pending_referral_earnings =
        referral_repo::pending_total_for_referrer(&state.db, principal.profile_id)
            .await
            .unwrap_or_default();

    Ok(Json(DashboardSummary {
        balance: profile.balance.to_string(),
        active_deposit: profile.active_deposit.to_string(),
        pending_withdrawal: profile.pending_withdrawal.to_string(),
        withdrawal_total: profile.withdrawal_total.to_string(),
        earned_total: profile.earned_total.to_string(),
        active_investments,
        pending_referral_earnings: pending_referral_earnings.to_string(),
    }))
}
