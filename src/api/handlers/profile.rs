use axum::extract::State;
use axum::Json;

use crate::api::auth::Principal;
use crate::db::profile_repo;
use crate::errors::AppError;
use crate::models::Profile;
use crate::AppState;

use super::ApiResponse;

/// GET /api/profile — the caller's profile. The password hash never
/// serializes.
pub async fn me(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<ApiResponse<Profile>>, AppError> {
    let profile = profile_repo::get_profile(&state.db, principal.profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("profile not found".into()))?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(profile),
        error: None,
    }))
}
