use axum::extract::State;
use axum::Json;
use metrics::counter;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::auth::{hash_password, issue_token, verify_password};
use crate::db::{outbox_repo, profile_repo};
use crate::db::profile_repo::NewProfile;
use crate::errors::AppError;
use crate::models::Profile;
use crate::services::notifier;
use crate::AppState;

use super::ApiResponse;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub referral_code: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub profile: Profile,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/signup — create a profile and return a bearer token.
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let username = body.username.trim();
    let email = body.email.trim();

    if username.len() < 3 {
        return Err(AppError::Validation(
            "Username must be at least 3 characters".into(),
        ));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("Invalid email address".into()));
    }
    if body.password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }

    if profile_repo::username_taken(&state.db, username).await? {
        return Err(AppError::Validation("Username already taken".into()));
    }
    if profile_repo::email_taken(&state.db, email).await? {
        return Err(AppError::Validation("Email already registered".into()));
    }

    // Resolve the referrer before creating the profile
    let referred_by = match body.referral_code.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => {
            let referrer = profile_repo::get_by_referral_code(&state.db, code)
                .await?
                .ok_or_else(|| AppError::Validation("Invalid referral code".into()))?;
            Some(referrer.id)
        }
        _ => None,
    };

    let password_hash = hash_password(&body.password)?;
    let referral_code = new_referral_code();

    let mut tx = state.db.begin().await?;

    let profile = profile_repo::insert_profile(
        &mut *tx,
        &NewProfile {
            username,
            email,
            password_hash: &password_hash,
            first_name: body.first_name.as_deref(),
            last_name: body.last_name.as_deref(),
            referral_code: &referral_code,
            referred_by,
        },
    )
    .await?;

    let (subject, html) = notifier::format_welcome(&profile.username, &profile.referral_code);
    outbox_repo::enqueue(&mut *tx, &profile.email, &subject, &html).await?;

    tx.commit().await?;

    counter!("signups_total").increment(1);
    tracing::info!(profile_id = %profile.id, username = %profile.username, "Profile created");

    let token = issue_token(&state.config, &profile)?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(AuthResponse { token, profile }),
        error: None,
    }))
}

/// POST /api/auth/login — verify credentials and return a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let profile = profile_repo::get_by_username_or_email(&state.db, body.identifier.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&body.password, &profile.password_hash) {
        return Err(AppError::Unauthorized);
    }

    let token = issue_token(&state.config, &profile)?;
    tracing::info!(profile_id = %profile.id, "Login succeeded");

    Ok(Json(ApiResponse {
        success: true,
        data: Some(AuthResponse { token, profile }),
        error: None,
    }))
}

/// Generate a shareable 8-character referral code.
fn new_referral_code() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}
