pub mod auth;
pub mod dashboard;
pub mod deposits;
pub mod health;
pub mod investments;
pub mod market;
pub mod metrics;
pub mod plans;
pub mod profile;
pub mod referrals;
pub mod withdrawals;

use serde::Serialize;

/// Standard JSON envelope for API responses.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}
