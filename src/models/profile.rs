use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for the blockfortuneprofile table.
///
/// Created at signup, never hard-deleted. The financial snapshot columns
/// are only mutated inside ledger transactions.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: String,
    pub balance: Decimal,
    pub pending_withdrawal: Decimal,
    pub active_deposit: Decimal,
    pub withdrawal_total: Decimal,
    pub earned_total: Decimal,
    pub referral_code: String,
    pub referred_by: Option<Uuid>,
    pub verification_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn is_admin(&self) -> bool {
        self.role == role::ADMIN
    }
}

/// Profile role constants.
pub mod role {
    pub const USER: &str = "user";
    pub const ADMIN: &str = "admin";
}

/// Verification status constants.
pub mod verification_status {
    pub const UNVERIFIED: &str = "unverified";
    pub const VERIFIED: &str = "verified";
}
