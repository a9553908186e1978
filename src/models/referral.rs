use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for the blockfortunereferrals table.
///
/// One row per commissioned deposit of a referred user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Referral {
    pub id: Uuid,
    pub referrer_id: Uuid,
    pub referee_id: Uuid,
    pub deposit_id: Option<Uuid>,
    pub earned_amount: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Referral status constants.
pub mod referral_status {
    pub const PENDING: &str = "pending";
    pub const PAID: &str = "paid";
}

/// Audit row for the blockfortune_referral_withdrawals table — one per
/// earnings payout, recording how many referral rows it settled.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReferralWithdrawal {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub amount: Decimal,
    pub referral_count: i32,
    pub created_at: DateTime<Utc>,
}
