use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for the blockfortune_investments table.
///
/// `plan_name`, `daily_roi` and `duration_days` are snapshots taken at
/// creation time so later plan edits cannot change a running investment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Investment {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub plan_id: Uuid,
    pub plan_name: String,
    pub amount: Decimal,
    pub daily_roi: Decimal,
    pub duration_days: i32,
    pub expected_return: Decimal,
    pub status: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Investment status constants.
pub mod investment_status {
    pub const ACTIVE: &str = "active";
    pub const COMPLETED: &str = "completed";
    pub const CANCELLED: &str = "cancelled";
}
