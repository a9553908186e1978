use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for the blockfortunedeposits table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Deposit {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub plan_id: Uuid,
    pub amount: Decimal,
    pub crypto_type: String,
    pub wallet_address: String,
    pub reference: String,
    pub status: String,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

/// Deposit status constants. A deposit leaves `pending` exactly once.
pub mod deposit_status {
    pub const PENDING: &str = "pending";
    pub const COMPLETED: &str = "completed";
    pub const REJECTED: &str = "rejected";
}
