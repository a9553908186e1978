use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for the blockfortunewithdrawals table.
///
/// `amount + network_fee` is debited from the profile balance when the
/// request is created; approval only settles the reservation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Withdrawal {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub amount: Decimal,
    pub crypto_type: String,
    pub wallet_address: String,
    pub network_fee: Decimal,
    pub status: String,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

/// Withdrawal status constants. A withdrawal leaves `pending` exactly once.
pub mod withdrawal_status {
    pub const PENDING: &str = "pending";
    pub const COMPLETED: &str = "completed";
    pub const REJECTED: &str = "rejected";
}
