use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for the blockfortune_email_outbox table.
///
/// Ledger workflows enqueue rows inside their own transaction; the outbox
/// dispatcher delivers them afterwards. A failed send never touches the
/// ledger write that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OutboxEmail {
    pub id: Uuid,
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
    pub status: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
}

/// Outbox status constants.
pub mod outbox_status {
    pub const PENDING: &str = "pending";
    pub const SENT: &str = "sent";
    pub const FAILED: &str = "failed";
}
