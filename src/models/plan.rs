use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for the blockfortune_investment_plans catalog.
///
/// `daily_roi` and `affiliate_commission` are percentages (1.20 = 1.2%/day).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InvestmentPlan {
    pub id: Uuid,
    pub name: String,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    pub daily_roi: Decimal,
    pub duration_days: i32,
    pub affiliate_commission: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl InvestmentPlan {
    /// Check an amount against the plan bounds.
    pub fn accepts_amount(&self, amount: Decimal) -> bool {
        amount >= self.min_amount && amount <= self.max_amount
    }
}
