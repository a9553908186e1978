use metrics::counter;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{outbox_repo, profile_repo, referral_repo};
use crate::errors::AppError;
use crate::services::notifier;

/// Result of a referral earnings payout.
#[derive(Debug, Serialize)]
pub struct ReferralPayout {
    pub amount: Decimal,
    pub referral_count: i64,
}

/// Pay out all pending referral commissions to the caller's balance.
///
/// The credited amount is exactly the sum of `earned_amount` over the rows
/// that flip pending → paid in this call, all inside one transaction.
pub async fn withdraw_referral_earnings(
    pool: &PgPool,
    profile_id: Uuid,
) -> Result<ReferralPayout, AppError> {
    let mut tx = pool.begin().await?;

    let flipped = referral_repo::mark_all_paid(&mut *tx, profile_id).await?;
    if flipped.is_empty() {
        return Err(AppError::Validation("No pending referral earnings".into()));
    }

    let total: Decimal = flipped.iter().map(|r| r.earned_amount).sum();

    referral_repo::insert_referral_withdrawal(&mut *tx, profile_id, total, flipped.len() as i32)
        .await?;
    let profile = profile_repo::credit_referral_payout(&mut *tx, profile_id, total).await?;

    let (subject, body) =
        notifier::format_referral_payout(&profile.username, total, flipped.len());
    outbox_repo::enqueue(&mut *tx, &profile.email, &subject, &body).await?;

    tx.commit().await?;

    counter!("referral_payouts_total").increment(1);
    tracing::info!(
        profile_id = %profile_id,
        amount = %total,
        referral_count = flipped.len(),
        "Referral earnings paid out"
    );

    Ok(ReferralPayout {
        amount: total,
        referral_count: flipped.len() as i64,
    })
}
