use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::{Referral, ReferralWithdrawal};

/// Insert a pending referral commission tied to an approved deposit.
pub async fn insert_referral(
    ex: impl PgExecutor<'_>,
    referrer_id: Uuid,
    referee_id: Uuid,
    deposit_id: Uuid,
    earned_amount: Decimal,
) -> anyhow::Result<Referral> {
    let referral = sqlx::query_as::<_, Referral>(
        r#"
        INSERT INTO blockfortunereferrals (referrer_id, referee_id, deposit_id, earned_amount)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(referrer_id)
    .bind(referee_id)
    .bind(deposit_id)
    .bind(earned_amount)
    .fetch_one(ex)
    .await?;

    Ok(referral)
}

/// A referrer's commission rows, newest first.
pub async fn get_referrals_for_referrer(
    pool: &PgPool,
    referrer_id: Uuid,
) -> anyhow::Result<Vec<Referral>> {
    let referrals = sqlx::query_as::<_, Referral>(
        "SELECT * FROM blockfortunereferrals WHERE referrer_id = $1 ORDER BY created_at DESC",
    )
    .bind(referrer_id)
    .fetch_all(pool)
    .await?;

    Ok(referrals)
}

/// Sum of a referrer's unpaid commissions.
pub async fn pending_total_for_referrer(
    pool: &PgPool,
    referrer_id: Uuid,
) -> anyhow::Result<Decimal> {
    let row: (Option<Decimal>,) = sqlx::query_as(
        "SELECT SUM(earned_amount) FROM blockfortunereferrals WHERE referrer_id = $1 AND status = 'pending'",
    )
    .bind(referrer_id)
    .fetch_one(pool)
    .await?;

    Ok(row.0.unwrap_or(Decimal::ZERO))
}

/// Flip all of a referrer's pending commissions to paid, returning the rows
/// that actually flipped in this call.
pub async fn mark_all_paid(
    ex: impl PgExecutor<'_>,
    referrer_id: Uuid,
) -> anyhow::Result<Vec<Referral>> {
    let referrals = sqlx::query_as::<_, Referral>(
        r#"
        UPDATE blockfortunereferrals
        SET status = 'paid', paid_at = NOW()
        WHERE referrer_id = $1 AND status = 'pending'
        RETURNING *
        "#,
    )
    .bind(referrer_id)
    .fetch_all(ex)
    .await?;

    Ok(referrals)
}

/// Record a payout audit row.
pub async fn insert_referral_withdrawal(
    ex: impl PgExecutor<'_>,
    profile_id: Uuid,
    amount: Decimal,
    referral_count: i32,
) -> anyhow::Result<ReferralWithdrawal> {
    let row = sqlx::query_as::<_, ReferralWithdrawal>(
        r#"
        INSERT INTO blockfortune_referral_withdrawals (profile_id, amount, referral_count)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(profile_id)
    .bind(amount)
    .bind(referral_count)
    .fetch_one(ex)
    .await?;

    Ok(row)
}
