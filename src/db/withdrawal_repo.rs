use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::Withdrawal;

/// Insert a new pending withdrawal request.
pub async fn insert_withdrawal(
    ex: impl PgExecutor<'_>,
    profile_id: Uuid,
    amount: Decimal,
    crypto_type: &str,
    wallet_address: &str,
    network_fee: Decimal,
) -> anyhow::Result<Withdrawal> {
    let withdrawal = sqlx::query_as::<_, Withdrawal>(
        r#"
        INSERT INTO blockfortunewithdrawals
            (profile_id, amount, crypto_type, wallet_address, network_fee)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(profile_id)
    .bind(amount)
    .bind(crypto_type)
    .bind(wallet_address)
    .bind(network_fee)
    .fetch_one(ex)
    .await?;

    Ok(withdrawal)
}

pub async fn get_withdrawal(
    ex: impl PgExecutor<'_>,
    id: Uuid,
) -> anyhow::Result<Option<Withdrawal>> {
    let withdrawal =
        sqlx::query_as::<_, Withdrawal>("SELECT * FROM blockfortunewithdrawals WHERE id = $1")
            .bind(id)
            .fetch_optional(ex)
            .await?;

    Ok(withdrawal)
}

/// A profile's withdrawals, newest first.
pub async fn get_withdrawals_for_profile(
    pool: &PgPool,
    profile_id: Uuid,
) -> anyhow::Result<Vec<Withdrawal>> {
    let withdrawals = sqlx::query_as::<_, Withdrawal>(
        "SELECT * FROM blockfortunewithdrawals WHERE profile_id = $1 ORDER BY created_at DESC",
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await?;

    Ok(withdrawals)
}

/// Back-office listing, optionally filtered by status.
pub async fn list_withdrawals(
    pool: &PgPool,
    status: Option<&str>,
) -> anyhow::Result<Vec<Withdrawal>> {
    let withdrawals = match status {
        Some(s) => {
            sqlx::query_as::<_, Withdrawal>(
                "SELECT * FROM blockfortunewithdrawals WHERE status = $1 ORDER BY created_at DESC",
            )
            .bind(s)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Withdrawal>(
                "SELECT * FROM blockfortunewithdrawals ORDER BY created_at DESC",
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(withdrawals)
}

/// Flip pending → completed. Returns `None` when the withdrawal was not
/// pending, which is how concurrent approvals lose the race.
pub async fn mark_completed(
    ex: impl PgExecutor<'_>,
    id: Uuid,
) -> anyhow::Result<Option<Withdrawal>> {
    let withdrawal = sqlx::query_as::<_, Withdrawal>(
        r#"
        UPDATE blockfortunewithdrawals
        SET status = 'completed', processed_at = NOW()
        WHERE id = $1 AND status = 'pending'
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;

    Ok(withdrawal)
}

/// Flip pending → rejected with admin notes. Returns `None` when not pending.
pub async fn mark_rejected(
    ex: impl PgExecutor<'_>,
    id: Uuid,
    notes: Option<&str>,
) -> anyhow::Result<Option<Withdrawal>> {
    let withdrawal = sqlx::query_as::<_, Withdrawal>(
        r#"
        UPDATE blockfortunewithdrawals
        SET status = 'rejected', admin_notes = $2, processed_at = NOW()
        WHERE id = $1 AND status = 'pending'
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(notes)
    .fetch_optional(ex)
    .await?;

    Ok(withdrawal)
}

pub async fn count_pending(pool: &PgPool) -> anyhow::Result<i64> {
    let row: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM blockfortunewithdrawals WHERE status = 'pending'")
            .fetch_one(pool)
            .await?;

    Ok(row.0)
}
