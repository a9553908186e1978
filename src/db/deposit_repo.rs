use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::Deposit;

/// Insert a new pending deposit request.
#[allow(clippy::too_many_arguments)]
pub async fn insert_deposit(
    ex: impl PgExecutor<'_>,
    profile_id: Uuid,
    plan_id: Uuid,
    amount: Decimal,
    crypto_type: &str,
    wallet_address: &str,
    reference: &str,
) -> anyhow::Result<Deposit> {
    let deposit = sqlx::query_as::<_, Deposit>(
        r#"
        INSERT INTO blockfortunedeposits
            (profile_id, plan_id, amount, crypto_type, wallet_address, reference)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(profile_id)
    .bind(plan_id)
    .bind(amount)
    .bind(crypto_type)
    .bind(wallet_address)
    .bind(reference)
    .fetch_one(ex)
    .await?;

    Ok(deposit)
}

pub async fn get_deposit(ex: impl PgExecutor<'_>, id: Uuid) -> anyhow::Result<Option<Deposit>> {
    let deposit = sqlx::query_as::<_, Deposit>("SELECT * FROM blockfortunedeposits WHERE id = $1")
        .bind(id)
        .fetch_optional(ex)
        .await?;

    Ok(deposit)
}

/// A profile's deposits, newest first.
pub async fn get_deposits_for_profile(
    pool: &PgPool,
    profile_id: Uuid,
) -> anyhow::Result<Vec<Deposit>> {
    let deposits = sqlx::query_as::<_, Deposit>(
        "SELECT * FROM blockfortunedeposits WHERE profile_id = $1 ORDER BY created_at DESC",
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await?;

    Ok(deposits)
}

/// Back-office listing, optionally filtered by status.
pub async fn list_deposits(pool: &PgPool, status: Option<&str>) -> anyhow::Result<Vec<Deposit>> {
    let deposits = match status {
        Some(s) => {
            sqlx::query_as::<_, Deposit>(
                "SELECT * FROM blockfortunedeposits WHERE status = $1 ORDER BY created_at DESC",
            )
            .bind(s)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Deposit>(
                "SELECT * FROM blockfortunedeposits ORDER BY created_at DESC",
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(deposits)
}

/// Flip pending → completed. Returns `None` when the deposit was not pending,
/// which is how concurrent approvals lose the race.
pub async fn mark_completed(ex: impl PgExecutor<'_>, id: Uuid) -> anyhow::Result<Option<Deposit>> {
    let deposit = sqlx::query_as::<_, Deposit>(
        r#"
        UPDATE blockfortunedeposits
        SET status = 'completed', processed_at = NOW()
        WHERE id = $1 AND status = 'pending'
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;

    Ok(deposit)
}

/// Flip pending → rejected with admin notes. Returns `None` when not pending.
pub async fn mark_rejected(
    ex: impl PgExecutor<'_>,
    id: Uuid,
    notes: Option<&str>,
) -> anyhow::Result<Option<Deposit>> {
    let deposit = sqlx::query_as::<_, Deposit>(
        r#"
        UPDATE blockfortunedeposits
        SET status = 'rejected', admin_notes = $2, processed_at = NOW()
        WHERE id = $1 AND status = 'pending'
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(notes)
    .fetch_optional(ex)
    .await?;

    Ok(deposit)
}

pub async fn count_pending(pool: &PgPool) -> anyhow::Result<i64> {
    let row: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM blockfortunedeposits WHERE status = 'pending'")
            .fetch_one(pool)
            .await?;

    Ok(row.0)
}
