use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::Investment;

/// Insert a new active investment with a plan snapshot.
#[allow(clippy::too_many_arguments)]
pub async fn insert_investment(
    ex: impl PgExecutor<'_>,
    profile_id: Uuid,
    plan_id: Uuid,
    plan_name: &str,
    amount: Decimal,
    daily_roi: Decimal,
    duration_days: i32,
    expected_return: Decimal,
    end_date: DateTime<Utc>,
) -> anyhow::Result<Investment> {
    let investment = sqlx::query_as::<_, Investment>(
        r#"
        INSERT INTO blockfortune_investments
            (profile_id, plan_id, plan_name, amount, daily_roi, duration_days, expected_return, end_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(profile_id)
    .bind(plan_id)
    .bind(plan_name)
    .bind(amount)
    .bind(daily_roi)
    .bind(duration_days)
    .bind(expected_return)
    .bind(end_date)
    .fetch_one(ex)
    .await?;

    Ok(investment)
}

/// A profile's investments, newest first.
pub async fn get_investments_for_profile(
    pool: &PgPool,
    profile_id: Uuid,
) -> anyhow::Result<Vec<Investment>> {
    let investments = sqlx::query_as::<_, Investment>(
        "SELECT * FROM blockfortune_investments WHERE profile_id = $1 ORDER BY created_at DESC",
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await?;

    Ok(investments)
}

pub async fn count_active_for_profile(pool: &PgPool, profile_id: Uuid) -> anyhow::Result<i64> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM blockfortune_investments WHERE profile_id = $1 AND status = 'active'",
    )
    .bind(profile_id)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

/// Active investments whose end date has passed — candidates for maturation.
pub async fn get_matured_active(pool: &PgPool) -> anyhow::Result<Vec<Investment>> {
    let investments = sqlx::query_as::<_, Investment>(
        "SELECT * FROM blockfortune_investments WHERE status = 'active' AND end_date <= NOW() ORDER BY end_date ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(investments)
}

/// Flip active → completed. Returns `None` when the investment was not
/// active, so overlapping sweeps cannot credit a maturity twice.
pub async fn mark_completed(
    ex: impl PgExecutor<'_>,
    id: Uuid,
) -> anyhow::Result<Option<Investment>> {
    let investment = sqlx::query_as::<_, Investment>(
        r#"
        UPDATE blockfortune_investments
        SET status = 'completed'
        WHERE id = $1 AND status = 'active'
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;

    Ok(investment)
}
