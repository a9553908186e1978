use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::OutboxEmail;

/// Enqueue an email inside the caller's transaction. The row becomes visible
/// to the dispatcher only when the surrounding ledger write commits.
pub async fn enqueue(
    ex: impl PgExecutor<'_>,
    recipient: &str,
    subject: &str,
    html_body: &str,
) -> anyhow::Result<OutboxEmail> {
    let email = sqlx::query_as::<_, OutboxEmail>(
        r#"
        INSERT INTO blockfortune_email_outbox (recipient, subject, html_body)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(recipient)
    .bind(subject)
    .bind(html_body)
    .fetch_one(ex)
    .await?;

    Ok(email)
}

/// Oldest undelivered emails, capped at `limit`.
pub async fn get_pending(pool: &PgPool, limit: i64) -> anyhow::Result<Vec<OutboxEmail>> {
    let emails = sqlx::query_as::<_, OutboxEmail>(
        "SELECT * FROM blockfortune_email_outbox WHERE status = 'pending' ORDER BY created_at ASC LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(emails)
}

pub async fn mark_sent(pool: &PgPool, id: Uuid) -> anyhow::Result<()> {
    sqlx::query(
        "UPDATE blockfortune_email_outbox SET status = 'sent', sent_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Record a delivery failure. The row stays pending until it has burned
/// `max_attempts` tries, then flips to failed.
pub async fn mark_failure(
    pool: &PgPool,
    id: Uuid,
    error: &str,
    max_attempts: i32,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE blockfortune_email_outbox
        SET attempts = attempts + 1,
            last_error = $2,
            status = CASE WHEN attempts + 1 >= $3 THEN 'failed' ELSE 'pending' END
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(error)
    .bind(max_attempts)
    .execute(pool)
    .await?;

    Ok(())
}
