use metrics::counter;
use sqlx::PgPool;
use tokio::time::{interval, Duration};

use crate::db::outbox_repo;
use crate::services::notifier::Mailer;

/// Number of outbox rows drained per tick.
const DISPATCH_BATCH_SIZE: i64 = 20;

/// Run the outbox dispatcher loop. Periodically drains pending emails from
/// the outbox and delivers them over SMTP. A failed send is recorded on the
/// row and retried on later ticks until the attempt cap is reached; it never
/// affects the ledger write that enqueued it.
pub async fn run_outbox_dispatcher(
    pool: PgPool,
    mailer: Mailer,
    poll_interval_secs: u64,
    max_attempts: i32,
) {
    let mut ticker = interval(Duration::from_secs(poll_interval_secs));
    tracing::info!(
        interval_secs = poll_interval_secs,
        max_attempts,
        "Outbox dispatcher started"
    );

    loop {
        ticker.tick().await;

        let batch = match outbox_repo::get_pending(&pool, DISPATCH_BATCH_SIZE).await {
            Ok(b) => b,
            Err(e) => {
                tracing::error!(error = %e, "Outbox dispatcher: failed to fetch pending emails");
                continue;
            }
        };

        if batch.is_empty() {
            tracing::debug!("Outbox dispatcher: no pending emails");
            continue;
        }

        tracing::debug!(count = batch.len(), "Outbox dispatcher: delivering batch");

        for email in &batch {
            match mailer.send(&email.recipient, &email.subject, &email.html_body).await {
                Ok(()) => {
                    if let Err(e) = outbox_repo::mark_sent(&pool, email.id).await {
                        tracing::error!(
                            error = %e,
                            email_id = %email.id,
                            "Outbox dispatcher: failed to mark email sent"
                        );
                        continue;
                    }
                    counter!("emails_sent_total").increment(1);
                    tracing::info!(
                        email_id = %email.id,
                        recipient = %email.recipient,
                        "Email delivered"
                    );
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    tracing::warn!(
                        email_id = %email.id,
                        recipient = %email.recipient,
                        attempts = email.attempts + 1,
                        error = %err_msg,
                        "Email delivery failed"
                    );
                    counter!("emails_failed_total").increment(1);
                    if let Err(e) =
                        outbox_repo::mark_failure(&pool, email.id, &err_msg, max_attempts).await
                    {
                        tracing::error!(
                            error = %e,
                            email_id = %email.id,
                            "Outbox dispatcher: failed to record delivery failure"
                        );
                    }
                }
            }
        }
    }
}
