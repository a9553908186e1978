use sqlx::PgPool;
use tokio::time::{interval, Duration};

use crate::db::investment_repo;
use crate::ledger::investments;

/// Run the investment maturation loop. Periodically sweeps active
/// investments whose term has ended, credits the expected return, and
/// flips them to completed. Each maturity runs in its own transaction;
/// one bad row never blocks the rest of the sweep.
pub async fn run_investment_monitor(pool: PgPool, poll_interval_secs: u64) {
    let mut ticker = interval(Duration::from_secs(poll_interval_secs));
    tracing::info!(
        interval_secs = poll_interval_secs,
        "Investment monitor started"
    );

    loop {
        ticker.tick().await;

        let matured = match investment_repo::get_matured_active(&pool).await {
            Ok(m) => m,
            Err(e) => {
                tracing::error!(error = %e, "Investment monitor: failed to fetch matured investments");
                continue;
            }
        };

        if matured.is_empty() {
            tracing::debug!("Investment monitor: nothing to mature");
            continue;
        }

        tracing::info!(count = matured.len(), "Investment monitor: maturing investments");

        for investment in &matured {
            match investments::complete_investment(&pool, investment.id).await {
                Ok(Some(_)) => {}
                Ok(None) => {
                    tracing::debug!(
                        investment_id = %investment.id,
                        "Investment monitor: already settled by another sweep"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        investment_id = %investment.id,
                        "Investment monitor: failed to complete investment"
                    );
                }
            }
        }
    }
}
