pub mod deposit_repo;
pub mod investment_repo;
pub mod outbox_repo;
pub mod plan_repo;
pub mod profile_repo;
pub mod referral_repo;
pub mod withdrawal_repo;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub async fn init_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    // Verify connectivity
    sqlx::query("SELECT 1").execute(&pool).await?;

    Ok(pool)
}
