use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::InvestmentPlan;

/// Active catalog entries, cheapest tier first.
pub async fn get_active_plans(pool: &PgPool) -> anyhow::Result<Vec<InvestmentPlan>> {
    let plans = sqlx::query_as::<_, InvestmentPlan>(
        "SELECT * FROM blockfortune_investment_plans WHERE is_active = TRUE ORDER BY min_amount ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(plans)
}

pub async fn get_plan(
    ex: impl PgExecutor<'_>,
    id: Uuid,
) -> anyhow::Result<Option<InvestmentPlan>> {
    let plan = sqlx::query_as::<_, InvestmentPlan>(
        "SELECT * FROM blockfortune_investment_plans WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(ex)
    .await?;

    Ok(plan)
}
