use chrono::{Duration, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{investment_repo, outbox_repo, plan_repo, profile_repo};
use crate::errors::AppError;
use crate::models::Investment;
use crate::services::notifier;

#[derive(Debug, Deserialize)]
pub struct InvestmentRequest {
    pub plan_id: Uuid,
    pub amount: Decimal,
}

/// Simple non-compounding return: principal plus daily ROI over the term.
pub fn expected_return(amount: Decimal, daily_roi: Decimal, duration_days: i32) -> Decimal {
    amount + amount * daily_roi / Decimal::ONE_HUNDRED * Decimal::from(duration_days)
}

/// Create an investment: debit the balance and insert the plan-snapshot row
/// in one transaction.
pub async fn create_investment(
    pool: &PgPool,
    profile_id: Uuid,
    req: &InvestmentRequest,
) -> Result<Investment, AppError> {
    let plan = plan_repo::get_plan(pool, req.plan_id)
        .await?
        .ok_or_else(|| AppError::NotFound("investment plan not found".into()))?;

    if !plan.is_active {
        return Err(AppError::Validation(
            "Investment plan is no longer available".into(),
        ));
    }
    if !plan.accepts_amount(req.amount) {
        return Err(AppError::Validation(format!(
            "Amount must be between ${} and ${} for the {} plan",
            plan.min_amount, plan.max_amount, plan.name
        )));
    }

    let projected = expected_return(req.amount, plan.daily_roi, plan.duration_days).round_dp(2);
    let end_date = Utc::now() + Duration::days(plan.duration_days as i64);

    let mut tx = pool.begin().await?;

    if profile_repo::debit_investment(&mut *tx, profile_id, req.amount)
        .await?
        .is_none()
    {
        return Err(AppError::Validation("Insufficient balance".into()));
    }

    let investment = investment_repo::insert_investment(
        &mut *tx,
        profile_id,
        plan.id,
        &plan.name,
        req.amount,
        plan.daily_roi,
        plan.duration_days,
        projected,
        end_date,
    )
    .await?;

    tx.commit().await?;

    counter!("investments_created_total").increment(1);
    tracing::info!(
        investment_id = %investment.id,
        profile_id = %profile_id,
        plan = %plan.name,
        amount = %req.amount,
        expected_return = %projected,
        "Investment created"
    );

    Ok(investment)
}

/// Mature one investment: flip active → completed and credit the return.
/// Returns `None` when the investment was already completed or cancelled,
/// so overlapping sweeps are harmless.
pub async fn complete_investment(
    pool: &PgPool,
    investment_id: Uuid,
) -> Result<Option<Investment>, AppError> {
    let mut tx = pool.begin().await?;

    let Some(investment) = investment_repo::mark_completed(&mut *tx, investment_id).await? else {
        return Ok(None);
    };

    let profile = profile_repo::credit_maturity(
        &mut *tx,
        investment.profile_id,
        investment.expected_return,
        investment.amount,
    )
    .await?;

    let (subject, body) = notifier::format_investment_matured(
        &profile.username,
        &investment.plan_name,
        investment.expected_return,
    );
    outbox_repo::enqueue(&mut *tx, &profile.email, &subject, &body).await?;

    tx.commit().await?;

    counter!("investments_matured_total").increment(1);
    tracing::info!(
        investment_id = %investment.id,
        profile_id = %investment.profile_id,
        expected_return = %investment.expected_return,
        "Investment matured, return credited"
    );

    Ok(Some(investment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_return_simple_interest() {
        // $1000 at 1.5%/day for 20 days → 1000 + 1000 * 0.015 * 20 = 1300
        let result = expected_return(Decimal::from(1000), Decimal::new(150, 2), 20);
        assert_eq!(result, Decimal::from(1300));
    }

    #[test]
    fn test_expected_return_zero_roi_returns_principal() {
        let result = expected_return(Decimal::from(500), Decimal::ZERO, 30);
        assert_eq!(result, Decimal::from(500));
    }

    #[test]
    fn test_expected_return_fractional_amount() {
        // $250.50 at 2%/day for 10 days → 250.50 + 250.50 * 0.02 * 10 = 300.60
        let result = expected_return(Decimal::new(25050, 2), Decimal::from(2), 10);
        assert_eq!(result, Decimal::new(30060, 2));
    }
}
