use metrics::counter;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::{deposit_repo, outbox_repo, plan_repo, profile_repo, referral_repo};
use crate::errors::AppError;
use crate::models::{CryptoType, Deposit};
use crate::services::notifier;

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub amount: Decimal,
    pub crypto_type: String,
    pub wallet_address: String,
    pub plan_id: Uuid,
}

/// Create a pending deposit and alert the back-office.
pub async fn request_deposit(
    pool: &PgPool,
    config: &AppConfig,
    profile_id: Uuid,
    req: &DepositRequest,
) -> Result<Deposit, AppError> {
    let profile = profile_repo::get_profile(pool, profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("profile not found".into()))?;

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

    let crypto = CryptoType::from_api_str(&req.crypto_type).ok_or_else(|| {
        AppError::Validation(format!("Unsupported crypto type: {}", req.crypto_type))
    })?;
    super::validate_wallet_address(&req.wallet_address)?;

    let reference = new_reference();

    let mut tx = pool.begin().await?;

    let deposit = deposit_repo::insert_deposit(
        &mut *tx,
        profile_id,
        plan.id,
        req.amount,
        &crypto.to_string(),
        req.wallet_address.trim(),
        &reference,
    )
    .await?;

    let (subject, body) =
        notifier::format_deposit_request_admin(&profile.username, req.amount, crypto, &reference);
    outbox_repo::enqueue(&mut *tx, &config.admin_email, &subject, &body).await?;

    tx.commit().await?;

    counter!("deposits_created_total").increment(1);
    tracing::info!(
        deposit_id = %deposit.id,
        profile_id = %profile_id,
        amount = %req.amount,
        reference = %deposit.reference,
        "Deposit request created"
    );

    Ok(deposit)
}

/// Approve a pending deposit: credit the balance, record the referral
/// commission, notify the user. One transaction; concurrent approvals of
/// the same deposit resolve to exactly one winner.
pub async fn approve_deposit(pool: &PgPool, deposit_id: Uuid) -> Result<Deposit, AppError> {
    let mut tx = pool.begin().await?;

    let Some(deposit) = deposit_repo::mark_completed(&mut *tx, deposit_id).await? else {
        let current = deposit_repo::get_deposit(&mut *tx, deposit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("deposit not found".into()))?;
        return Err(AppError::AlreadyProcessed {
            entity: "Deposit",
            current_status: current.status,
        });
    };

    let profile = profile_repo::credit_deposit(&mut *tx, deposit.profile_id, deposit.amount).await?;

    // Referral commission fan-out: amount × plan.affiliate_commission%
    if let Some(referrer_id) = profile.referred_by {
        if let Some(plan) = plan_repo::get_plan(&mut *tx, deposit.plan_id).await? {
            let commission =
                (deposit.amount * plan.affiliate_commission / Decimal::ONE_HUNDRED).round_dp(2);
            if commission > Decimal::ZERO {
                referral_repo::insert_referral(
                    &mut *tx,
                    referrer_id,
                    profile.id,
                    deposit.id,
                    commission,
                )
                .await?;
                counter!("referral_commissions_total").increment(1);
                tracing::info!(
                    referrer_id = %referrer_id,
                    referee_id = %profile.id,
                    commission = %commission,
                    "Referral commission recorded"
                );
            }
        }
    }

    let (subject, body) =
        notifier::format_deposit_approved(&profile.username, deposit.amount, &deposit.reference);
    outbox_repo::enqueue(&mut *tx, &profile.email, &subject, &body).await?;

    tx.commit().await?;

    counter!("deposits_approved_total").increment(1);
    tracing::info!(
        deposit_id = %deposit.id,
        profile_id = %deposit.profile_id,
        amount = %deposit.amount,
        "Deposit approved"
    );

    Ok(deposit)
}

/// Reject a pending deposit. No balance change.
pub async fn reject_deposit(
    pool: &PgPool,
    deposit_id: Uuid,
    notes: Option<&str>,
) -> Result<Deposit, AppError> {
    let mut tx = pool.begin().await?;

    let Some(deposit) = deposit_repo::mark_rejected(&mut *tx, deposit_id, notes).await? else {
        let current = deposit_repo::get_deposit(&mut *tx, deposit_id)
            .await?
            .ok_or_else(|| AppError::NotFound("deposit not found".into()))?;
        return Err(AppError::AlreadyProcessed {
            entity: "Deposit",
            current_status: current.status,
        });
    };

    let profile = profile_repo::get_profile(&mut *tx, deposit.profile_id)
        .await?
        .ok_or_else(|| AppError::NotFound("profile not found".into()))?;

    let (subject, body) = notifier::format_deposit_rejected(
        &profile.username,
        deposit.amount,
        &deposit.reference,
        notes,
    );
    outbox_repo::enqueue(&mut *tx, &profile.email, &subject, &body).await?;

    tx.commit().await?;

    counter!("deposits_rejected_total").increment(1);
    tracing::info!(
        deposit_id = %deposit.id,
        profile_id = %deposit.profile_id,
        "Deposit rejected"
    );

    Ok(deposit)
}

/// Generate a unique human-readable deposit reference.
fn new_reference() -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("DEP-{}", raw[..10].to_uppercase())
}
