use metrics::counter;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::{outbox_repo, profile_repo, withdrawal_repo};
use crate::errors::AppError;
use crate::models::{CryptoType, Withdrawal};
use crate::services::notifier;

#[derive(Debug, Deserialize)]
pub struct WithdrawalRequest {
    pub amount: Decimal,
    pub crypto_type: String,
    pub wallet_address: String,
}

/// Create a pending withdrawal, reserving `amount + network_fee` from the
/// balance in the same transaction. Approval later settles the reservation;
/// rejection restores it.
pub async fn request_withdrawal(
    pool: &PgPool,
    config: &AppConfig,
    profile_id: Uuid,
    req: &WithdrawalRequest,
) -> Result<Withdrawal, AppError> {
    if req.amount < config.min_withdrawal {
        return Err(AppError::Validation(format!(
            "Minimum withdrawal amount is ${}",
            config.min_withdrawal
        )));
    }

    let crypto = CryptoType::from_api_str(&req.crypto_type).ok_or_else(|| {
        AppError::Validation(format!("Unsupported crypto type: {}", req.crypto_type))
    })?;
    super::validate_wallet_address(&req.wallet_address)?;

    let network_fee = (req.amount * config.withdrawal_fee_pct / Decimal::ONE_HUNDRED).round_dp(2);
    let total_debit = req.amount + network_fee;

    let mut tx = pool.begin().await?;

    let Some(profile) =
        profile_repo::reserve_withdrawal(&mut *tx, profile_id, total_debit, req.amount).await?
    else {
        return Err(AppError::Validation("Insufficient balance".into()));
    };

    let withdrawal = withdrawal_repo::insert_withdrawal(
        &mut *tx,
        profile_id,
        req.amount,
        &crypto.to_string(),
        req.wallet_address.trim(),
        network_fee,
    )
    .await?;

    let (subject, body) = notifier::format_withdrawal_request_admin(
        &profile.username,
        req.amount,
        crypto,
        req.wallet_address.trim(),
    );
    outbox_repo::enqueue(&mut *tx, &config.admin_email, &subject, &body).await?;

    tx.commit().await?;

    counter!("withdrawals_created_total").increment(1);
    tracing::info!(
        withdrawal_id = %withdrawal.id,
        profile_id = %profile_id,
        amount = %req.amount,
        network_fee = %network_fee,
        "Withdrawal request created, balance reserved"
    );

    Ok(withdrawal)
}

/// Approve a pending withdrawal: the reservation taken at request time moves
/// to withdrawal_total. No re-debit. Non-pending rows mutate nothing.
pub async fn approve_withdrawal(
    pool: &PgPool,
    withdrawal_id: Uuid,
) -> Result<Withdrawal, AppError> {
    let mut tx = pool.begin().await?;

    let Some(withdrawal) = withdrawal_repo::mark_completed(&mut *tx, withdrawal_id).await? else {
        let current = withdrawal_repo::get_withdrawal(&mut *tx, withdrawal_id)
            .await?
            .ok_or_else(|| AppError::NotFound("withdrawal not found".into()))?;
        return Err(AppError::AlreadyProcessed {
            entity: "Withdrawal",
            current_status: current.status,
        });
    };

    let profile =
        profile_repo::settle_withdrawal(&mut *tx, withdrawal.profile_id, withdrawal.amount).await?;

    let (subject, body) = notifier::format_withdrawal_approved(
        &profile.username,
        withdrawal.amount,
        withdrawal.network_fee,
        &withdrawal.wallet_address,
    );
    outbox_repo::enqueue(&mut *tx, &profile.email, &subject, &body).await?;

    tx.commit().await?;

    counter!("withdrawals_approved_total").increment(1);
    tracing::info!(
        withdrawal_id = %withdrawal.id,
        profile_id = %withdrawal.profile_id,
        amount = %withdrawal.amount,
        "Withdrawal approved"
    );

    Ok(withdrawal)
}

/// Reject a pending withdrawal and return the reserved funds to the balance.
pub async fn reject_withdrawal(
    pool: &PgPool,
    withdrawal_id: Uuid,
    notes: Option<&str>,
) -> Result<Withdrawal, AppError> {
    let mut tx = pool.begin().await?;

    let Some(withdrawal) = withdrawal_repo::mark_rejected(&mut *tx, withdrawal_id, notes).await?
    else {
        let current = withdrawal_repo::get_withdrawal(&mut *tx, withdrawal_id)
            .await?
            .ok_or_else(|| AppError::NotFound("withdrawal not found".into()))?;
        return Err(AppError::AlreadyProcessed {
            entity: "Withdrawal",
            current_status: current.status,
        });
    };

    let total_debit = withdrawal.amount + withdrawal.network_fee;
    let profile = profile_repo::restore_withdrawal(
        &mut *tx,
        withdrawal.profile_id,
        total_debit,
        withdrawal.amount,
    )
    .await?;

    let (subject, body) =
        notifier::format_withdrawal_rejected(&profile.username, withdrawal.amount, notes);
    outbox_repo::enqueue(&mut *tx, &profile.email, &subject, &body).await?;

    tx.commit().await?;

    counter!("withdrawals_rejected_total").increment(1);
    tracing::info!(
        withdrawal_id = %withdrawal.id,
        profile_id = %withdrawal.profile_id,
        "Withdrawal rejected, reservation restored"
    );

    Ok(withdrawal)
}
