use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::Profile;

pub struct NewProfile<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub referral_code: &'a str,
    pub referred_by: Option<Uuid>,
}

/// Insert a freshly signed-up profile.
pub async fn insert_profile(
    ex: impl PgExecutor<'_>,
    new: &NewProfile<'_>,
) -> anyhow::Result<Profile> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO blockfortuneprofile
            (username, email, password_hash, first_name, last_name, referral_code, referred_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(new.username)
    .bind(new.email)
    .bind(new.password_hash)
    .bind(new.first_name)
    .bind(new.last_name)
    .bind(new.referral_code)
    .bind(new.referred_by)
    .fetch_one(ex)
    .await?;

    Ok(profile)
}

pub async fn get_profile(ex: impl PgExecutor<'_>, id: Uuid) -> anyhow::Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>("SELECT * FROM blockfortuneprofile WHERE id = $1")
        .bind(id)
        .fetch_optional(ex)
        .await?;

    Ok(profile)
}

/// Look up a profile for login by username or email.
pub async fn get_by_username_or_email(
    pool: &PgPool,
    identifier: &str,
) -> anyhow::Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(
        "SELECT * FROM blockfortuneprofile WHERE username = $1 OR email = $1",
    )
    .bind(identifier)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

pub async fn get_by_referral_code(
    pool: &PgPool,
    referral_code: &str,
) -> anyhow::Result<Option<Profile>> {
    let profile =
        sqlx::query_as::<_, Profile>("SELECT * FROM blockfortuneprofile WHERE referral_code = $1")
            .bind(referral_code)
            .fetch_optional(pool)
            .await?;

    Ok(profile)
}

pub async fn username_taken(pool: &PgPool, username: &str) -> anyhow::Result<bool> {
    let row: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM blockfortuneprofile WHERE username = $1")
            .bind(username)
            .fetch_one(pool)
            .await?;

    Ok(row.0 > 0)
}

pub async fn email_taken(pool: &PgPool, email: &str) -> anyhow::Result<bool> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM blockfortuneprofile WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await?;

    Ok(row.0 > 0)
}

/// Credit an approved deposit: balance and active deposit both grow.
pub async fn credit_deposit(
    ex: impl PgExecutor<'_>,
    profile_id: Uuid,
    amount: Decimal,
) -> anyhow::Result<Profile> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        UPDATE blockfortuneprofile
        SET balance = balance + $2,
            active_deposit = active_deposit + $2,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(profile_id)
    .bind(amount)
    .fetch_one(ex)
    .await?;

    Ok(profile)
}

/// Reserve funds for a withdrawal request. Conditional on sufficient balance;
/// returns `None` (no row updated) when the balance cannot cover the debit.
pub async fn reserve_withdrawal(
    ex: impl PgExecutor<'_>,
    profile_id: Uuid,
    total_debit: Decimal,
    amount: Decimal,
) -> anyhow::Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        UPDATE blockfortuneprofile
        SET balance = balance - $2,
            pending_withdrawal = pending_withdrawal + $3,
            updated_at = NOW()
        WHERE id = $1 AND balance >= $2
        RETURNING *
        "#,
    )
    .bind(profile_id)
    .bind(total_debit)
    .bind(amount)
    .fetch_optional(ex)
    .await?;

    Ok(profile)
}

/// Settle an approved withdrawal: the reservation becomes withdrawn total.
/// No re-debit — the balance was already reduced at request time.
pub async fn settle_withdrawal(
    ex: impl PgExecutor<'_>,
    profile_id: Uuid,
    amount: Decimal,
) -> anyhow::Result<Profile> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        UPDATE blockfortuneprofile
        SET pending_withdrawal = pending_withdrawal - $2,
            withdrawal_total = withdrawal_total + $2,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(profile_id)
    .bind(amount)
    .fetch_one(ex)
    .await?;

    Ok(profile)
}

/// Undo a rejected withdrawal's reservation: amount + fee return to balance.
pub async fn restore_withdrawal(
    ex: impl PgExecutor<'_>,
    profile_id: Uuid,
    total_debit: Decimal,
    amount: Decimal,
) -> anyhow::Result<Profile> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        UPDATE blockfortuneprofile
        SET balance = balance + $2,
            pending_withdrawal = pending_withdrawal - $3,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(profile_id)
    .bind(total_debit)
    .bind(amount)
    .fetch_one(ex)
    .await?;

    Ok(profile)
}

/// Debit the balance for a new investment. Conditional on sufficient balance.
pub async fn debit_investment(
    ex: impl PgExecutor<'_>,
    profile_id: Uuid,
    amount: Decimal,
) -> anyhow::Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        UPDATE blockfortuneprofile
        SET balance = balance - $2,
            active_deposit = active_deposit + $2,
            updated_at = NOW()
        WHERE id = $1 AND balance >= $2
        RETURNING *
        "#,
    )
    .bind(profile_id)
    .bind(amount)
    .fetch_optional(ex)
    .await?;

    Ok(profile)
}

/// Credit a matured investment: principal plus earnings return to balance,
/// earnings accrue to earned_total, and the principal leaves active_deposit.
pub async fn credit_maturity(
    ex: impl PgExecutor<'_>,
    profile_id: Uuid,
    expected_return: Decimal,
    principal: Decimal,
) -> anyhow::Result<Profile> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        UPDATE blockfortuneprofile
        SET balance = balance + $2,
            earned_total = earned_total + ($2 - $3),
            active_deposit = active_deposit - $3,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(profile_id)
    .bind(expected_return)
    .bind(principal)
    .fetch_one(ex)
    .await?;

    Ok(profile)
}

/// Credit a referral earnings payout to balance and earned_total.
pub async fn credit_referral_payout(
    ex: impl PgExecutor<'_>,
    profile_id: Uuid,
    amount: Decimal,
) -> anyhow::Result<Profile> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        UPDATE blockfortuneprofile
        SET balance = balance + $2,
            earned_total = earned_total + $2,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(profile_id)
    .bind(amount)
    .fetch_one(ex)
    .await?;

    Ok(profile)
}
