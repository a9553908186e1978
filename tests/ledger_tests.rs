mod common;

use rust_decimal::Decimal;
use uuid::Uuid;

use blockfortune::errors::AppError;
use blockfortune::ledger::{deposits, investments, referrals, withdrawals};
use blockfortune::models::Referral;

#[tokio::test]
async fn test_deposit_approval_credits_balance_and_fans_out_commission() {
    let pool = common::setup_test_db().await;
    let config = common::test_config();

    let referrer = common::seed_profile(&pool, "ledger_referrer", Decimal::ZERO).await;
    let referee =
        common::seed_referred_profile(&pool, "ledger_referee", Decimal::ZERO, referrer.id).await;
    let plan = common::seed_plan(
        &pool,
        "test_commission_plan",
        Decimal::from(100),
        Decimal::from(1000),
        Decimal::new(150, 2),
        10,
        Decimal::from(10), // 10% affiliate commission
    )
    .await;

    let request = deposits::DepositRequest {
        amount: Decimal::from(500),
        crypto_type: "BTC".into(),
        wallet_address: "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh".into(),
        plan_id: plan.id,
    };
    let deposit = deposits::request_deposit(&pool, &config, referee.id, &request)
        .await
        .unwrap();
    assert_eq!(deposit.status, "pending");

    let approved = deposits::approve_deposit(&pool, deposit.id).await.unwrap();
    assert_eq!(approved.status, "completed");

    // Balance and active deposit credited once
    let reloaded = common::reload_profile(&pool, referee.id).await;
    assert_eq!(reloaded.balance, Decimal::from(500));
    assert_eq!(reloaded.active_deposit, Decimal::from(500));

    // 10% of $500 recorded as a pending commission for the referrer
    let referral: Referral =
        sqlx::query_as("SELECT * FROM blockfortunereferrals WHERE referrer_id = $1")
            .bind(referrer.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(referral.earned_amount, Decimal::from(50));
    assert_eq!(referral.status, "pending");
    assert_eq!(referral.deposit_id, Some(deposit.id));

    // The approval notified the depositor exactly once
    assert_eq!(common::outbox_count_for(&pool, &referee.email).await, 1);
}

#[tokio::test]
async fn test_deposit_cannot_be_approved_twice() {
    let pool = common::setup_test_db().await;
    let config = common::test_config();

    let profile = common::seed_profile(&pool, "ledger_double_approve", Decimal::ZERO).await;
    let plan = common::seed_plan(
        &pool,
        "test_double_plan",
        Decimal::from(100),
        Decimal::from(1000),
        Decimal::ONE,
        10,
        Decimal::ZERO,
    )
    .await;

    let request = deposits::DepositRequest {
        amount: Decimal::from(200),
        crypto_type: "BTC".into(),
        wallet_address: "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh".into(),
        plan_id: plan.id,
    };
    let deposit = deposits::request_deposit(&pool, &config, profile.id, &request)
        .await
        .unwrap();

    deposits::approve_deposit(&pool, deposit.id).await.unwrap();
    let emails_after_first = common::outbox_count_for(&pool, &profile.email).await;

    let err = deposits::approve_deposit(&pool, deposit.id).await.unwrap_err();
    assert_eq!(err.to_string(), "Deposit already processed");
    match err {
        AppError::AlreadyProcessed { current_status, .. } => {
            assert_eq!(current_status, "completed");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Credited exactly once, no second notification
    let reloaded = common::reload_profile(&pool, profile.id).await;
    assert_eq!(reloaded.balance, Decimal::from(200));
    assert_eq!(
        common::outbox_count_for(&pool, &profile.email).await,
        emails_after_first
    );
}

#[tokio::test]
async fn test_concurrent_deposit_approval_has_one_winner() {
    let pool = common::setup_test_db().await;
    let config = common::test_config();

    let profile = common::seed_profile(&pool, "ledger_race", Decimal::ZERO).await;
    let plan = common::seed_plan(
        &pool,
        "test_race_plan",
        Decimal::from(100),
        Decimal::from(1000),
        Decimal::ONE,
        10,
        Decimal::ZERO,
    )
    .await;

    let request = deposits::DepositRequest {
        amount: Decimal::from(300),
        crypto_type: "BTC".into(),
        wallet_address: "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh".into(),
        plan_id: plan.id,
    };
    let deposit = deposits::request_deposit(&pool, &config, profile.id, &request)
        .await
        .unwrap();

    // Two admins race on the same pending deposit
    let (first, second) = tokio::join!(
        deposits::approve_deposit(&pool, deposit.id),
        deposits::approve_deposit(&pool, deposit.id),
    );

    let winners = [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(winners, 1);

    let reloaded = common::reload_profile(&pool, profile.id).await;
    assert_eq!(reloaded.balance, Decimal::from(300));
}

#[tokio::test]
async fn test_deposit_rejection_leaves_balance_untouched() {
    let pool = common::setup_test_db().await;
    let config = common::test_config();

    let profile = common::seed_profile(&pool, "ledger_dep_reject", Decimal::from(10)).await;
    let plan = common::seed_plan(
        &pool,
        "test_reject_plan",
        Decimal::from(100),
        Decimal::from(1000),
        Decimal::ONE,
        10,
        Decimal::ZERO,
    )
    .await;

    let request = deposits::DepositRequest {
        amount: Decimal::from(150),
        crypto_type: "BTC".into(),
        wallet_address: "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh".into(),
        plan_id: plan.id,
    };
    let deposit = deposits::request_deposit(&pool, &config, profile.id, &request)
        .await
        .unwrap();

    let rejected = deposits::reject_deposit(&pool, deposit.id, Some("proof of payment missing"))
        .await
        .unwrap();
    assert_eq!(rejected.status, "rejected");
    assert_eq!(rejected.admin_notes.as_deref(), Some("proof of payment missing"));

    let reloaded = common::reload_profile(&pool, profile.id).await;
    assert_eq!(reloaded.balance, Decimal::from(10));
}

#[tokio::test]
async fn test_withdrawal_reserves_then_settles_on_approval() {
    let pool = common::setup_test_db().await;
    let config = common::test_config();

    let profile = common::seed_profile(&pool, "ledger_withdraw", Decimal::from(1000)).await;

    let request = withdrawals::WithdrawalRequest {
        amount: Decimal::from(100),
        crypto_type: "ETH".into(),
        wallet_address: "0x71C7656EC7ab88b098defB751B7401B5f6d8976F".into(),
    };
    let withdrawal = withdrawals::request_withdrawal(&pool, &config, profile.id, &request)
        .await
        .unwrap();
    assert_eq!(withdrawal.status, "pending");

    // Funds reserved at request time
    let reserved = common::reload_profile(&pool, profile.id).await;
    assert_eq!(reserved.balance, Decimal::from(900));
    assert_eq!(reserved.pending_withdrawal, Decimal::from(100));

    // Approval settles the reservation without re-debiting
    withdrawals::approve_withdrawal(&pool, withdrawal.id).await.unwrap();

    let settled = common::reload_profile(&pool, profile.id).await;
    assert_eq!(settled.balance, Decimal::from(900));
    assert_eq!(settled.pending_withdrawal, Decimal::ZERO);
    assert_eq!(settled.withdrawal_total, Decimal::from(100));
}

#[tokio::test]
async fn test_withdrawal_rejection_restores_reservation() {
    let pool = common::setup_test_db().await;
    let config = common::test_config();

    let profile = common::seed_profile(&pool, "ledger_wd_reject", Decimal::from(500)).await;

    let request = withdrawals::WithdrawalRequest {
        amount: Decimal::from(200),
        crypto_type: "BTC".into(),
        wallet_address: "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh".into(),
    };
    let withdrawal = withdrawals::request_withdrawal(&pool, &config, profile.id, &request)
        .await
        .unwrap();

    withdrawals::reject_withdrawal(&pool, withdrawal.id, Some("address flagged"))
        .await
        .unwrap();

    let restored = common::reload_profile(&pool, profile.id).await;
    assert_eq!(restored.balance, Decimal::from(500));
    assert_eq!(restored.pending_withdrawal, Decimal::ZERO);
    assert_eq!(restored.withdrawal_total, Decimal::ZERO);
}

#[tokio::test]
async fn test_approving_settled_withdrawal_mutates_nothing() {
    let pool = common::setup_test_db().await;
    let config = common::test_config();

    let profile = common::seed_profile(&pool, "ledger_wd_settled", Decimal::from(400)).await;

    let request = withdrawals::WithdrawalRequest {
        amount: Decimal::from(100),
        crypto_type: "BTC".into(),
        wallet_address: "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh".into(),
    };
    let withdrawal = withdrawals::request_withdrawal(&pool, &config, profile.id, &request)
        .await
        .unwrap();
    withdrawals::approve_withdrawal(&pool, withdrawal.id).await.unwrap();

    let before = common::reload_profile(&pool, profile.id).await;
    let emails_before = common::outbox_count_for(&pool, &profile.email).await;

    let err = withdrawals::approve_withdrawal(&pool, withdrawal.id).await.unwrap_err();
    assert_eq!(err.to_string(), "Withdrawal already processed");
    match err {
        AppError::AlreadyProcessed { current_status, .. } => {
            assert_eq!(current_status, "completed");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // No mutation and no email on the losing path
    let after = common::reload_profile(&pool, profile.id).await;
    assert_eq!(after.balance, before.balance);
    assert_eq!(after.pending_withdrawal, before.pending_withdrawal);
    assert_eq!(after.withdrawal_total, before.withdrawal_total);
    assert_eq!(
        common::outbox_count_for(&pool, &profile.email).await,
        emails_before
    );
}

#[tokio::test]
async fn test_withdrawal_insufficient_balance() {
    let pool = common::setup_test_db().await;
    let config = common::test_config();

    let profile = common::seed_profile(&pool, "ledger_wd_poor", Decimal::from(60)).await;

    let request = withdrawals::WithdrawalRequest {
        amount: Decimal::from(100),
        crypto_type: "BTC".into(),
        wallet_address: "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh".into(),
    };
    let err = withdrawals::request_withdrawal(&pool, &config, profile.id, &request)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Insufficient balance");

    let reloaded = common::reload_profile(&pool, profile.id).await;
    assert_eq!(reloaded.balance, Decimal::from(60));
}

#[tokio::test]
async fn test_investment_creation_debits_balance_and_snapshots_plan() {
    let pool = common::setup_test_db().await;

    let profile = common::seed_profile(&pool, "ledger_investor", Decimal::from(2000)).await;
    let plan = common::seed_plan(
        &pool,
        "test_invest_plan",
        Decimal::from(100),
        Decimal::from(5000),
        Decimal::from(2), // 2%/day
        10,
        Decimal::ZERO,
    )
    .await;

    let request = investments::InvestmentRequest {
        plan_id: plan.id,
        amount: Decimal::from(1000),
    };
    let investment = investments::create_investment(&pool, profile.id, &request)
        .await
        .unwrap();

    // 1000 + 1000 * 0.02 * 10 = 1200
    assert_eq!(investment.expected_return, Decimal::from(1200));
    assert_eq!(investment.status, "active");
    assert_eq!(investment.plan_name, plan.name);

    let reloaded = common::reload_profile(&pool, profile.id).await;
    assert_eq!(reloaded.balance, Decimal::from(1000));
    assert_eq!(reloaded.active_deposit, Decimal::from(1000));
}

#[tokio::test]
async fn test_investment_with_insufficient_balance_writes_nothing() {
    let pool = common::setup_test_db().await;

    let profile = common::seed_profile(&pool, "ledger_poor_investor", Decimal::from(50)).await;
    let plan = common::seed_plan(
        &pool,
        "test_poor_plan",
        Decimal::from(100),
        Decimal::from(5000),
        Decimal::ONE,
        10,
        Decimal::ZERO,
    )
    .await;

    let request = investments::InvestmentRequest {
        plan_id: plan.id,
        amount: Decimal::from(500),
    };
    let err = investments::create_investment(&pool, profile.id, &request)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Insufficient balance");

    let count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM blockfortune_investments WHERE profile_id = $1")
            .bind(profile.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count.0, 0);

    let reloaded = common::reload_profile(&pool, profile.id).await;
    assert_eq!(reloaded.balance, Decimal::from(50));
}

#[tokio::test]
async fn test_matured_investment_credits_expected_return() {
    let pool = common::setup_test_db().await;

    let profile = common::seed_profile(&pool, "ledger_maturity", Decimal::ZERO).await;
    let plan = common::seed_plan(
        &pool,
        "test_maturity_plan",
        Decimal::from(100),
        Decimal::from(5000),
        Decimal::ONE,
        5,
        Decimal::ZERO,
    )
    .await;

    // Insert an already-expired active investment directly
    let investment_id: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO blockfortune_investments
            (profile_id, plan_id, plan_name, amount, daily_roi, duration_days,
             expected_return, end_date)
        VALUES ($1, $2, $3, 1000, 1.00, 5, 1050, NOW() - INTERVAL '1 day')
        RETURNING id
        "#,
    )
    .bind(profile.id)
    .bind(plan.id)
    .bind(&plan.name)
    .fetch_one(&pool)
    .await
    .unwrap();

    let completed = investments::complete_investment(&pool, investment_id.0)
        .await
        .unwrap();
    assert!(completed.is_some());

    let reloaded = common::reload_profile(&pool, profile.id).await;
    assert_eq!(reloaded.balance, Decimal::from(1050));
    assert_eq!(reloaded.earned_total, Decimal::from(50));

    // A second sweep finds nothing to do
    let again = investments::complete_investment(&pool, investment_id.0)
        .await
        .unwrap();
    assert!(again.is_none());

    let unchanged = common::reload_profile(&pool, profile.id).await;
    assert_eq!(unchanged.balance, Decimal::from(1050));
}

#[tokio::test]
async fn test_referral_payout_credits_exactly_the_flipped_sum() {
    let pool = common::setup_test_db().await;

    let referrer = common::seed_profile(&pool, "ledger_payout", Decimal::from(10)).await;
    let referee_a = common::seed_profile(&pool, "ledger_payee_a", Decimal::ZERO).await;
    let referee_b = common::seed_profile(&pool, "ledger_payee_b", Decimal::ZERO).await;

    common::seed_referral(&pool, referrer.id, referee_a.id, Decimal::from(25), "pending").await;
    common::seed_referral(&pool, referrer.id, referee_b.id, Decimal::from(35), "pending").await;
    // Already-paid rows never count again
    common::seed_referral(&pool, referrer.id, referee_a.id, Decimal::from(99), "paid").await;

    let payout = referrals::withdraw_referral_earnings(&pool, referrer.id)
        .await
        .unwrap();
    assert_eq!(payout.amount, Decimal::from(60));
    assert_eq!(payout.referral_count, 2);

    let reloaded = common::reload_profile(&pool, referrer.id).await;
    assert_eq!(reloaded.balance, Decimal::from(70));
    assert_eq!(reloaded.earned_total, Decimal::from(60));

    // The payout left an audit row
    let audit: (Decimal, i32) = sqlx::query_as(
        "SELECT amount, referral_count FROM blockfortune_referral_withdrawals WHERE profile_id = $1",
    )
    .bind(referrer.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(audit.0, Decimal::from(60));
    assert_eq!(audit.1, 2);

    // Nothing pending remains
    let err = referrals::withdraw_referral_earnings(&pool, referrer.id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "No pending referral earnings");
}
