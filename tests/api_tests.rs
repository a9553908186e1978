mod common;

use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use tower::ServiceExt;
use uuid::Uuid;

use blockfortune::api::auth::issue_token;
use blockfortune::api::router::create_router;
use blockfortune::config::AppConfig;
use blockfortune::AppState;

// Only one Prometheus recorder may exist per process.
static METRICS: OnceLock<PrometheusHandle> = OnceLock::new();

fn metrics_handle() -> PrometheusHandle {
    METRICS
        .get_or_init(blockfortune::metrics::init_metrics)
        .clone()
}

async fn build_test_app() -> (axum::Router, sqlx::PgPool, AppConfig) {
    let pool = common::setup_test_db().await;
    let config = common::test_config();

    let price_client = blockfortune::market::PriceClient::new(
        reqwest::Client::new(),
        config.market_api_url.clone(),
    );

    let state = AppState {
        db: pool.clone(),
        config: config.clone(),
        metrics_handle: metrics_handle(),
        price_client,
    };

    let router = create_router(state);
    (router, pool, config)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_authed(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: &serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _pool, _config) = build_test_app().await;

    let resp = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = json_body(resp).await;
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_signup_and_login() {
    let (app, _pool, _config) = build_test_app().await;

    let username = common::unique("api_signup");
    let signup = serde_json::json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "hunter2hunter2",
    });

    let resp = app
        .clone()
        .oneshot(post_json("/api/auth/signup", None, &signup))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = json_body(resp).await;
    assert_eq!(json["success"], true);
    assert!(json["data"]["token"].is_string());
    assert_eq!(json["data"]["profile"]["referral_code"].as_str().unwrap().len(), 8);
    // The hash never leaves the server
    assert!(json["data"]["profile"]["password_hash"].is_null());

    let login = serde_json::json!({
        "identifier": username,
        "password": "hunter2hunter2",
    });

    let resp = app
        .clone()
        .oneshot(post_json("/api/auth/login", None, &login))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Wrong password is a uniform 401
    let bad_login = serde_json::json!({
        "identifier": username,
        "password": "wrong-password",
    });

    let resp = app
        .oneshot(post_json("/api/auth/login", None, &bad_login))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let (app, _pool, _config) = build_test_app().await;

    let username = common::unique("api_shortpw");
    let signup = serde_json::json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "short",
    });

    let resp = app
        .oneshot(post_json("/api/auth/signup", None, &signup))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_plans_catalog() {
    let (app, _pool, _config) = build_test_app().await;

    let resp = app.oneshot(get("/api/plans")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = json_body(resp).await;
    assert_eq!(json["success"], true);
    let plans = json["data"].as_array().unwrap();
    assert!(plans.iter().any(|p| p["name"] == "Starter"));
}

#[tokio::test]
async fn test_deposit_request_creates_pending_row_with_reference() {
    let (app, pool, config) = build_test_app().await;

    let profile = common::seed_profile(&pool, "api_depositor", Decimal::ZERO).await;
    let token = issue_token(&config, &profile).unwrap();

    // Starter plan accepts 100..=1000
    let plan: (Uuid,) =
        sqlx::query_as("SELECT id FROM blockfortune_investment_plans WHERE name = 'Starter'")
            .fetch_one(&pool)
            .await
            .unwrap();

    let body = serde_json::json!({
        "amount": 500,
        "crypto_type": "BTC",
        "wallet_address": "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh",
        "plan_id": plan.0,
    });

    let resp = app
        .clone()
        .oneshot(post_json("/api/deposits", Some(&token), &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = json_body(resp).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "pending");
    let reference = json["data"]["reference"].as_str().unwrap().to_string();
    assert!(reference.starts_with("DEP-"));

    // A second request gets a different reference
    let resp = app
        .oneshot(post_json("/api/deposits", Some(&token), &body))
        .await
        .unwrap();
    let json = json_body(resp).await;
    assert_ne!(json["data"]["reference"].as_str().unwrap(), reference);
}

#[tokio::test]
async fn test_deposit_amount_outside_plan_bounds() {
    let (app, pool, config) = build_test_app().await;

    let profile = common::seed_profile(&pool, "api_bounds_user", Decimal::ZERO).await;
    let token = issue_token(&config, &profile).unwrap();

    let plan: (Uuid,) =
        sqlx::query_as("SELECT id FROM blockfortune_investment_plans WHERE name = 'Starter'")
            .fetch_one(&pool)
            .await
            .unwrap();

    let body = serde_json::json!({
        "amount": 50,
        "crypto_type": "BTC",
        "wallet_address": "bc1qxy2kgdygjrsqtzq2n0yrf2493p83kkfjhx0wlh",
        "plan_id": plan.0,
    });

    let resp = app
        .oneshot(post_json("/api/deposits", Some(&token), &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_withdrawal_below_minimum_is_rejected() {
    let (app, pool, config) = build_test_app().await;

    let profile = common::seed_profile(&pool, "api_withdrawer", Decimal::from(1000)).await;
    let token = issue_token(&config, &profile).unwrap();

    let body = serde_json::json!({
        "amount": 30,
        "crypto_type": "ETH",
        "wallet_address": "0x71C7656EC7ab88b098defB751B7401B5f6d8976F",
    });

    let resp = app
        .oneshot(post_json("/api/withdrawals", Some(&token), &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json = json_body(resp).await;
    assert_eq!(json["error"], "Minimum withdrawal amount is $50");

    // No row was created and no funds were reserved
    let count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM blockfortunewithdrawals WHERE profile_id = $1")
            .bind(profile.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count.0, 0);

    let reloaded = common::reload_profile(&pool, profile.id).await;
    assert_eq!(reloaded.balance, Decimal::from(1000));
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let (app, _pool, _config) = build_test_app().await;

    let resp = app.oneshot(get("/api/deposits")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_reject_user_token() {
    let (app, pool, config) = build_test_app().await;

    let profile = common::seed_profile(&pool, "api_plain_user", Decimal::ZERO).await;
    let token = issue_token(&config, &profile).unwrap();

    let resp = app
        .oneshot(get_authed("/api/admin/deposits", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_listing_filters_by_status() {
    let (app, pool, config) = build_test_app().await;

    let admin = common::seed_admin(&pool, "api_admin").await;
    let token = issue_token(&config, &admin).unwrap();

    let resp = app
        .oneshot(get_authed("/api/admin/withdrawals?status=pending", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = json_body(resp).await;
    assert_eq!(json["success"], true);
    assert!(json["data"].is_array());
}

#[tokio::test]
async fn test_dashboard_summary() {
    let (app, pool, config) = build_test_app().await;

    let profile = common::seed_profile(&pool, "api_dash_user", Decimal::from(750)).await;
    let token = issue_token(&config, &profile).unwrap();

    let resp = app
        .oneshot(get_authed("/api/dashboard/summary", &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = json_body(resp).await;
    assert_eq!(json["balance"], "750.00");
    assert!(json["active_investments"].is_number());
    assert!(json["pending_referral_earnings"].is_string());
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _pool, _config) = build_test_app().await;

    let resp = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let _text = String::from_utf8(body.to_vec()).unwrap();
    // Endpoint returns valid text; metric names may or may not appear depending
    // on global recorder state in tests (only one recorder per process).
}
