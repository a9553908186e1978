use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    // Public routes — no bearer token required
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render))
        .route("/api/auth/signup", post(handlers::auth::signup))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/plans", get(handlers::plans::list))
        .route("/api/market/prices", get(handlers::market::prices));

    // User routes — handlers take a Principal extractor
    let user = Router::new()
        .route("/api/profile", get(handlers::profile::me))
        .route("/api/dashboard/summary", get(handlers::dashboard::summary))
        .route("/api/deposits", get(handlers::deposits::list).post(handlers::deposits::create))
        .route("/api/withdrawals", get(handlers::withdrawals::list).post(handlers::withdrawals::create))
        .route("/api/investments", get(handlers::investments::list).post(handlers::investments::create))
        .route("/api/referrals", get(handlers::referrals::list))
        .route("/api/referrals/withdraw", post(handlers::referrals::withdraw));

    // Back-office routes — handlers take an Admin extractor
    let admin = Router::new()
        .route("/api/admin/deposits", get(handlers::deposits::admin_list))
        .route("/api/admin/deposits/:id/approve", post(handlers::deposits::approve))
        .route("/api/admin/deposits/:id/reject", post(handlers::deposits::reject))
        .route("/api/admin/withdrawals", get(handlers::withdrawals::admin_list))
        .route("/api/admin/withdrawals/:id/approve", post(handlers::withdrawals::approve))
        .route("/api/admin/withdrawals/:id/reject", post(handlers::withdrawals::reject));

    // CORS: the dashboard frontend is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(user)
        .merge(admin)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
