use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::AppState;

const DEFAULT_ASSETS: &str = "bitcoin,ethereum,tether,usd-coin,litecoin";

#[derive(Deserialize)]
pub struct PriceQuery {
    pub ids: Option<String>,
}

/// GET /api/market/prices — USD spot prices for the dashboard ticker.
/// Display only; never consulted by the ledger.
pub async fn prices(
    State(state): State<AppState>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<Value>, AppError> {
    let ids = query.ids.unwrap_or_else(|| DEFAULT_ASSETS.into());

    let prices = state
        .price_client
        .get_usd_prices(&ids)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(prices))
}
