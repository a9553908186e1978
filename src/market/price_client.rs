use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PriceClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// Read-only client for a public market data API (CoinGecko-compatible).
/// Display only — prices never enter the ledger.
#[derive(Debug, Clone)]
pub struct PriceClient {
    http: Client,
    base_url: String,
}

impl PriceClient {
    pub fn new(http: Client, base_url: String) -> Self {
        Self { http, base_url }
    }

    /// Fetch USD spot prices for a set of asset identifiers
    /// (e.g. "bitcoin,ethereum"). Returns the provider's JSON as-is.
    pub async fn get_usd_prices(&self, ids: &str) -> Result<Value, PriceClientError> {
        let url = format!("{}/simple/price", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("ids", ids), ("vs_currencies", "usd")])
            .send()
            .await?
            .error_for_status()?;

        let prices: Value = resp.json().await?;
        if !prices.is_object() {
            return Err(PriceClientError::Unexpected(
                "price payload is not an object".into(),
            ));
        }

        Ok(prices)
    }
}
