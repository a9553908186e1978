use rust_decimal::Decimal;
use std::env;

const DEFAULT_MARKET_API_URL: &str = "https://api.coingecko.com/api/v3";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    // Session tokens
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,

    // SMTP (optional — outbox dispatcher is disabled without it)
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub mail_from: String,
    pub admin_email: String,
    pub notifications_enabled: bool,
    pub outbox_poll_secs: u64,
    pub outbox_max_attempts: i32,

    // Ledger
    pub min_withdrawal: Decimal,
    pub withdrawal_fee_pct: Decimal,
    pub investment_poll_secs: u64,

    // Market data (display only)
    pub market_api_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            jwt_ttl_hours: env::var("JWT_TTL_HOURS")
                .unwrap_or_else(|_| "24".into())
                .parse()
                .unwrap_or(24),

            smtp_host: env::var("SMTP_HOST").ok(),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".into())
                .parse()
                .unwrap_or(587),
            smtp_username: env::var("SMTP_USERNAME").ok(),
            smtp_password: env::var("SMTP_PASSWORD").ok(),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "BlockFortune <no-reply@blockfortune.io>".into()),
            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@blockfortune.io".into()),
            notifications_enabled: env::var("NOTIFICATIONS_ENABLED")
                .unwrap_or_else(|_| "true".into())
                .parse()
                .unwrap_or(true),
            outbox_poll_secs: env::var("OUTBOX_POLL_SECS")
                .unwrap_or_else(|_| "15".into())
                .parse()
                .unwrap_or(15),
            outbox_max_attempts: env::var("OUTBOX_MAX_ATTEMPTS")
                .unwrap_or_else(|_| "5".into())
                .parse()
                .unwrap_or(5),

            min_withdrawal: env::var("MIN_WITHDRAWAL")
                .unwrap_or_else(|_| "50".into())
                .parse()
                .unwrap_or(Decimal::from(50)),
            withdrawal_fee_pct: env::var("WITHDRAWAL_FEE_PCT")
                .unwrap_or_else(|_| "0".into())
                .parse()
                .unwrap_or(Decimal::ZERO),
            investment_poll_secs: env::var("INVESTMENT_POLL_SECS")
                .unwrap_or_else(|_| "300".into())
                .parse()
                .unwrap_or(300),

            market_api_url: env::var("MARKET_API_URL")
                .unwrap_or_else(|_| DEFAULT_MARKET_API_URL.into()),
        })
    }

    /// Returns true if all SMTP settings required for delivery are configured.
    pub fn has_smtp(&self) -> bool {
        self.smtp_host.is_some() && self.smtp_username.is_some() && self.smtp_password.is_some()
    }
}
