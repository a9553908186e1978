use blockfortune::api::router::create_router;
use blockfortune::config::AppConfig;
use blockfortune::db;
use blockfortune::market::PriceClient;
use blockfortune::services::notifier::Mailer;
use blockfortune::services::{investment_monitor, outbox_dispatcher};
use blockfortune::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!("Connecting to database...");
    let db = db::init_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&db).await?;
    tracing::info!("Database connected, migrations applied");

    let metrics_handle = blockfortune::metrics::init_metrics();

    // --- Outbox dispatcher: SMTP delivery of enqueued notifications ---
    if config.notifications_enabled {
        match Mailer::from_config(&config)? {
            Some(mailer) => {
                let outbox_db = db.clone();
                let poll_secs = config.outbox_poll_secs;
                let max_attempts = config.outbox_max_attempts;
                tokio::spawn(async move {
                    outbox_dispatcher::run_outbox_dispatcher(
                        outbox_db,
                        mailer,
                        poll_secs,
                        max_attempts,
                    )
                    .await;
                });
                tracing::info!("Outbox dispatcher spawned");
            }
            None => {
                tracing::warn!(
                    "SMTP not configured — outbox emails will accumulate undelivered"
                );
            }
        }
    } else {
        tracing::info!("Notifications disabled (NOTIFICATIONS_ENABLED=false)");
    }

    // --- Investment maturation sweep ---
    let monitor_db = db.clone();
    let monitor_secs = config.investment_poll_secs;
    tokio::spawn(async move {
        investment_monitor::run_investment_monitor(monitor_db, monitor_secs).await;
    });

    let price_client = PriceClient::new(reqwest::Client::new(), config.market_api_url.clone());

    let state = AppState {
        db,
        config,
        metrics_handle,
        price_client,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
