//! Storefront order service binary.

use std::sync::Arc;

use anyhow::Result;
use storefront_orders::auth::JwtKeys;
use storefront_orders::config::Config;
use storefront_orders::effects::EffectQueue;
use storefront_orders::notify::Notifier;
use storefront_orders::routes;
use storefront_orders::state::AppState;
use storefront_orders::store::postgres::PgStore;
use storefront_orders::store::OrderStore;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn OrderStore> = Arc::new(PgStore::connect(&config.database_url).await?);

    let nats = match &config.nats_url {
        Some(url) => match async_nats::connect(url.as_str()).await {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!("NATS connection failed, notifications disabled: {e}");
                None
            }
        },
        None => None,
    };
    let notifier = Notifier::new(nats, config.mail_from.clone());
    let effects = EffectQueue::start(store.clone(), notifier, config.effect_queue_depth);

    let state = AppState {
        store,
        jwt: JwtKeys::new(&config.jwt_secret),
        effects,
    };

    let app = routes::router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("storefront-orders listening on {addr}");
    axum::serve(tokio::net::TcpListener::bind(&addr).await?, app).await?;
    Ok(())
}
