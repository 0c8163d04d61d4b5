//! Assistly API server

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use assistly_api::{
    auth::{spawn_session_reaper, AuthService},
    create_router, AppState, Config,
};
use assistly_shared::{create_pool_with, run_migrations, MemoryStore, PgStore, SessionStore, UserStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;

    let (users, sessions): (Arc<dyn UserStore>, Arc<dyn SessionStore>) =
        match &config.database_url {
            Some(url) => {
                let pool = create_pool_with(url, config.database_max_connections)
                    .await
                    .context("Failed to connect to database")?;
                run_migrations(&pool)
                    .await
                    .context("Failed to run migrations")?;
                tracing::info!("Using PostgreSQL store");

                let store = Arc::new(PgStore::new(pool));
                (store.clone() as Arc<dyn UserStore>, store as Arc<dyn SessionStore>)
            }
            None => {
                tracing::warn!(
                    "DATABASE_URL not set; using in-memory store, all data is lost on restart"
                );
                let store = Arc::new(MemoryStore::new());
                (store.clone() as Arc<dyn UserStore>, store as Arc<dyn SessionStore>)
            }
        };

    let auth = Arc::new(
        AuthService::new(users, sessions, config.auth_config())
            .context("Failed to initialise auth service")?,
    );

    if config.session_reap_interval_secs > 0 {
        spawn_session_reaper(
            auth.clone(),
            Duration::from_secs(config.session_reap_interval_secs),
        );
    }

    let bind_address = config.bind_address.clone();
    let app = create_router(AppState::new(config, auth));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!(address = %bind_address, "Assistly API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Assistly API stopped");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("assistly_api=info,tower_http=info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
