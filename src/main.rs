use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use merchantinfo::config::{Config, StoreBackend};
use merchantinfo::db::{MemorySheetStore, PgSheetStore, SheetStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env().expect("Failed to load configuration");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.log_level)
        }))
        .init();

    tracing::info!("Starting merchantinfo");

    let store: Arc<dyn SheetStore> = match &config.store {
        StoreBackend::Postgres { database_url } => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await
                .expect("Failed to connect to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("Failed to run migrations");

            tracing::info!("Migrations applied");
            Arc::new(PgSheetStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory sheet; rows are lost on restart");
            Arc::new(MemorySheetStore::new())
        }
    };

    merchantinfo::prepare_store(store.as_ref(), &config).await?;

    tracing::info!(
        write_url = config.sheet.write_url.as_deref().unwrap_or("<unset>"),
        read_url = config.sheet.read_url.as_deref().unwrap_or("<unset>"),
        "Sheet client configured"
    );

    let addr = SocketAddr::new(config.host, config.port);
    let (app, state) = merchantinfo::build_app(store, config)?;
    merchantinfo::spawn_limiter_cleanup(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
