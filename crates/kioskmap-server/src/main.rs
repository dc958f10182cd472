mod api;
mod middleware;
mod scheduler;

use std::{sync::Arc, time::Duration};

use kioskmap_db::PgMachineStore;
use kioskmap_geocode::Geocoder;
use kioskmap_import::{ImportPipeline, OpenDataClient, RecordTransformer};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(kioskmap_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = kioskmap_db::PoolConfig::from_app_config(&config);
    let pool = kioskmap_db::connect_pool(&config.database_url, pool_config).await?;
    kioskmap_db::run_migrations(&pool).await?;

    let store = PgMachineStore::new(pool);
    let transformer = RecordTransformer::new(Geocoder::from_app_config(&config)?);
    let source = OpenDataClient::from_app_config(&config)?;
    let pipeline = Arc::new(
        ImportPipeline::new(source, transformer, store).with_concurrency(config.import_concurrency),
    );

    let _scheduler = scheduler::build_scheduler(Arc::clone(&pipeline), Arc::clone(&config)).await?;

    let state = AppState::new(
        pipeline,
        config.import_page_size,
        Duration::from_secs(config.import_deadline_secs),
    );
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "kioskmap-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
