use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;

use joyas_api::config::ApiConfig;
use joyas_infra::PostgresPool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    joyas_observability::init();

    let config = ApiConfig::from_env()?;

    let pool = PostgresPool::connect(
        &config.database_url,
        config.db_max_connections,
        config.db_acquire_timeout,
    )
    .await
    .context("failed to connect to Postgres")?;

    let app = joyas_api::app::build_app(Arc::new(pool));

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
