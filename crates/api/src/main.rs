use anyhow::Context;

use catalog_api::{app, config::Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    catalog_observability::init();

    let settings = Settings::from_env().context("invalid configuration")?;
    tracing::info!(
        env = %settings.env,
        persistent = settings.use_persistent_stores,
        sql_echo = settings.sql_echo,
        "starting catalog api"
    );

    let store = app::services::build_store(&settings).await?;
    let router = app::router(store.clone());

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
