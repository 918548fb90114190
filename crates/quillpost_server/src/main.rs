use anyhow::Context;
use log::info;
use quillpost_core::init_logging;
use quillpost_server::{app, AppState, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::load().context("failed to load settings")?;

    init_logging(&settings.log_level, settings.log_dir.as_deref()).map_err(anyhow::Error::msg)?;

    let state = AppState::open(&settings.database_path, settings.pool_size)
        .with_context(|| format!("failed to open store at {}", settings.database_path))?;
    let listener = TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    info!(
        "event=server_listen module=server status=ok addr={} database={}",
        settings.bind_addr, settings.database_path
    );

    axum::serve(listener, app(state, settings.secure_cookies))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        log::warn!("event=server_stop module=server status=signal_unavailable");
        std::future::pending::<()>().await;
    }
}
