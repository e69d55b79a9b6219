use anyhow::Context;
use api::{app, config::ApiConfig, state::AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = ApiConfig::from_env().context("reading TIMETABLE__ configuration")?;
    let addr = config.listen_addr();
    tracing::info!(
        %addr,
        allocator = ?config.solver.allocator,
        seed = config.solver.seed,
        timeout_secs = config.solver.timeout_secs,
        "listening"
    );

    let listener = tokio::net::TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app(AppState::new(config)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "ctrl-c handler failed");
    }
    tracing::info!("shutting down");
}
