//! Inhibryx Web Server
//!
//! Run with: cargo run -p inhibryx-web

use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use inhibryx_common::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Inhibryx Web Server...");

    let config = AppConfig::load("inhibryx.toml")?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = inhibryx_web::state::AppState::new(config)?;
    info!(
        targets = state.pipeline.registry().target_count(),
        "Model catalog ready"
    );

    let app = inhibryx_web::router::build_router(state);

    info!("Server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
