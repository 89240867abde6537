//! `nippo-web` entry point: config, logging, storage, then serve.

use clap::Parser;
use log::info;
use nippo_core::db::open_db;
use nippo_core::init_logging;
use nippo_web::{app_router, AppState, Config};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    let config = Config::parse();

    init_logging(config.log_level(), config.log_target()?)?;

    let conn = open_db(&config.db_path)?;
    let app = app_router(AppState::new(conn));

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "event=http_listen module=web status=ok addr={addr} db_path={}",
        config.db_path.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=http_shutdown module=web status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        log::warn!("event=http_shutdown module=web status=error reason=signal_handler_unavailable");
    }
}
