mod binding;
mod config;
mod db;
mod errors;
mod handlers;
mod middleware;
mod models;
mod openapi;
mod repository;
mod routes;
mod state;

use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::connect;
use crate::handlers::echo::EchoHandler;
use crate::repository::mongo::MongoUserRepository;
use crate::routes::{build_router, ServerOptions};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; the config file must exist
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting AgentCo API v{}", env!("CARGO_PKG_VERSION"));

    let document = openapi::document().map_err(|e| anyhow::anyhow!("{e}"))?;
    info!(
        "Serving {} {} ({} operations)",
        document.info.title,
        document.info.version,
        document.operations().count()
    );

    // Initialize MongoDB
    let client = connect(&config.dsn).await?;
    let users = Arc::new(MongoUserRepository::new(client, config.database.clone()));

    // Build router
    let handler = Arc::new(EchoHandler::new(users));
    let app = build_router(handler, ServerOptions::default())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.listen_addr()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
