//! JSON HTTP API for the Guia Saúde facility directory.

mod data;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use reqwest::Client;

use guiasaude_core::{
    cache::SnapshotCache, config::DirectoryConfig, fallback::fallback_records,
    service::DirectoryService,
};
use guiasaude_provider_quixada::{QuixadaSource, USER_AGENT};

const DEFAULT_PORT: u16 = 8000;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = DirectoryConfig::from_env();

    // HTTP + service setup
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.request_timeout)
        .build()?;

    let source = Arc::new(QuixadaSource::new(client, &config));
    let fallback = fallback_records(&config.base_url);
    let cache = Arc::new(SnapshotCache::new(source, fallback, &config));
    let service = Arc::new(DirectoryService::new(cache));

    let port = std::env::var("GUIASAUDE_PORT")
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let app = routes::router(service);
    tracing::info!("Guia Saúde API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
