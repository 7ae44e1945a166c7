use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use polyglot_router::config::Config;
use polyglot_router::content::{ContentStore, TranslationGraph};
use polyglot_router::locales::{GeoClient, LocaleRegistry};
use polyglot_router::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("polyglot_router=info".parse()?),
        )
        .init();

    info!("Starting locale router");

    // Load configuration from environment
    let config = Config::from_env()?;

    // A broken locale table must stop the process before any routing.
    LocaleRegistry::get()
        .validate()
        .context("Invalid locale catalog")?;

    // Build the read-only corpus and its translation graph once.
    let store = ContentStore::load_dir(Path::new(&config.content_dir))
        .context("Failed to load content")?;
    let graph = TranslationGraph::build(store.posts());
    info!(
        "Translation graph ready: {} posts in {} identities",
        store.posts().len(),
        graph.groups().len()
    );

    let geo = GeoClient::new(
        config.geo_primary_url.clone(),
        config.geo_fallback_url.clone(),
        config.geo_timeout(),
    );

    let addr = format!("0.0.0.0:{}", config.port);
    let state = Arc::new(AppState {
        config,
        store,
        graph,
        geo,
    });

    let app = server::app(state);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
