use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cinematch_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_redis_client, Cache},
    services::{
        catalog::Catalog,
        dataset::{file_source, DatasetSource},
        providers::TmdbProvider,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog = Arc::new(Catalog::new());
    let dataset = file_source(&config.dataset_path);
    let mut state = AppState::new(catalog.clone(), dataset.clone(), &config);

    let mut cache_writer = None;
    if let Some(api_key) = config.tmdb_api_key.clone() {
        let cache = match config.redis_url.as_deref() {
            Some(url) => {
                let (cache, handle) = Cache::new(create_redis_client(url)?);
                cache_writer = Some(handle);
                Some(cache)
            }
            None => None,
        };
        let provider = TmdbProvider::new(api_key, config.tmdb_api_url.clone(), cache)?;
        state = state.with_metadata(Arc::new(provider));
        tracing::info!(cached = cache_writer.is_some(), "TMDb details enrichment enabled");
    } else {
        tracing::warn!("TMDB_API_KEY not set, recommendations will not include movie details");
    }

    // A failed startup build is not fatal: queries answer 503 until a rebuild succeeds
    match dataset.load().await {
        Ok(raw) => {
            if let Err(e) = catalog.rebuild(raw, config.build_config()).await {
                tracing::error!(error = %e, "Initial build failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, path = %config.dataset_path, "Failed to load dataset");
        }
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}
