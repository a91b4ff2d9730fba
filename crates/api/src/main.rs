//! Job board API server binary entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use jobboard_common::config::AppConfig;
use jobboard_common::db;
use jobboard_common::queue::RedisStreamQueue;
use jobboard_common::redis_pool::create_redis_pool;
use jobboard_store::documents::RedisJobDocumentStore;
use jobboard_store::storage::S3ObjectStorage;

use jobboard_api::routes::create_router;
use jobboard_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("jobboard_api=debug,jobboard_store=debug,jobboard_common=info,tower_http=debug")
        }))
        .init();

    tracing::info!("Starting job board API server...");

    // Load configuration
    let config = AppConfig::from_env()?;
    let bucket = config
        .s3_bucket
        .clone()
        .ok_or_else(|| anyhow::anyhow!("S3_BUCKET environment variable is required"))?;

    // Relational store for the /jobs surface
    let pool = db::connect(&config).await?;

    // Create Redis connection (documents + notification producer)
    let redis = create_redis_pool(&config.redis_url).await?;

    let queue = RedisStreamQueue::new(
        redis.clone(),
        config.queue_stream.clone(),
        config.queue_consumer_group.clone(),
        config.queue_consumer_name.clone(),
    );
    let documents = RedisJobDocumentStore::new(redis);
    let storage =
        S3ObjectStorage::from_env(bucket, Duration::from_secs(config.s3_url_expiry_seconds)).await;

    let port = config.api_port;

    // Build application state
    let state = AppState::new(
        pool,
        Arc::new(queue),
        Arc::new(storage),
        Arc::new(documents),
        config,
    );

    // Build router
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Received shutdown signal, stopping gracefully...");
        })
        .await?;

    Ok(())
}
