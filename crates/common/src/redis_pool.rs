use redis::Client;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};

/// Create a Redis connection manager for async operations.
pub async fn create_redis_pool(redis_url: &str) -> anyhow::Result<ConnectionManager> {
    let client = Client::open(redis_url)?;
    let manager = ConnectionManager::new(client).await?;

    tracing::info!("Connected to Redis");
    Ok(manager)
}

/// Create a dedicated Redis connection for blocking stream reads.
///
/// `XREADGROUP ... BLOCK` holds the connection for the whole wait, so the
/// consumer must not share a multiplexed connection with other callers and
/// its response timeout must outlast the block.
pub async fn create_blocking_connection(
    redis_url: &str,
    block_seconds: u64,
) -> anyhow::Result<ConnectionManager> {
    let client = Client::open(redis_url)?;
    let config = ConnectionManagerConfig::new()
        .set_response_timeout(std::time::Duration::from_secs(block_seconds + 5));
    let manager = ConnectionManager::new_with_config(client, config).await?;

    tracing::info!(block_seconds, "Opened blocking Redis connection");
    Ok(manager)
}
