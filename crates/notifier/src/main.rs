use std::sync::Arc;
use std::time::Duration;

use jobboard_common::config::AppConfig;
use jobboard_common::queue::RedisStreamQueue;
use jobboard_common::redis_pool::{create_blocking_connection, create_redis_pool};
use jobboard_notifier::email::{Mailbox, ResendClient};
use jobboard_notifier::shutdown::shutdown_channel;
use jobboard_notifier::worker::{NotificationWorker, WorkerSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jobboard_notifier=info,jobboard_common=info".into()),
        )
        .json()
        .init();

    tracing::info!("Job board notifier starting...");

    // Load configuration
    let config = AppConfig::from_env()?;
    let api_key = config
        .resend_api_key
        .clone()
        .ok_or_else(|| anyhow::anyhow!("RESEND_API_KEY environment variable is required"))?;

    // The consumer blocks on its own connection; dead letters go over a shared one.
    let consumer_conn =
        create_blocking_connection(&config.redis_url, config.queue_wait_seconds).await?;
    let producer_conn = create_redis_pool(&config.redis_url).await?;

    let queue = RedisStreamQueue::new(
        consumer_conn,
        config.queue_stream.clone(),
        config.queue_consumer_group.clone(),
        config.queue_consumer_name.clone(),
    )
    .with_visibility_timeout(Duration::from_secs(
        config.queue_visibility_timeout_seconds,
    ));
    queue.ensure_group().await?;

    let dead_letters = RedisStreamQueue::new(
        producer_conn,
        config.queue_dead_letter_stream.clone(),
        config.queue_consumer_group.clone(),
        config.queue_consumer_name.clone(),
    );

    let mailer = ResendClient::new(api_key)?;
    let sender = Mailbox::new(config.email_from_name.clone(), config.email_from.clone());

    tracing::info!(
        stream = %queue.stream(),
        dead_letter_stream = %dead_letters.stream(),
        from = %sender,
        "Notifier configured"
    );

    let worker = NotificationWorker::new(
        Arc::new(queue),
        Arc::new(dead_letters),
        Arc::new(mailer),
        sender,
        WorkerSettings::from_config(&config),
    );

    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let handle = tokio::spawn(async move { worker.run(shutdown_rx).await });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Received shutdown signal, stopping gracefully...");
    shutdown_tx.shutdown();

    handle.await??;

    tracing::info!("Job board notifier stopped.");
    Ok(())
}
