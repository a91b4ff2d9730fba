use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::AppConfig;

/// Open the job board database and bring the `jobs`/`job_applications`
/// schema up to date before any handler runs.
pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await?;
    tracing::info!(max_connections = config.db_max_connections, "Connected to PostgreSQL");

    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Job board schema migrated");

    Ok(pool)
}
