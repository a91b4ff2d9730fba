use std::str::FromStr;

use serde::Deserialize;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: String,

    /// Maximum number of PostgreSQL connections in the pool (default: 20)
    pub db_max_connections: u32,

    /// Redis connection string (document store + notification stream)
    pub redis_url: String,

    /// Port the API server binds to (default: 3000)
    pub api_port: u16,

    /// Redis stream carrying application notifications
    pub queue_stream: String,

    /// Redis stream receiving notifications that could not be delivered
    pub queue_dead_letter_stream: String,

    /// Consumer group the notifier reads through
    pub queue_consumer_group: String,

    /// Consumer name within the group. Keep it stable across restarts so
    /// pending entries are picked up again.
    pub queue_consumer_name: String,

    /// Long-poll wait per receive in seconds (default: 20, must be at least 1)
    pub queue_wait_seconds: u64,

    /// Seconds a received message stays hidden before another receive may
    /// claim it again (default: 30, must be at least 1)
    pub queue_visibility_timeout_seconds: u64,

    /// Maximum messages per receive (default: 10)
    pub queue_batch_size: usize,

    /// S3 bucket for CV uploads
    pub s3_bucket: Option<String>,

    /// Lifetime of the presigned CV URL returned to clients
    pub s3_url_expiry_seconds: u64,

    /// Resend API key for email delivery
    pub resend_api_key: Option<String>,

    /// Email sender address
    pub email_from: String,

    /// Email sender display name
    pub email_from_name: String,

    /// Send attempts per message before it is dead-lettered (default: 3)
    pub email_max_attempts: u32,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", env("DB_MAX_CONNECTIONS"), 20)?,
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            api_port: parse_var("API_PORT", env("API_PORT"), 3000)?,
            queue_stream: std::env::var("QUEUE_STREAM")
                .unwrap_or_else(|_| "job-applications:created".to_string()),
            queue_dead_letter_stream: std::env::var("QUEUE_DEAD_LETTER_STREAM")
                .unwrap_or_else(|_| "job-applications:created:dead-letter".to_string()),
            queue_consumer_group: std::env::var("QUEUE_CONSUMER_GROUP")
                .unwrap_or_else(|_| "notifier".to_string()),
            queue_consumer_name: std::env::var("QUEUE_CONSUMER_NAME")
                .unwrap_or_else(|_| "notifier-1".to_string()),
            queue_wait_seconds: positive(
                "QUEUE_WAIT_SECONDS",
                parse_var("QUEUE_WAIT_SECONDS", env("QUEUE_WAIT_SECONDS"), 20)?,
            )?,
            queue_visibility_timeout_seconds: positive(
                "QUEUE_VISIBILITY_TIMEOUT_SECONDS",
                parse_var(
                    "QUEUE_VISIBILITY_TIMEOUT_SECONDS",
                    env("QUEUE_VISIBILITY_TIMEOUT_SECONDS"),
                    30,
                )?,
            )?,
            queue_batch_size: parse_var("QUEUE_BATCH_SIZE", env("QUEUE_BATCH_SIZE"), 10)?,
            s3_bucket: std::env::var("S3_BUCKET").ok(),
            s3_url_expiry_seconds: parse_var(
                "S3_URL_EXPIRY_SECONDS",
                env("S3_URL_EXPIRY_SECONDS"),
                3600,
            )?,
            resend_api_key: std::env::var("RESEND_API_KEY").ok(),
            email_from: std::env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "notifications@jobboard.dev".to_string()),
            email_from_name: std::env::var("EMAIL_FROM_NAME")
                .unwrap_or_else(|_| "Job Board".to_string()),
            email_max_attempts: parse_var("EMAIL_MAX_ATTEMPTS", env("EMAIL_MAX_ATTEMPTS"), 3)?,
        })
    }
}

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Parse an optional raw value, falling back to `default` when unset.
fn parse_var<T: FromStr>(name: &str, raw: Option<String>, default: T) -> anyhow::Result<T> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| {
            anyhow::anyhow!(
                "{} must be a valid {}",
                name,
                std::any::type_name::<T>()
            )
        }),
    }
}

/// Reject zero for settings where Redis treats zero as "forever".
fn positive(name: &str, value: u64) -> anyhow::Result<u64> {
    if value == 0 {
        anyhow::bail!("{} must be at least 1", name);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_default_when_unset() {
        let value: u64 = parse_var("QUEUE_WAIT_SECONDS", None, 20).unwrap();
        assert_eq!(value, 20);
    }

    #[test]
    fn test_parse_var_reads_value() {
        let value: u32 = parse_var("EMAIL_MAX_ATTEMPTS", Some(" 5 ".to_string()), 3).unwrap();
        assert_eq!(value, 5);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        let err = parse_var::<u16>("API_PORT", Some("eighty".to_string()), 3000).unwrap_err();
        assert!(err.to_string().contains("API_PORT must be a valid u16"));
    }

    #[test]
    fn test_positive_rejects_zero_wait() {
        let err = positive("QUEUE_WAIT_SECONDS", 0).unwrap_err();
        assert!(err.to_string().contains("QUEUE_WAIT_SECONDS must be at least 1"));
        assert_eq!(positive("QUEUE_WAIT_SECONDS", 20).unwrap(), 20);
    }
}
