//! Notification queue: Redis Streams with a consumer group.
//!
//! The stream behaves like a visibility-window queue:
//! - `send` appends an entry (`XADD`) with a single `body` field
//! - `receive` first reclaims entries that sat unacknowledged in the group's
//!   pending list for longer than the visibility timeout (`XAUTOCLAIM`), then
//!   reads new entries (`XREADGROUP ... >`), which parks them in the pending list
//! - `delete` acknowledges and removes the entry (`XACK` + `XDEL`)
//!
//! An entry that is never deleted (crashed consumer, failed dead-letter
//! forward, failed delete) comes back once it has been idle for the timeout,
//! to this consumer or any other in the group.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use redis::streams::{
    StreamAutoClaimOptions, StreamAutoClaimReply, StreamId, StreamReadOptions, StreamReadReply,
};

use crate::error::AppError;

/// Stream entry field holding the message body.
const BODY_FIELD: &str = "body";

/// `XAUTOCLAIM` start id for a fresh pass over the pending list.
const CLAIM_START: &str = "0-0";

/// How long a received entry stays invisible before it may be reclaimed.
pub const DEFAULT_VISIBILITY_TIMEOUT: Duration = Duration::from_secs(30);

/// A message handed out by [`NotificationQueue::receive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    /// Opaque handle used to delete the message once processed.
    pub receipt_handle: String,
    pub body: String,
}

/// Queue seam shared by the API (producer) and the notifier (consumer).
#[async_trait]
pub trait NotificationQueue: Send + Sync {
    /// Enqueue a message body. Returns the provider's message id.
    async fn send(&self, body: &str) -> Result<String, AppError>;

    /// Receive up to `max_messages`, waiting up to `wait` when the queue is empty.
    /// A zero `wait` returns immediately.
    async fn receive(
        &self,
        max_messages: usize,
        wait: Duration,
    ) -> Result<Vec<ReceivedMessage>, AppError>;

    /// Remove a received message from the queue.
    async fn delete(&self, receipt_handle: &str) -> Result<(), AppError>;
}

/// Redis Streams implementation of [`NotificationQueue`].
pub struct RedisStreamQueue {
    redis: ConnectionManager,
    stream: String,
    group: String,
    consumer: String,
    visibility_timeout: Duration,
    /// Where the next `XAUTOCLAIM` pass over the pending list resumes.
    claim_cursor: Mutex<String>,
}

impl RedisStreamQueue {
    pub fn new(
        redis: ConnectionManager,
        stream: impl Into<String>,
        group: impl Into<String>,
        consumer: impl Into<String>,
    ) -> Self {
        Self {
            redis,
            stream: stream.into(),
            group: group.into(),
            consumer: consumer.into(),
            visibility_timeout: DEFAULT_VISIBILITY_TIMEOUT,
            claim_cursor: Mutex::new(CLAIM_START.to_string()),
        }
    }

    /// Idle time after which an unacknowledged entry is handed out again.
    pub fn with_visibility_timeout(mut self, visibility_timeout: Duration) -> Self {
        self.visibility_timeout = visibility_timeout;
        self
    }

    pub fn stream(&self) -> &str {
        &self.stream
    }

    /// Create the consumer group (and the stream) if they do not exist yet.
    ///
    /// The group starts at `0` so entries enqueued before the first consumer
    /// came up are still delivered.
    pub async fn ensure_group(&self) -> Result<(), AppError> {
        let mut conn = self.redis.clone();
        let result: redis::RedisResult<()> = conn
            .xgroup_create_mkstream(&self.stream, &self.group, "0")
            .await;

        match result {
            Ok(()) => {
                tracing::info!(stream = %self.stream, group = %self.group, "Consumer group created");
                Ok(())
            }
            Err(e) if e.code() == Some("BUSYGROUP") => Ok(()),
            Err(e) => Err(AppError::Redis(e)),
        }
    }

    /// `XREADGROUP` from `start_id`. Without `block` the read returns at once;
    /// `BLOCK 0` would wait forever, so a zero wait never reaches Redis.
    async fn read_group(
        &self,
        start_id: &str,
        max_messages: usize,
        block: Option<Duration>,
    ) -> Result<Vec<ReceivedMessage>, AppError> {
        let mut conn = self.redis.clone();

        let mut opts = StreamReadOptions::default()
            .group(&self.group, &self.consumer)
            .count(max_messages);
        if let Some(block) = block.filter(|b| !b.is_zero()) {
            opts = opts.block(block.as_millis() as usize);
        }

        let reply: Option<StreamReadReply> = conn
            .xread_options(&[&self.stream], &[start_id], &opts)
            .await?;

        let entries = reply
            .map(|r| r.keys)
            .unwrap_or_default()
            .into_iter()
            .flat_map(|key| key.ids)
            .collect();

        self.collect_messages(entries).await
    }

    /// Claim pending entries idle for longer than the visibility timeout.
    ///
    /// Each call scans one page of the pending list and remembers where it
    /// stopped; Redis hands back `0-0` once the whole list has been covered.
    async fn reclaim_idle(&self, max_messages: usize) -> Result<Vec<ReceivedMessage>, AppError> {
        let start = self
            .claim_cursor
            .lock()
            .map(|c| c.clone())
            .unwrap_or_else(|_| CLAIM_START.to_string());

        let mut conn = self.redis.clone();
        let opts = StreamAutoClaimOptions::default().count(max_messages);
        let reply: StreamAutoClaimReply = conn
            .xautoclaim_options(
                &self.stream,
                &self.group,
                &self.consumer,
                self.visibility_timeout.as_millis() as u64,
                &start,
                opts,
            )
            .await?;

        if let Ok(mut cursor) = self.claim_cursor.lock() {
            *cursor = reply.next_stream_id;
        }
        if !reply.deleted_ids.is_empty() {
            tracing::warn!(
                count = reply.deleted_ids.len(),
                "Dropped pending entries that no longer exist in the stream"
            );
        }

        self.collect_messages(reply.claimed).await
    }

    async fn collect_messages(
        &self,
        entries: Vec<StreamId>,
    ) -> Result<Vec<ReceivedMessage>, AppError> {
        let mut messages = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry.get::<String>(BODY_FIELD) {
                Some(body) => messages.push(ReceivedMessage {
                    receipt_handle: entry.id,
                    body,
                }),
                None => {
                    // Nothing to deliver.
                    tracing::warn!(id = %entry.id, "Stream entry without body, acknowledging");
                    self.delete(&entry.id).await?;
                }
            }
        }

        Ok(messages)
    }
}

#[async_trait]
impl NotificationQueue for RedisStreamQueue {
    async fn send(&self, body: &str) -> Result<String, AppError> {
        let mut conn = self.redis.clone();
        let id: String = conn
            .xadd(&self.stream, "*", &[(BODY_FIELD, body)])
            .await
            .map_err(|e| AppError::Queue(format!("XADD to {} failed: {}", self.stream, e)))?;

        tracing::debug!(stream = %self.stream, id = %id, "Message enqueued");
        Ok(id)
    }

    async fn receive(
        &self,
        max_messages: usize,
        wait: Duration,
    ) -> Result<Vec<ReceivedMessage>, AppError> {
        let reclaimed = self.reclaim_idle(max_messages).await?;
        if !reclaimed.is_empty() {
            tracing::info!(count = reclaimed.len(), "Redelivering unacknowledged messages");
            return Ok(reclaimed);
        }

        self.read_group(">", max_messages, Some(wait)).await
    }

    async fn delete(&self, receipt_handle: &str) -> Result<(), AppError> {
        let mut conn = self.redis.clone();
        let _: () = redis::pipe()
            .atomic()
            .xack(&self.stream, &self.group, &[receipt_handle])
            .xdel(&self.stream, &[receipt_handle])
            .query_async(&mut conn)
            .await?;

        Ok(())
    }
}
