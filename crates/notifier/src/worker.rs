//! Notification worker: poll, parse, send, acknowledge.
//!
//! One loop, one message at a time:
//! 1. Long-poll the queue for a batch (raced against shutdown)
//! 2. Decode each body into a `NotificationMessage`
//! 3. Send the email, retrying transient failures a bounded number of times
//! 4. Dead-letter anything malformed or undeliverable
//! 5. Delete the message from the main queue
//!
//! A message whose dead-letter forward fails is left unacknowledged so it
//! comes back on the next delivery.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use jobboard_common::config::AppConfig;
use jobboard_common::message::NotificationMessage;
use jobboard_common::queue::{NotificationQueue, ReceivedMessage};

use crate::email::{EmailSender, Mailbox, OutboundEmail, SendError};
use crate::shutdown::ShutdownToken;

/// Tuning knobs for [`NotificationWorker`].
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Maximum messages per receive.
    pub batch_size: usize,
    /// Long-poll wait per receive.
    pub wait: Duration,
    /// Send attempts before a message is dead-lettered.
    pub max_send_attempts: u32,
    /// Base delay between send attempts; attempt `n` waits `n * retry_delay`.
    pub retry_delay: Duration,
    /// Pause after a failed receive.
    pub error_backoff: Duration,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            batch_size: 10,
            wait: Duration::from_secs(20),
            max_send_attempts: 3,
            retry_delay: Duration::from_secs(1),
            error_backoff: Duration::from_secs(5),
        }
    }
}

impl WorkerSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            batch_size: config.queue_batch_size,
            wait: Duration::from_secs(config.queue_wait_seconds),
            max_send_attempts: config.email_max_attempts,
            ..Self::default()
        }
    }
}

/// What happened to a received message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Email delivered.
    Sent,
    /// Forwarded to the dead-letter queue.
    DeadLettered,
    /// Left on the main queue for redelivery.
    Retained,
}

/// Dead-letter queue entry.
#[derive(Debug, Serialize)]
struct DeadLetter<'a> {
    original_body: &'a str,
    reason: String,
    failed_at: DateTime<Utc>,
}

/// Drains the notification queue into the email provider.
pub struct NotificationWorker {
    queue: Arc<dyn NotificationQueue>,
    dead_letters: Arc<dyn NotificationQueue>,
    mailer: Arc<dyn EmailSender>,
    sender: Mailbox,
    settings: WorkerSettings,
}

impl NotificationWorker {
    pub fn new(
        queue: Arc<dyn NotificationQueue>,
        dead_letters: Arc<dyn NotificationQueue>,
        mailer: Arc<dyn EmailSender>,
        sender: Mailbox,
        settings: WorkerSettings,
    ) -> Self {
        Self {
            queue,
            dead_letters,
            mailer,
            sender,
            settings,
        }
    }

    /// Run until the shutdown token fires.
    ///
    /// Shutdown is checked once per iteration and interrupts the long poll;
    /// a batch already received is finished first.
    pub async fn run(&self, mut shutdown: ShutdownToken) -> anyhow::Result<()> {
        tracing::info!(
            batch_size = self.settings.batch_size,
            wait_secs = self.settings.wait.as_secs(),
            "Notification worker started"
        );

        loop {
            if shutdown.is_shutdown() {
                break;
            }

            let received = tokio::select! {
                result = self.queue.receive(self.settings.batch_size, self.settings.wait) => result,
                _ = shutdown.wait() => break,
            };

            match received {
                Ok(messages) => {
                    for message in &messages {
                        self.process_message(message).await;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to receive notifications");
                    tokio::select! {
                        _ = tokio::time::sleep(self.settings.error_backoff) => {}
                        _ = shutdown.wait() => break,
                    }
                }
            }
        }

        tracing::info!("Notification worker stopped");
        Ok(())
    }

    /// Handle one received message through to acknowledgement.
    pub async fn process_message(&self, received: &ReceivedMessage) -> Disposition {
        let Some(message) = NotificationMessage::decode(&received.body) else {
            tracing::warn!(
                receipt = %received.receipt_handle,
                "Malformed notification, dead-lettering"
            );
            return self
                .dead_letter(received, "malformed notification body".to_string())
                .await;
        };

        let email = OutboundEmail {
            from: self.sender.clone(),
            to: message.recipient,
            subject: message.subject,
            text: message.body,
        };

        match self.send_with_retry(&email).await {
            Ok(()) => {
                tracing::info!(
                    receipt = %received.receipt_handle,
                    recipient = %email.to,
                    "Notification email sent"
                );
                self.acknowledge(received).await;
                Disposition::Sent
            }
            Err(e) => {
                tracing::warn!(
                    receipt = %received.receipt_handle,
                    recipient = %email.to,
                    error = %e,
                    "Notification undeliverable, dead-lettering"
                );
                self.dead_letter(received, e.to_string()).await
            }
        }
    }

    async fn send_with_retry(&self, email: &OutboundEmail) -> Result<(), SendError> {
        let max_attempts = self.settings.max_send_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.mailer.send(email).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    tracing::debug!(attempt, max_attempts, error = %e, "Retrying email send");
                    tokio::time::sleep(self.settings.retry_delay * attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn dead_letter(&self, received: &ReceivedMessage, reason: String) -> Disposition {
        let letter = DeadLetter {
            original_body: &received.body,
            reason,
            failed_at: Utc::now(),
        };
        let body = serde_json::to_string(&letter).unwrap_or_else(|_| received.body.clone());

        if let Err(e) = self.dead_letters.send(&body).await {
            tracing::error!(
                receipt = %received.receipt_handle,
                error = %e,
                "Dead-letter forward failed, leaving message for redelivery"
            );
            return Disposition::Retained;
        }

        self.acknowledge(received).await;
        Disposition::DeadLettered
    }

    async fn acknowledge(&self, received: &ReceivedMessage) {
        if let Err(e) = self.queue.delete(&received.receipt_handle).await {
            tracing::error!(
                receipt = %received.receipt_handle,
                error = %e,
                "Failed to delete notification"
            );
        }
    }
}
