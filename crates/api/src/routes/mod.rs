pub mod applications;
pub mod health;
pub mod jobs;
pub mod v2;

use axum::Router;

use jobboard_common::error::AppError;
use jobboard_common::message::NotificationMessage;

use crate::state::AppState;

/// Build the complete API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(jobs::router())
        .merge(applications::router())
        .merge(v2::router())
        .with_state(state)
}

/// Enqueue a notification for the worker.
pub(crate) async fn enqueue_notification(
    state: &AppState,
    message: &NotificationMessage,
) -> Result<(), AppError> {
    let body = message.encode()?;
    let message_id = state.queue.send(&body).await?;

    tracing::info!(
        message_id = %message_id,
        recipient = %message.recipient,
        "Notification enqueued"
    );

    Ok(())
}
