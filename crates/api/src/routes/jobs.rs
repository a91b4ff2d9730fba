//! Job routes backed by the relational store.

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use jobboard_common::error::AppError;
use jobboard_common::message::NotificationMessage;
use jobboard_common::types::{Job, JobApplication};
use jobboard_store::applications::{ApplicationService, CreateApplicationParams};
use jobboard_store::jobs::{CreateJobParams, JobService};

use crate::routes::enqueue_notification;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/jobs", post(create_job))
        .route("/jobs", get(list_jobs))
        .route("/jobs/{id}/apply", post(apply_to_job))
}

/// POST /jobs: Post a new job.
async fn create_job(
    State(state): State<AppState>,
    Json(params): Json<CreateJobParams>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Job>), AppError> {
    let job = JobService::create(&state.pool, &params).await?;
    let location = format!("/jobs/{}", job.id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(job)))
}

/// GET /jobs: List every job.
async fn list_jobs(State(state): State<AppState>) -> Result<Json<Vec<Job>>, AppError> {
    let jobs = JobService::list(&state.pool).await?;
    Ok(Json(jobs))
}

/// POST /jobs/:id/apply: Apply to a job and notify the candidate.
///
/// Nothing is written or enqueued when the job does not exist.
async fn apply_to_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(params): Json<CreateApplicationParams>,
) -> Result<Json<JobApplication>, AppError> {
    let job = JobService::get(&state.pool, job_id).await?;

    let application = ApplicationService::create(&state.pool, job.id, &params).await?;

    let message = NotificationMessage::application_received(
        &job.title,
        job.id,
        &application.candidate_name,
        &application.candidate_email,
    );
    enqueue_notification(&state, &message).await?;

    Ok(Json(application))
}
