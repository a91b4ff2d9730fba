//! Job routes backed by the document store.
//!
//! Applications are embedded in the job document instead of living in their
//! own table.

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use jobboard_common::error::AppError;
use jobboard_common::message::NotificationMessage;
use jobboard_common::types::{JobApplicationDocument, JobDocument};
use jobboard_store::applications::CreateApplicationParams;
use jobboard_store::documents::new_job_document;
use jobboard_store::jobs::CreateJobParams;

use crate::routes::enqueue_notification;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v2/jobs", post(create_job))
        .route("/v2/jobs", get(list_jobs))
        .route("/v2/jobs/{id}/apply", post(apply_to_job))
}

/// POST /v2/jobs: Create a job document.
async fn create_job(
    State(state): State<AppState>,
    Json(params): Json<CreateJobParams>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<JobDocument>), AppError> {
    let job = new_job_document(&params);
    state.documents.save(&job).await?;

    tracing::info!(job_id = %job.id, company = %job.company, "Job document created");

    let location = format!("/v2/jobs/{}", job.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(job)))
}

/// GET /v2/jobs: Scan every job document.
async fn list_jobs(State(state): State<AppState>) -> Result<Json<Vec<JobDocument>>, AppError> {
    let jobs = state.documents.scan().await?;
    Ok(Json(jobs))
}

/// POST /v2/jobs/:id/apply: Append an application to the job document.
async fn apply_to_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(params): Json<CreateApplicationParams>,
) -> Result<Json<JobApplicationDocument>, AppError> {
    let mut job = state
        .documents
        .load(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found.".to_string()))?;

    let application = JobApplicationDocument {
        candidate_name: params.candidate_name,
        candidate_email: params.candidate_email,
        cv_url: None,
    };
    job.applications.push(application.clone());
    state.documents.save(&job).await?;

    tracing::info!(
        job_id = %job.id,
        applications = job.applications.len(),
        "Application added to job document"
    );

    let message = NotificationMessage::application_received(
        &job.title,
        job.id,
        &application.candidate_name,
        &application.candidate_email,
    );
    enqueue_notification(&state, &message).await?;

    Ok(Json(application))
}
