//! Job application routes: CV upload.

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::Serialize;
use uuid::Uuid;

use jobboard_common::error::AppError;
use jobboard_store::applications::ApplicationService;
use jobboard_store::storage::{DEFAULT_CV_NAME, cv_object_key};

use crate::state::AppState;

/// Largest accepted CV upload.
const MAX_CV_BYTES: usize = 10 * 1024 * 1024;

/// Multipart field carrying the file.
const FILE_FIELD: &str = "file";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/job-applications/{id}/upload-cv", post(upload_cv))
        .layer(DefaultBodyLimit::max(MAX_CV_BYTES))
}

/// Response for a stored CV.
#[derive(Debug, Serialize)]
pub struct UploadCvResponse {
    pub file_url: String,
}

/// A file pulled out of a multipart body.
struct UploadedFile {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// POST /job-applications/:id/upload-cv: Store a CV and link it to the application.
///
/// An empty or missing file is rejected before any store is touched.
async fn upload_cv(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<UploadCvResponse>, AppError> {
    let file = read_file_field(multipart)
        .await?
        .filter(|f| !f.bytes.is_empty())
        .ok_or_else(|| AppError::Validation("Invalid file.".to_string()))?;

    let application = ApplicationService::get(&state.pool, application_id).await?;

    let key = cv_object_key(application.id, &file.file_name);
    let stored = state
        .storage
        .put(&key, file.bytes, file.content_type.as_deref())
        .await?;

    ApplicationService::set_cv_location(&state.pool, application.id, &stored.key).await?;

    Ok(Json(UploadCvResponse {
        file_url: stored.url,
    }))
}

/// Pull the `file` field out of the multipart body, if present.
async fn read_file_field(mut multipart: Multipart) -> Result<Option<UploadedFile>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or(DEFAULT_CV_NAME).to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid file upload: {}", e)))?;

        return Ok(Some(UploadedFile {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        }));
    }

    Ok(None)
}
