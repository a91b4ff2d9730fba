//! Application service: relational persistence for job applications.

use sqlx::PgPool;
use uuid::Uuid;

use jobboard_common::error::AppError;
use jobboard_common::types::JobApplication;

/// Service layer for job applications.
pub struct ApplicationService;

/// Parameters for applying to a job.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct CreateApplicationParams {
    pub candidate_name: String,
    pub candidate_email: String,
}

impl ApplicationService {
    /// Persist an application linked to `job_id`.
    ///
    /// Callers look the job up first; the foreign key still rejects a job
    /// deleted in between.
    pub async fn create(
        pool: &PgPool,
        job_id: Uuid,
        params: &CreateApplicationParams,
    ) -> Result<JobApplication, AppError> {
        let id = Uuid::new_v4();

        let application: JobApplication = sqlx::query_as(
            r#"
            INSERT INTO job_applications (id, job_id, candidate_name, candidate_email)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(job_id)
        .bind(&params.candidate_name)
        .bind(&params.candidate_email)
        .fetch_one(pool)
        .await?;

        tracing::info!(
            application_id = %application.id,
            job_id = %job_id,
            "Application created"
        );

        Ok(application)
    }

    /// Get a single application by ID.
    pub async fn get(pool: &PgPool, application_id: Uuid) -> Result<JobApplication, AppError> {
        sqlx::query_as("SELECT * FROM job_applications WHERE id = $1")
            .bind(application_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Job application {} not found", application_id))
            })
    }

    /// Record where the candidate's CV was stored.
    pub async fn set_cv_location(
        pool: &PgPool,
        application_id: Uuid,
        object_key: &str,
    ) -> Result<JobApplication, AppError> {
        let application: JobApplication = sqlx::query_as(
            "UPDATE job_applications SET cv_url = $1 WHERE id = $2 RETURNING *",
        )
        .bind(object_key)
        .bind(application_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Job application {} not found", application_id))
        })?;

        tracing::info!(
            application_id = %application_id,
            key = %object_key,
            "CV location recorded"
        );

        Ok(application)
    }
}
