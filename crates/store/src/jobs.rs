//! Job service: relational persistence for job postings.

use sqlx::PgPool;
use uuid::Uuid;

use jobboard_common::error::AppError;
use jobboard_common::types::Job;

/// Service layer for job postings.
pub struct JobService;

/// Parameters for posting a new job.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct CreateJobParams {
    pub title: String,
    pub description: String,
    pub min_salary: f64,
    pub max_salary: f64,
    pub company: String,
}

impl JobService {
    /// Persist a new job and return the stored record.
    pub async fn create(pool: &PgPool, params: &CreateJobParams) -> Result<Job, AppError> {
        let id = Uuid::new_v4();

        let job: Job = sqlx::query_as(
            r#"
            INSERT INTO jobs (id, title, description, min_salary, max_salary, company)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&params.title)
        .bind(&params.description)
        .bind(params.min_salary)
        .bind(params.max_salary)
        .bind(&params.company)
        .fetch_one(pool)
        .await?;

        tracing::info!(job_id = %job.id, company = %job.company, "Job created");

        Ok(job)
    }

    /// List every job, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Job>, AppError> {
        let jobs: Vec<Job> = sqlx::query_as("SELECT * FROM jobs ORDER BY created_at ASC")
            .fetch_all(pool)
            .await?;

        Ok(jobs)
    }

    /// Get a single job by ID.
    pub async fn get(pool: &PgPool, job_id: Uuid) -> Result<Job, AppError> {
        sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Job not found.".to_string()))
    }
}
