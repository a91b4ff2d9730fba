use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A posted position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub min_salary: f64,
    pub max_salary: f64,
    pub company: String,
    pub created_at: DateTime<Utc>,
}

/// A candidate's submission against a job, stored relationally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobApplication {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    /// Object-storage key of the uploaded CV, set once by the upload handler.
    pub cv_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A job record in the document store, with its applications embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDocument {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub min_salary: f64,
    pub max_salary: f64,
    pub company: String,
    #[serde(default)]
    pub applications: Vec<JobApplicationDocument>,
}

/// An application embedded in a [`JobDocument`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobApplicationDocument {
    pub candidate_name: String,
    pub candidate_email: String,
    #[serde(default)]
    pub cv_url: Option<String>,
}
