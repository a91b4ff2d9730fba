//! Document store for the v2 job surface.
//!
//! Each job is one JSON document with its applications embedded as a list.
//! Documents live in a single Redis hash (`jobs:v2` unless overridden), keyed
//! by job id, so a save replaces the whole record atomically.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use uuid::Uuid;

use jobboard_common::error::AppError;
use jobboard_common::types::JobDocument;

use crate::jobs::CreateJobParams;

/// Default Redis hash holding every job document.
pub const DOCUMENTS_KEY: &str = "jobs:v2";

/// Persistence seam for [`JobDocument`]s.
#[async_trait]
pub trait JobDocumentStore: Send + Sync {
    /// Insert or replace a document.
    async fn save(&self, job: &JobDocument) -> Result<(), AppError>;

    /// Load a document by id.
    async fn load(&self, id: Uuid) -> Result<Option<JobDocument>, AppError>;

    /// Return every stored document.
    async fn scan(&self) -> Result<Vec<JobDocument>, AppError>;
}

/// Build a fresh document with a new id and no applications.
pub fn new_job_document(params: &CreateJobParams) -> JobDocument {
    JobDocument {
        id: Uuid::new_v4(),
        title: params.title.clone(),
        description: params.description.clone(),
        min_salary: params.min_salary,
        max_salary: params.max_salary,
        company: params.company.clone(),
        applications: Vec::new(),
    }
}

/// Redis-backed [`JobDocumentStore`].
#[derive(Clone)]
pub struct RedisJobDocumentStore {
    redis: ConnectionManager,
    key: String,
}

impl RedisJobDocumentStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self::with_key(redis, DOCUMENTS_KEY)
    }

    pub fn with_key(redis: ConnectionManager, key: impl Into<String>) -> Self {
        Self {
            redis,
            key: key.into(),
        }
    }
}

#[async_trait]
impl JobDocumentStore for RedisJobDocumentStore {
    async fn save(&self, job: &JobDocument) -> Result<(), AppError> {
        let json = serde_json::to_string(job)?;
        let mut conn = self.redis.clone();
        conn.hset::<_, _, _, ()>(&self.key, job.id.to_string(), json)
            .await?;

        tracing::debug!(job_id = %job.id, applications = job.applications.len(), "Job document saved");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> Result<Option<JobDocument>, AppError> {
        let mut conn = self.redis.clone();
        let raw: Option<String> = conn.hget(&self.key, id.to_string()).await?;

        raw.map(|json| serde_json::from_str(&json).map_err(AppError::from))
            .transpose()
    }

    async fn scan(&self) -> Result<Vec<JobDocument>, AppError> {
        let mut conn = self.redis.clone();
        let raw: Vec<String> = conn.hvals(&self.key).await?;

        raw.iter()
            .map(|json| serde_json::from_str(json).map_err(AppError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_copies_fields() {
        let params = CreateJobParams {
            title: "Platform Engineer".to_string(),
            description: "Own the deploy pipeline".to_string(),
            min_salary: 90_000.0,
            max_salary: 120_000.0,
            company: "Acme".to_string(),
        };

        let doc = new_job_document(&params);
        assert_eq!(doc.title, params.title);
        assert_eq!(doc.description, params.description);
        assert_eq!(doc.min_salary, params.min_salary);
        assert_eq!(doc.max_salary, params.max_salary);
        assert_eq!(doc.company, params.company);
        assert!(doc.applications.is_empty());
    }

    #[test]
    fn test_document_without_applications_field_deserializes() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000000",
            "title": "t",
            "description": "d",
            "min_salary": 1.0,
            "max_salary": 2.0,
            "company": "c"
        }"#;
        let doc: JobDocument = serde_json::from_str(json).unwrap();
        assert!(doc.applications.is_empty());
    }
}
