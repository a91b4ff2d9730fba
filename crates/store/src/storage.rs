//! Object storage for uploaded CVs.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use uuid::Uuid;

use jobboard_common::error::AppError;

/// Prefix under which every CV is stored.
const CV_PREFIX: &str = "job-applications";

/// File name used when the client sends none we can keep.
pub const DEFAULT_CV_NAME: &str = "cv";

/// Location of an object after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    /// URL reported by the storage client for reading the object back.
    pub url: String,
}

/// Upload seam for binary objects.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<StoredObject, AppError>;
}

/// Object key for an application's CV: `job-applications/{id}-{filename}`.
///
/// Only the final path component of the client-supplied filename is kept.
/// A name that ends in a separator, or is a bare `.`/`..`, becomes
/// [`DEFAULT_CV_NAME`].
pub fn cv_object_key(application_id: Uuid, filename: &str) -> String {
    let name = match filename.rsplit(['/', '\\']).next() {
        Some(name) if !name.is_empty() && name != "." && name != ".." => name,
        _ => DEFAULT_CV_NAME,
    };
    format!("{}/{}-{}", CV_PREFIX, application_id, name)
}

/// S3-backed [`ObjectStorage`]. Returned URLs are presigned GETs.
#[derive(Clone)]
pub struct S3ObjectStorage {
    client: Client,
    bucket: String,
    url_expiry: Duration,
}

impl S3ObjectStorage {
    pub fn new(client: Client, bucket: impl Into<String>, url_expiry: Duration) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            url_expiry,
        }
    }

    /// Build a client from the standard AWS environment (region, credentials).
    pub async fn from_env(bucket: impl Into<String>, url_expiry: Duration) -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = Client::new(&aws_config);

        let storage = Self::new(client, bucket, url_expiry);
        tracing::info!(bucket = %storage.bucket, "S3 client configured");
        storage
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<StoredObject, AppError> {
        let size = bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .set_content_type(content_type.map(str::to_string))
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("PutObject {} failed: {}", key, DisplayErrorContext(e))))?;

        let presigning = PresigningConfig::expires_in(self.url_expiry)
            .map_err(|e| AppError::Config(format!("Invalid presign expiry: {}", e)))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| AppError::Storage(format!("Presign {} failed: {}", key, DisplayErrorContext(e))))?;

        tracing::info!(bucket = %self.bucket, key = %key, size, "Object stored");

        Ok(StoredObject {
            key: key.to_string(),
            url: presigned.uri().to_string(),
        })
    }
}
