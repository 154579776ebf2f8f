//! Object storage for CVs, generated PDFs and internship reports.
//!
//! Handlers talk to [`Storage`], which wraps a pluggable [`ObjectStore`] backend
//! (S3/MinIO in production, in-memory in tests) and knows the public URL layout.

pub mod location;
pub mod memory;
pub mod s3;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use tracing::{error, info, warn};

pub use location::{parse_location, ObjectLocation};

pub const CV_BUCKET: &str = "cv-bucket";
/// Recruitment questionnaire PDFs.
pub const FORM2_BUCKET: &str = "form2-bucket";
/// Corrected evaluation PDFs.
pub const FORM3_BUCKET: &str = "form3-bucket";
pub const RAPPORT_BUCKET: &str = "rapport-bucket";

pub const BUCKETS: [&str; 4] = [CV_BUCKET, FORM2_BUCKET, FORM3_BUCKET, RAPPORT_BUCKET];

/// Minimal object-store surface the service needs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Creates the bucket when missing and applies the public-read policy.
    async fn ensure_bucket(&self, bucket: &str) -> Result<()>;

    async fn put(&self, bucket: &str, key: &str, body: Bytes, content_type: &str) -> Result<()>;

    /// Returns `Ok(None)` when the object does not exist.
    async fn get(&self, bucket: &str, key: &str) -> Result<Option<Bytes>>;
}

/// Storage facade shared through `AppState`.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn ObjectStore>,
    public_base: String,
}

impl Storage {
    pub fn new(backend: Arc<dyn ObjectStore>, public_base: impl Into<String>) -> Self {
        Self {
            backend,
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// `${S3_PUBLIC_URL}/<bucket>/<key>`
    pub fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/{}/{}", self.public_base, bucket, key)
    }

    /// Uploads an object and returns its public URL.
    pub async fn put_public(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<String> {
        let size = body.len();
        self.backend.put(bucket, key, body, content_type).await?;
        info!("Uploaded {size} bytes to {bucket}/{key}");
        Ok(self.public_url(bucket, key))
    }

    /// Ensures every bucket exists. Failures are logged per bucket and never abort.
    pub async fn ensure_buckets(&self) {
        for bucket in BUCKETS {
            match self.backend.ensure_bucket(bucket).await {
                Ok(()) => info!("Bucket \"{bucket}\" ready with public read policy"),
                Err(e) => error!("Failed to prepare bucket \"{bucket}\": {e:#}"),
            }
        }
    }

    /// Fetches an object, retrying with the URL-encoded and URL-decoded key
    /// spellings that uploads from older clients may have used.
    pub async fn fetch_with_variants(&self, location: &ObjectLocation) -> Result<Option<Bytes>> {
        for key in location.key_variants() {
            match self.backend.get(&location.bucket, &key).await? {
                Some(bytes) => return Ok(Some(bytes)),
                None => warn!("Object not found: {}/{}", location.bucket, key),
            }
        }
        Ok(None)
    }
}
