//! Extraction jobs live in Redis so a slow model call never holds the
//! upload request open.

use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExtractionJob {
    Pending,
    #[serde(rename_all = "camelCase")]
    Done {
        data: Map<String, Value>,
        file_name: String,
        cv_url: String,
        /// First characters of the PDF text, for the review screen.
        pdf_text: String,
    },
    Error { error: String },
}

#[derive(Clone)]
pub struct JobStore {
    client: redis::Client,
    ttl_secs: u64,
}

impl JobStore {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }

    fn key(job_id: &str) -> String {
        format!("extract:job:{job_id}")
    }

    pub async fn put(&self, job_id: &str, job: &ExtractionJob) -> Result<(), AppError> {
        let payload = serde_json::to_string(job).map_err(anyhow::Error::from)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(Self::key(job_id), payload, self.ttl_secs)
            .await?;
        Ok(())
    }

    pub async fn get(&self, job_id: &str) -> Result<Option<ExtractionJob>, AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = conn.get(Self::key(job_id)).await?;
        payload
            .map(|p| serde_json::from_str(&p).map_err(|e| AppError::Internal(e.into())))
            .transpose()
    }
}
