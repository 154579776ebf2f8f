use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use serde_json::json;
use tracing::debug;

use super::ObjectStore;
use crate::config::Config;

/// S3 / MinIO backend.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Constructs an S3 client configured for MinIO (local) or AWS (production).
    pub async fn from_config(config: &Config) -> Self {
        let credentials = Credentials::new(
            &config.aws_access_key_id,
            &config.aws_secret_access_key,
            None,
            None,
            "recruit-static",
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(credentials)
            .endpoint_url(&config.s3_endpoint)
            .load()
            .await;

        // MinIO serves buckets under the path, not as virtual hosts.
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Self::new(Client::from_conf(s3_config))
    }
}

/// Anonymous `s3:GetObject` on every key of the bucket.
pub fn public_read_policy(bucket: &str) -> String {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "AWS": ["*"] },
            "Action": ["s3:GetObject"],
            "Resource": [format!("arn:aws:s3:::{bucket}/*")],
        }]
    })
    .to_string()
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn ensure_bucket(&self, bucket: &str) -> Result<()> {
        match self.client.create_bucket().bucket(bucket).send().await {
            Ok(_) => debug!("Created bucket {bucket}"),
            Err(err) => {
                let already_there = err.as_service_error().is_some_and(|e| {
                    e.is_bucket_already_owned_by_you() || e.is_bucket_already_exists()
                });
                if !already_there {
                    return Err(anyhow!("create bucket {bucket} failed: {err}"));
                }
                debug!("Bucket {bucket} already exists");
            }
        }

        self.client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(public_read_policy(bucket))
            .send()
            .await
            .map_err(|e| anyhow!("set policy on {bucket} failed: {e}"))?;
        Ok(())
    }

    async fn put(&self, bucket: &str, key: &str, body: Bytes, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| anyhow!("S3 upload to {bucket}/{key} failed: {e}"))?;
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Option<Bytes>> {
        match self.client.get_object().bucket(bucket).key(key).send().await {
            Ok(output) => {
                let data = output
                    .body
                    .collect()
                    .await
                    .map_err(|e| anyhow!("S3 read of {bucket}/{key} failed: {e}"))?;
                Ok(Some(data.into_bytes()))
            }
            Err(err) => {
                if err.as_service_error().is_some_and(|e| e.is_no_such_key()) {
                    return Ok(None);
                }
                Err(anyhow!("S3 download of {bucket}/{key} failed: {err}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_read_policy_targets_bucket_objects() {
        let policy: serde_json::Value =
            serde_json::from_str(&public_read_policy("cv-bucket")).unwrap();
        assert_eq!(
            policy["Statement"][0]["Resource"][0],
            "arn:aws:s3:::cv-bucket/*"
        );
        assert_eq!(policy["Statement"][0]["Action"][0], "s3:GetObject");
    }
}
