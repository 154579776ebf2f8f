use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;

use super::ObjectStore;

/// In-process object store. Backs router tests and local runs without MinIO.
#[derive(Default)]
pub struct MemoryStore {
    buckets: Mutex<HashSet<String>>,
    objects: Mutex<HashMap<(String, String), (Bytes, String)>>,
}

impl MemoryStore {
    pub fn has_bucket(&self, bucket: &str) -> bool {
        self.buckets
            .lock()
            .map(|b| b.contains(bucket))
            .unwrap_or(false)
    }

    pub fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        self.objects
            .lock()
            .ok()?
            .get(&(bucket.to_string(), key.to_string()))
            .map(|(_, ct)| ct.clone())
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn ensure_bucket(&self, bucket: &str) -> Result<()> {
        self.buckets
            .lock()
            .map_err(|_| anyhow!("bucket set poisoned"))?
            .insert(bucket.to_string());
        Ok(())
    }

    async fn put(&self, bucket: &str, key: &str, body: Bytes, content_type: &str) -> Result<()> {
        self.objects
            .lock()
            .map_err(|_| anyhow!("object map poisoned"))?
            .insert(
                (bucket.to_string(), key.to_string()),
                (body, content_type.to_string()),
            );
        Ok(())
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Option<Bytes>> {
        Ok(self
            .objects
            .lock()
            .map_err(|_| anyhow!("object map poisoned"))?
            .get(&(bucket.to_string(), key.to_string()))
            .map(|(body, _)| body.clone()))
    }
}
