//! Object fetcher for uploaded documents

use super::storage::Storage;
use crate::error::{Error, Result};
use crate::trigger::ObjectRef;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// How buckets named by notifications are resolved
#[derive(Debug)]
enum FetchMode {
    /// One S3 client per bucket name, built on first use
    PerBucket(RwLock<HashMap<String, Storage>>),
    /// A single store answers for every bucket
    Fixed(Storage),
}

/// Fetches complete object bodies
///
/// Built once per process and shared across invocations; client handles
/// are reused rather than recreated per document.
#[derive(Debug)]
pub struct ObjectFetcher {
    mode: FetchMode,
}

impl ObjectFetcher {
    /// Resolve each bucket to an S3 client configured from the environment
    pub fn per_bucket() -> Self {
        Self {
            mode: FetchMode::PerBucket(RwLock::new(HashMap::new())),
        }
    }

    /// Read every object from one store, ignoring the bucket name
    pub fn fixed(storage: Storage) -> Self {
        Self {
            mode: FetchMode::Fixed(storage),
        }
    }

    async fn storage_for(&self, bucket: &str) -> Result<Storage> {
        let cache = match &self.mode {
            FetchMode::Fixed(storage) => return Ok(storage.clone()),
            FetchMode::PerBucket(cache) => cache,
        };

        if let Some(storage) = cache.read().await.get(bucket) {
            return Ok(storage.clone());
        }

        let mut cache = cache.write().await;
        if let Some(storage) = cache.get(bucket) {
            return Ok(storage.clone());
        }
        tracing::debug!("Creating storage client for bucket {bucket}");
        let storage = Storage::for_bucket(bucket)?;
        cache.insert(bucket.to_string(), storage.clone());
        Ok(storage)
    }

    /// Fetch the whole object as UTF-8 text
    pub async fn fetch(&self, object: &ObjectRef) -> Result<String> {
        let storage = self
            .storage_for(&object.bucket)
            .await
            .map_err(|e| Error::fetch(&object.bucket, &object.key, e.to_string()))?;

        let body = storage
            .get_string(&object.key)
            .await
            .map_err(|e| Error::fetch(&object.bucket, &object.key, e.to_string()))?;

        tracing::debug!("Fetched {} bytes from {object}", body.len());
        Ok(body)
    }
}
