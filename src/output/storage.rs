//! Object storage access (S3, R2, GCS, Azure, local, memory)

use crate::error::{Error, Result};
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{Attribute, AttributeValue, Attributes, ObjectStore, PutOptions};
use std::sync::Arc;
use url::Url;

/// Content type of per-entity JSON objects
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type of derived tables
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// A bucket (or directory) of objects, parsed from a URL
#[derive(Debug, Clone)]
pub struct Storage {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket/container
    prefix: String,
    /// URL scheme (s3, r2, gs, az, file, memory)
    scheme: String,
    /// Root URL used to build catalog locations, e.g. `s3://bucket`
    root: String,
}

impl Storage {
    /// Parse a storage URL and create the matching object store
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` - AWS S3
    /// - `r2://bucket/path/` - Cloudflare R2 (S3-compatible)
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `az://container/path/` - Azure Blob Storage
    /// - `memory://` - in-process store
    /// - `/local/path/`, `./path/` or `file:///path` - Local filesystem
    pub fn parse(url: &str) -> Result<Self> {
        if url.starts_with("memory://") {
            return Ok(Self::in_memory());
        }
        if url.starts_with("file://") || !url.contains("://") {
            return Self::parse_local(url);
        }

        let parsed =
            Url::parse(url).map_err(|e| Error::config(format!("Invalid storage URL {url}: {e}")))?;
        let bucket = parsed
            .host_str()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| Error::config(format!("Storage URL has no bucket: {url}")))?;
        let prefix = parsed.path().trim_matches('/').to_string();

        match parsed.scheme() {
            "s3" => Self::s3(bucket, prefix, false),
            "r2" => Self::s3(bucket, prefix, true),
            "gs" => Self::gcs(bucket, prefix),
            "az" => Self::azure(bucket, prefix),
            other => Err(Error::config(format!(
                "Unsupported storage scheme '{other}' in {url}"
            ))),
        }
    }

    /// Open an S3 bucket using credentials from the environment
    pub fn for_bucket(bucket: &str) -> Result<Self> {
        Self::s3(bucket, String::new(), false)
    }

    /// Wrap an existing object store
    pub fn from_store(
        store: Arc<dyn ObjectStore>,
        scheme: impl Into<String>,
        root: impl Into<String>,
    ) -> Self {
        Self {
            store,
            prefix: String::new(),
            scheme: scheme.into(),
            root: root.into(),
        }
    }

    /// Create an empty in-process store
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemory::new()), "memory", "memory://")
    }

    fn s3(bucket: &str, prefix: String, is_r2: bool) -> Result<Self> {
        let scheme = if is_r2 { "r2" } else { "s3" };
        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);

        // AWS_ENDPOINT is read by from_env(); R2 has its own variable
        if is_r2 {
            if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                builder = builder.with_endpoint(endpoint);
            }
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create {scheme} client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: scheme.to_string(),
            root: format!("{scheme}://{bucket}"),
        })
    }

    fn gcs(bucket: &str, prefix: String) -> Result<Self> {
        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "gs".to_string(),
            root: format!("gs://{bucket}"),
        })
    }

    fn azure(container: &str, prefix: String) -> Result<Self> {
        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix,
            scheme: "az".to_string(),
            root: format!("az://{container}"),
        })
    }

    fn parse_local(path: &str) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);

        std::fs::create_dir_all(path)
            .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;
        let absolute = std::fs::canonicalize(path)
            .map_err(|e| Error::config(format!("Failed to resolve directory {path}: {e}")))?;

        let store = LocalFileSystem::new_with_prefix(&absolute)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            scheme: "file".to_string(),
            root: format!("file://{}", absolute.display()),
        })
    }

    /// Check if this is a remote object store
    pub fn is_cloud(&self) -> bool {
        self.scheme != "file" && self.scheme != "memory"
    }

    /// Get the scheme (s3, r2, gs, az, file, memory)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The underlying object store
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Resolve a key to a path inside the store
    ///
    /// Keys are taken verbatim: the stored key is exactly the key the
    /// notification names or the partition prefix spells out.
    fn path(&self, key: &str) -> std::result::Result<ObjectPath, object_store::path::Error> {
        if self.prefix.is_empty() {
            ObjectPath::parse(key)
        } else {
            ObjectPath::parse(format!("{}/{key}", self.prefix))
        }
    }

    /// Absolute URL of a key or prefix, as registered with a catalog
    pub fn location(&self, key: &str) -> String {
        let base = if self.prefix.is_empty() {
            self.root.clone()
        } else {
            format!("{}/{}", self.root, self.prefix)
        };
        if base.ends_with('/') {
            format!("{base}{key}")
        } else {
            format!("{base}/{key}")
        }
    }

    /// Write bytes under a key, replacing any previous object
    pub async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<String> {
        let path = self
            .path(key)
            .map_err(|e| Error::write(key, format!("invalid object key: {e}")))?;

        // Local and in-memory stores reject or ignore attributes
        let mut opts = PutOptions::default();
        if self.is_cloud() {
            let mut attributes = Attributes::new();
            attributes.insert(
                Attribute::ContentType,
                AttributeValue::from(content_type.to_string()),
            );
            opts.attributes = attributes;
        }

        self.store
            .put_opts(&path, data.into(), opts)
            .await
            .map_err(|e| Error::write(key, e.to_string()))?;

        Ok(format!("{}://{path}", self.scheme))
    }

    /// Read a whole object as raw bytes
    pub async fn get(&self, key: &str) -> Result<Bytes> {
        let path = self
            .path(key)
            .map_err(|e| Error::Other(format!("Invalid object key {key}: {e}")))?;
        let result = self
            .store
            .get(&path)
            .await
            .map_err(|e| Error::Other(format!("Failed to read {path}: {e}")))?;
        result
            .bytes()
            .await
            .map_err(|e| Error::Other(format!("Failed to read body of {path}: {e}")))
    }

    /// Read a whole object as UTF-8 text
    pub async fn get_string(&self, key: &str) -> Result<String> {
        let bytes = self.get(key).await?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::Other(format!("Object {key} is not valid UTF-8: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().to_str().unwrap();
        let storage = Storage::parse(path).unwrap();
        assert_eq!(storage.scheme(), "file");
        assert!(!storage.is_cloud());
        assert!(storage.location("trials/").starts_with("file://"));
        assert!(storage.location("trials/").ends_with("/trials/"));
    }

    #[test]
    fn test_parse_memory() {
        let storage = Storage::parse("memory://").unwrap();
        assert_eq!(storage.scheme(), "memory");
        assert!(!storage.is_cloud());
        assert_eq!(storage.location("trials/a"), "memory://trials/a");
    }

    #[test]
    fn test_parse_unsupported_scheme() {
        let err = Storage::parse("ftp://host/path").unwrap_err();
        assert!(err.to_string().contains("Unsupported storage scheme"));
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let storage = Storage::in_memory();
        storage
            .put("a/b.json", Bytes::from_static(b"{}"), JSON_CONTENT_TYPE)
            .await
            .unwrap();
        assert_eq!(storage.get_string("a/b.json").await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_keys_are_stored_verbatim() {
        let storage = Storage::in_memory();
        storage
            .put("uploads/étude #1.json", Bytes::from_static(b"{}"), JSON_CONTENT_TYPE)
            .await
            .unwrap();

        let stored = storage
            .store()
            .get(&ObjectPath::parse("uploads/étude #1.json").unwrap())
            .await;
        assert!(stored.is_ok());
        assert_eq!(storage.get_string("uploads/étude #1.json").await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_invalid_key_is_rejected() {
        let storage = Storage::in_memory();
        let err = storage
            .put("a//b.json", Bytes::from_static(b"{}"), JSON_CONTENT_TYPE)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
        assert!(storage.get("a//b.json").await.is_err());
    }

    #[tokio::test]
    async fn test_get_missing() {
        let storage = Storage::in_memory();
        assert!(storage.get_string("missing.json").await.is_err());
    }

    #[tokio::test]
    async fn test_local_put_overwrites() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = Storage::parse(temp_dir.path().to_str().unwrap()).unwrap();

        storage
            .put("trials/x.csv", Bytes::from_static(b"old"), CSV_CONTENT_TYPE)
            .await
            .unwrap();
        storage
            .put("trials/x.csv", Bytes::from_static(b"new"), CSV_CONTENT_TYPE)
            .await
            .unwrap();

        let on_disk = std::fs::read_to_string(temp_dir.path().join("trials/x.csv")).unwrap();
        assert_eq!(on_disk, "new");
    }
}
