//! Notification payload types

use super::decode_key;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Object-creation notification
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    #[serde(rename = "Records", default)]
    pub records: Vec<NotificationRecord>,
}

/// A single notification record
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationRecord {
    pub s3: S3Entity,
}

/// Storage section of a record
#[derive(Debug, Clone, Deserialize)]
pub struct S3Entity {
    pub bucket: BucketEntity,
    pub object: ObjectEntity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BucketEntity {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectEntity {
    /// Form-encoded key as delivered
    pub key: String,
    #[serde(default)]
    pub size: Option<u64>,
}

impl Notification {
    /// Resolve the first record into a decoded object reference
    pub fn first_object(&self) -> Result<ObjectRef> {
        let record = self
            .records
            .first()
            .ok_or_else(|| Error::trigger("notification contains no records"))?;

        if self.records.len() > 1 {
            tracing::warn!(
                "Notification carries {} records, only the first is processed",
                self.records.len()
            );
        }

        let bucket = record.s3.bucket.name.trim();
        if bucket.is_empty() {
            return Err(Error::trigger("bucket name is empty"));
        }

        let key = decode_key(&record.s3.object.key)?;
        if key.is_empty() {
            return Err(Error::trigger("object key is empty"));
        }

        Ok(ObjectRef::new(bucket, key))
    }
}

/// A decoded (bucket, key) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl ObjectRef {
    /// Create a new object reference
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}
