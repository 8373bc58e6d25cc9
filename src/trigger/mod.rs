//! Trigger adapter module
//!
//! Decodes object-creation notifications into the object they reference.
//!
//! # Overview
//!
//! The storage service delivers a notification of the form
//! `{"Records":[{"s3":{"bucket":{"name":..},"object":{"key":..}}}]}` each time
//! an upload lands. Only the first record is processed. Keys arrive
//! form-encoded (`+` for space, `%XX` escapes) and are decoded before use.

mod types;

pub use types::{BucketEntity, Notification, NotificationRecord, ObjectEntity, ObjectRef, S3Entity};

use crate::error::{Error, Result};
use serde_json::Value;

/// Extract the referenced object from a notification payload
pub fn parse_notification(payload: &Value) -> Result<ObjectRef> {
    let notification: Notification = serde_json::from_value(payload.clone())
        .map_err(|e| Error::trigger(format!("unexpected notification shape: {e}")))?;
    notification.first_object()
}

/// Extract the referenced object from a raw notification body
pub fn parse_notification_str(body: &str) -> Result<ObjectRef> {
    let payload: Value = serde_json::from_str(body)
        .map_err(|e| Error::trigger(format!("notification is not valid JSON: {e}")))?;
    parse_notification(&payload)
}

/// Decode a form-encoded object key
///
/// `+` becomes a space first, then percent escapes are resolved. A `%` not
/// followed by two hex digits makes the key malformed.
pub fn decode_key(raw: &str) -> Result<String> {
    if let Some(pos) = malformed_escape(raw) {
        return Err(Error::trigger(format!(
            "object key '{raw}' has a malformed escape at byte {pos}"
        )));
    }
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| Error::trigger(format!("object key '{raw}' is not valid UTF-8: {e}")))
}

fn malformed_escape(raw: &str) -> Option<usize> {
    let bytes = raw.as_bytes();
    bytes.iter().enumerate().find_map(|(i, b)| {
        let valid = *b != b'%'
            || bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        (!valid).then_some(i)
    })
}

#[cfg(test)]
mod tests;
