//! Tests for trigger module

use super::*;
use serde_json::json;

fn notification(bucket: &str, key: &str) -> Value {
    json!({
        "Records": [{
            "eventName": "ObjectCreated:Put",
            "s3": {
                "bucket": {"name": bucket, "arn": "arn:aws:s3:::raw"},
                "object": {"key": key, "size": 512}
            }
        }]
    })
}

// ============================================================================
// Notification Parsing Tests
// ============================================================================

#[test]
fn test_parse_notification() {
    let object = parse_notification(&notification("raw-uploads", "study.json")).unwrap();
    assert_eq!(object.bucket, "raw-uploads");
    assert_eq!(object.key, "study.json");
    assert_eq!(object.to_string(), "raw-uploads/study.json");
}

#[test]
fn test_parse_notification_decodes_key() {
    let object =
        parse_notification(&notification("raw", "uploads/my+study%2B1%281%29.json")).unwrap();
    assert_eq!(object.key, "uploads/my study+1(1).json");
}

#[test]
fn test_parse_notification_first_record_only() {
    let payload = json!({
        "Records": [
            {"s3": {"bucket": {"name": "a"}, "object": {"key": "first.json"}}},
            {"s3": {"bucket": {"name": "b"}, "object": {"key": "second.json"}}}
        ]
    });
    let object = parse_notification(&payload).unwrap();
    assert_eq!(object, ObjectRef::new("a", "first.json"));
}

#[test]
fn test_parse_notification_no_records() {
    let err = parse_notification(&json!({"Records": []})).unwrap_err();
    assert!(matches!(err, Error::Trigger { .. }));
    assert!(err.is_fatal());

    let err = parse_notification(&json!({})).unwrap_err();
    assert!(matches!(err, Error::Trigger { .. }));
}

#[test]
fn test_parse_notification_missing_key() {
    let payload = json!({"Records": [{"s3": {"bucket": {"name": "raw"}, "object": {}}}]});
    let err = parse_notification(&payload).unwrap_err();
    assert!(matches!(err, Error::Trigger { .. }));
}

#[test]
fn test_parse_notification_missing_bucket() {
    let payload = json!({"Records": [{"s3": {"object": {"key": "a.json"}}}]});
    assert!(parse_notification(&payload).is_err());

    let err = parse_notification(&notification("  ", "a.json")).unwrap_err();
    assert!(err.to_string().contains("bucket name is empty"));
}

#[test]
fn test_parse_notification_str() {
    let body = notification("raw", "a+b.json").to_string();
    let object = parse_notification_str(&body).unwrap();
    assert_eq!(object.key, "a b.json");

    assert!(matches!(
        parse_notification_str("not json"),
        Err(Error::Trigger { .. })
    ));
}

// ============================================================================
// Key Decoding Tests
// ============================================================================

#[test]
fn test_decode_key_plus_is_space() {
    assert_eq!(decode_key("a+b+c").unwrap(), "a b c");
}

#[test]
fn test_decode_key_percent_escapes() {
    assert_eq!(
        decode_key("trials/trial_id%3DT1/x.json").unwrap(),
        "trials/trial_id=T1/x.json"
    );
    assert_eq!(decode_key("caf%C3%A9.json").unwrap(), "café.json");
}

#[test]
fn test_decode_key_invalid_utf8() {
    let err = decode_key("bad%FF.json").unwrap_err();
    assert!(matches!(err, Error::Trigger { .. }));
}

#[test]
fn test_decode_key_malformed_escape() {
    for raw in ["bad%zz.json", "trailing%", "short%4"] {
        let err = decode_key(raw).unwrap_err();
        assert!(matches!(err, Error::Trigger { .. }), "{raw}");
        assert!(err.is_fatal());
    }
    assert_eq!(decode_key("100%25+done").unwrap(), "100% done");
}

#[test]
fn test_parse_notification_malformed_key_is_fatal() {
    let err = parse_notification(&notification("raw", "uploads/%zz.json")).unwrap_err();
    assert!(matches!(err, Error::Trigger { .. }));
}
