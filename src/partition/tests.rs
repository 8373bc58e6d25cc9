//! Tests for partition module

use super::*;
use crate::decode::DocumentDecoder;
use serde_json::json;
use test_case::test_case;

fn summary() -> crate::decode::StudySummary {
    let body = json!({
        "study_summary": {"study_id": "S1", "trial_id": "T1", "patient_id": "P1", "device_id": "D1"}
    })
    .to_string();
    DocumentDecoder::new().decode(&body).unwrap().summary
}

// ============================================================================
// Prefix Tests
// ============================================================================

#[test_case(ContentType::Surveys, "trials/trial_id=T1/patient_id=P1/file_type=csv_data/study_id=S1/content_type=surveys" ; "csv surveys")]
#[test_case(ContentType::Medications, "trials/trial_id=T1/patient_id=P1/file_type=csv_data/study_id=S1/content_type=medications" ; "csv medications")]
fn test_csv_prefix(content_type: ContentType, expected: &str) {
    let key = PartitionKey::for_summary(&summary(), FileType::CsvData, content_type);
    assert_eq!(key.prefix(), expected);
}

#[test_case(ContentType::Surveys, "trials/trial_id=T1/patient_id=P1/file_type=json_data/content_type=surveys" ; "json surveys")]
#[test_case(ContentType::Summaries, "trials/trial_id=T1/patient_id=P1/file_type=json_data/content_type=summaries" ; "json summaries")]
fn test_json_prefix_omits_study(content_type: ContentType, expected: &str) {
    let key = PartitionKey::for_summary(&summary(), FileType::JsonData, content_type);
    assert_eq!(key.prefix(), expected);
}

#[test]
fn test_object_key() {
    let key = PartitionKey::for_summary(&summary(), FileType::JsonData, ContentType::Summaries);
    assert_eq!(
        key.object_key("S1.json"),
        "trials/trial_id=T1/patient_id=P1/file_type=json_data/content_type=summaries/S1.json"
    );
    assert_eq!(key.to_string(), key.prefix());
}

// ============================================================================
// Value Vector Tests
// ============================================================================

#[test]
fn test_values_match_prefix_segments() {
    let key = PartitionKey::for_summary(&summary(), FileType::CsvData, ContentType::Surveys);
    assert_eq!(key.values(), vec!["T1", "P1", "csv_data", "S1", "surveys"]);

    let prefix = key.prefix();
    let segments: Vec<&str> = prefix.split('/').skip(1).collect();
    let expected: Vec<String> = PARTITION_COLUMNS
        .iter()
        .zip(key.values())
        .map(|(column, value)| format!("{column}={value}"))
        .collect();
    assert_eq!(segments, expected);
}

#[test]
fn test_values_medications() {
    let key = PartitionKey::for_summary(&summary(), FileType::CsvData, ContentType::Medications);
    assert_eq!(
        key.values(),
        vec!["T1", "P1", "csv_data", "S1", "medications"]
    );
}

#[test]
fn test_key_is_pure() {
    let a = PartitionKey::for_summary(&summary(), FileType::CsvData, ContentType::Surveys);
    let b = PartitionKey::new("T1", "P1", FileType::CsvData, "S1", ContentType::Surveys);
    assert_eq!(a, b);
    assert_eq!(a.prefix(), b.prefix());
}

#[test]
fn test_device_id_does_not_affect_key() {
    let mut other = summary();
    other.device_id = "D2".to_string();

    let a = PartitionKey::for_summary(&summary(), FileType::CsvData, ContentType::Surveys);
    let b = PartitionKey::for_summary(&other, FileType::CsvData, ContentType::Surveys);
    assert_eq!(a, b);
}

#[test]
fn test_type_names() {
    assert_eq!(FileType::CsvData.to_string(), "csv_data");
    assert_eq!(FileType::JsonData.to_string(), "json_data");
    assert_eq!(ContentType::Surveys.to_string(), "surveys");
    assert_eq!(ContentType::Medications.to_string(), "medications");
    assert_eq!(ContentType::Summaries.to_string(), "summaries");
    assert_eq!(
        serde_json::to_value(FileType::CsvData).unwrap(),
        json!("csv_data")
    );
}
