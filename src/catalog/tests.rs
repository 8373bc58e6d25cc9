//! Tests for catalog module

use super::tables::{self, DEFAULT_MEDICATION_TABLE, DEFAULT_SURVEY_TABLE};
use super::*;
use crate::error::Error;
use crate::output::tests::example_document;
use crate::output::Storage;
use std::sync::Arc;

const TABLE_ROOT: &str = "memory://trials/";

fn seeded_catalog() -> Arc<MemoryCatalog> {
    Arc::new(MemoryCatalog::with_tables(tables::builtin_tables(
        DEFAULT_SURVEY_TABLE,
        DEFAULT_MEDICATION_TABLE,
        TABLE_ROOT,
    )))
}

fn example_values(content_type: &str) -> Vec<String> {
    ["T1", "P1", "csv_data", "S1", content_type]
        .iter()
        .map(|v| (*v).to_string())
        .collect()
}

// ============================================================================
// Table Definition Tests
// ============================================================================

#[test]
fn test_builtin_tables() {
    let defs = tables::builtin_tables("survey_table", "medication_table", TABLE_ROOT);
    assert_eq!(defs.len(), 2);

    let survey = &defs[0];
    assert_eq!(survey.name, "survey_table");
    assert_eq!(survey.partition_index.name, "survey-index");
    assert_eq!(
        survey.partition_index.keys,
        vec!["trial_id", "patient_id", "file_type", "study_id", "content_type"]
    );
    assert_eq!(survey.storage_descriptor.columns.len(), 26);
    assert_eq!(survey.storage_descriptor.columns[0].name, "SurveyID");

    let medication = &defs[1];
    assert_eq!(medication.partition_index.name, "medication-index");
    let names: Vec<&str> = medication
        .storage_descriptor
        .columns
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["StudyID", "TrialID", "PatientID", "DeviceID", "MedicationTime"]
    );
}

#[test]
fn test_csv_descriptor_format() {
    let def = tables::survey_table("survey_table", TABLE_ROOT);
    let sd = &def.storage_descriptor;

    assert_eq!(sd.location.as_deref(), Some(TABLE_ROOT));
    assert_eq!(sd.input_format.as_deref(), Some(tables::TEXT_INPUT_FORMAT));
    assert_eq!(sd.output_format.as_deref(), Some(tables::TEXT_OUTPUT_FORMAT));

    let serde_info = sd.serde_info.as_ref().unwrap();
    assert_eq!(
        serde_info.serialization_library.as_deref(),
        Some(tables::CSV_SERDE)
    );
    assert_eq!(
        serde_info.parameters.get("field.delim").map(String::as_str),
        Some(",")
    );
    assert!(def.partition_keys.iter().all(|c| c.data_type == "string"));
}

#[test]
fn test_delimited_tables() {
    let defs = tables::delimited_tables("surveys", "medications", TABLE_ROOT, ';');
    assert_eq!(defs.len(), 2);
    for def in &defs {
        assert_eq!(def.storage_descriptor.field_delimiter(), Some(";"));
        assert_eq!(def.storage_descriptor.location.as_deref(), Some(TABLE_ROOT));
    }
    assert_eq!(
        tables::survey_table("s", TABLE_ROOT).storage_descriptor.field_delimiter(),
        Some(",")
    );
}

#[tokio::test]
async fn test_partition_inherits_field_delimiter() {
    let catalog = Arc::new(MemoryCatalog::with_tables(tables::delimited_tables(
        DEFAULT_SURVEY_TABLE,
        DEFAULT_MEDICATION_TABLE,
        TABLE_ROOT,
        '\t',
    )));
    let sync = CatalogSynchronizer::new(catalog.clone(), Storage::in_memory());
    sync.sync(&example_document().summary).await;

    let partition = catalog
        .partition(DEFAULT_SURVEY_TABLE, &example_values("surveys"))
        .await
        .unwrap();
    assert_eq!(partition.field_delimiter(), Some("\t"));
}

#[test]
fn test_table_location() {
    assert_eq!(tables::table_location(&Storage::in_memory()), TABLE_ROOT);
}

#[test]
fn test_table_definition_serializes_column_type() {
    let json = serde_json::to_value(Column::string("tremor")).unwrap();
    assert_eq!(json, serde_json::json!({"name": "tremor", "type": "string"}));
}

// ============================================================================
// Memory Catalog Tests
// ============================================================================

#[tokio::test]
async fn test_memory_catalog_descriptor() {
    let catalog = seeded_catalog();
    let sd = catalog
        .get_storage_descriptor(DEFAULT_SURVEY_TABLE)
        .await
        .unwrap();
    assert_eq!(sd.location.as_deref(), Some(TABLE_ROOT));

    let err = catalog.get_storage_descriptor("nope").await.unwrap_err();
    assert!(matches!(err, Error::TableNotFound { .. }));
}

#[tokio::test]
async fn test_memory_catalog_rejects_duplicates() {
    let catalog = seeded_catalog();
    let sd = catalog
        .get_storage_descriptor(DEFAULT_SURVEY_TABLE)
        .await
        .unwrap();
    let input = PartitionInput::new(example_values("surveys"), sd);

    catalog
        .create_partition(DEFAULT_SURVEY_TABLE, input.clone())
        .await
        .unwrap();
    let err = catalog
        .create_partition(DEFAULT_SURVEY_TABLE, input)
        .await
        .unwrap_err();

    assert!(err.is_partition_exists());
    assert_eq!(catalog.partitions(DEFAULT_SURVEY_TABLE).await.len(), 1);
}

#[tokio::test]
async fn test_memory_catalog_rejects_wrong_arity() {
    let catalog = seeded_catalog();
    let sd = catalog
        .get_storage_descriptor(DEFAULT_MEDICATION_TABLE)
        .await
        .unwrap();
    let input = PartitionInput::new(vec!["T1".to_string(), "P1".to_string()], sd);

    let err = catalog
        .create_partition(DEFAULT_MEDICATION_TABLE, input)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidDescriptor { .. }));
}

#[tokio::test]
async fn test_memory_catalog_requires_location() {
    let catalog = seeded_catalog();
    let input = PartitionInput::new(example_values("surveys"), StorageDescriptor::default());

    let err = catalog
        .create_partition(DEFAULT_SURVEY_TABLE, input)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidDescriptor { .. }));
}

#[tokio::test]
async fn test_memory_catalog_table_names() {
    let catalog = MemoryCatalog::new();
    assert!(catalog.table_names().await.is_empty());

    catalog
        .create_table(tables::medication_table("meds", TABLE_ROOT))
        .await;
    assert_eq!(catalog.table_names().await, vec!["meds"]);
}

// ============================================================================
// Synchronizer Tests
// ============================================================================

#[tokio::test]
async fn test_sync_registers_both_tables() {
    let catalog = seeded_catalog();
    let sync = CatalogSynchronizer::new(catalog.clone(), Storage::in_memory());
    let summary = example_document().summary;

    let results = sync.sync(&summary).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].table, DEFAULT_SURVEY_TABLE);
    assert_eq!(results[0].values, example_values("surveys"));
    assert_eq!(results[0].status, SyncStatus::Created);
    assert_eq!(
        results[0].location,
        "memory://trials/trial_id=T1/patient_id=P1/file_type=csv_data/study_id=S1/content_type=surveys/"
    );

    assert_eq!(results[1].table, DEFAULT_MEDICATION_TABLE);
    assert_eq!(results[1].values, example_values("medications"));
    assert_eq!(results[1].status, SyncStatus::Created);

    let registered = catalog
        .partition(DEFAULT_MEDICATION_TABLE, &example_values("medications"))
        .await
        .unwrap();
    assert_eq!(registered.location.as_deref(), Some(results[1].location.as_str()));
    assert_eq!(registered.columns.len(), 5);
    assert_eq!(registered.input_format.as_deref(), Some(tables::TEXT_INPUT_FORMAT));
}

#[tokio::test]
async fn test_sync_swallows_existing_partition() {
    let catalog = seeded_catalog();
    let sync = CatalogSynchronizer::new(catalog.clone(), Storage::in_memory());
    let summary = example_document().summary;

    sync.sync(&summary).await;
    let results = sync.sync(&summary).await;

    assert!(results
        .iter()
        .all(|r| r.status == SyncStatus::AlreadyExists && r.error.is_none()));
    assert_eq!(catalog.partitions(DEFAULT_SURVEY_TABLE).await.len(), 1);
}

#[tokio::test]
async fn test_sync_reports_missing_table() {
    let catalog = Arc::new(MemoryCatalog::with_tables(vec![tables::survey_table(
        DEFAULT_SURVEY_TABLE,
        TABLE_ROOT,
    )]));
    let sync = CatalogSynchronizer::new(catalog, Storage::in_memory());

    let results = sync.sync(&example_document().summary).await;

    assert_eq!(results[0].status, SyncStatus::Created);
    assert_eq!(results[1].status, SyncStatus::Failed);
    assert!(results[1]
        .error
        .as_deref()
        .unwrap()
        .contains("medication_table"));
}

#[tokio::test]
async fn test_sync_custom_table_names() {
    let catalog = Arc::new(MemoryCatalog::with_tables(tables::builtin_tables(
        "s", "m", TABLE_ROOT,
    )));
    let sync =
        CatalogSynchronizer::new(catalog.clone(), Storage::in_memory()).with_tables("s", "m");

    let results = sync.sync(&example_document().summary).await;
    assert!(results.iter().all(|r| r.status == SyncStatus::Created));
    assert_eq!(catalog.partitions("s").await.len(), 1);
    assert_eq!(catalog.partitions("m").await.len(), 1);
}

#[test]
fn test_sync_status_display() {
    assert_eq!(SyncStatus::AlreadyExists.to_string(), "already_exists");
    assert_eq!(
        serde_json::to_value(SyncStatus::Created).unwrap(),
        serde_json::json!("created")
    );
}
