//! Built-in table definitions
//!
//! Column sets of the survey and medication tables as provisioned in the
//! catalog. Both tables store CSV rooted at `<output>/trials/` and are
//! partitioned on the five lake partition columns.

use super::types::{Column, PartitionIndex, SerdeInfo, StorageDescriptor, TableDefinition};
use super::types::FIELD_DELIMITER_PARAM;
use crate::output::Storage;
use crate::partition::{LAKE_ROOT, PARTITION_COLUMNS};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

pub const DEFAULT_DATABASE: &str = "parkinsons_database";
pub const DEFAULT_SURVEY_TABLE: &str = "survey_table";
pub const DEFAULT_MEDICATION_TABLE: &str = "medication_table";

pub const SURVEY_INDEX: &str = "survey-index";
pub const MEDICATION_INDEX: &str = "medication-index";

pub const TEXT_INPUT_FORMAT: &str = "org.apache.hadoop.mapred.TextInputFormat";
pub const TEXT_OUTPUT_FORMAT: &str = "org.apache.hadoop.hive.ql.io.HiveIgnoreKeyTextOutputFormat";
pub const CSV_SERDE: &str = "org.apache.hadoop.hive.serde2.lazy.LazySimpleSerDe";
pub const DEFAULT_FIELD_DELIMITER: char = ',';

static SURVEY_COLUMNS: Lazy<Vec<Column>> = Lazy::new(|| {
    [
        "SurveyID",
        "Time",
        "IsSymptomsFromEarlierTime",
        "tremor",
        "weakness",
        "slowness-of-movement",
        "balance-problems",
        "speech-difficulty",
        "general-stiffness",
        "muscle-cramping",
        "reduced-dexterity",
        "difficulty-getting-out-of-chair",
        "mood-changes",
        "anxiety",
        "experience-panic-attack",
        "cloudy-mind",
        "abdominal-discomfort",
        "numbness",
        "sweating",
        "experience-hot-cold",
        "pain",
        "aching",
        "PatientID",
        "DeviceID",
        "TrialID",
        "StudyID",
    ]
    .into_iter()
    .map(Column::string)
    .collect()
});

static MEDICATION_COLUMNS: Lazy<Vec<Column>> = Lazy::new(|| {
    ["StudyID", "TrialID", "PatientID", "DeviceID", "MedicationTime"]
        .into_iter()
        .map(Column::string)
        .collect()
});

static PARTITION_KEYS: Lazy<Vec<Column>> =
    Lazy::new(|| PARTITION_COLUMNS.into_iter().map(Column::string).collect());

/// Partition key columns shared by both tables
pub fn partition_keys() -> &'static [Column] {
    &PARTITION_KEYS
}

/// CSV storage descriptor for a set of columns
pub fn csv_descriptor(columns: &[Column], location: impl Into<String>) -> StorageDescriptor {
    let mut serde_parameters = BTreeMap::new();
    serde_parameters.insert(
        FIELD_DELIMITER_PARAM.to_string(),
        DEFAULT_FIELD_DELIMITER.to_string(),
    );

    let mut parameters = BTreeMap::new();
    parameters.insert("classification".to_string(), "csv".to_string());

    StorageDescriptor {
        location: Some(location.into()),
        columns: columns.to_vec(),
        input_format: Some(TEXT_INPUT_FORMAT.to_string()),
        output_format: Some(TEXT_OUTPUT_FORMAT.to_string()),
        serde_info: Some(SerdeInfo {
            serialization_library: Some(CSV_SERDE.to_string()),
            parameters: serde_parameters,
        }),
        parameters,
    }
}

fn definition(name: &str, index: &str, columns: &[Column], location: &str) -> TableDefinition {
    TableDefinition {
        name: name.to_string(),
        partition_keys: partition_keys().to_vec(),
        partition_index: PartitionIndex {
            name: index.to_string(),
            keys: PARTITION_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
        },
        storage_descriptor: csv_descriptor(columns, location),
    }
}

/// Location of both tables inside an output store
pub fn table_location(output: &Storage) -> String {
    output.location(&format!("{LAKE_ROOT}/"))
}

/// Definition of the surveys table rooted at `location`
pub fn survey_table(name: &str, location: &str) -> TableDefinition {
    definition(name, SURVEY_INDEX, &SURVEY_COLUMNS, location)
}

/// Definition of the medications table rooted at `location`
pub fn medication_table(name: &str, location: &str) -> TableDefinition {
    definition(name, MEDICATION_INDEX, &MEDICATION_COLUMNS, location)
}

/// Both tables under the given names
pub fn builtin_tables(survey: &str, medication: &str, location: &str) -> Vec<TableDefinition> {
    vec![
        survey_table(survey, location),
        medication_table(medication, location),
    ]
}

/// Both tables, declaring the delimiter the CSV files are written with
pub fn delimited_tables(
    survey: &str,
    medication: &str,
    location: &str,
    delimiter: char,
) -> Vec<TableDefinition> {
    builtin_tables(survey, medication, location)
        .into_iter()
        .map(|table| table.with_field_delimiter(delimiter))
        .collect()
}
