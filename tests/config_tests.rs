//! Configuration file tests

use std::path::PathBuf;

use star_schema::config::{
    CONFIG_FILENAME, ENV_BATCH_SIZE, ENV_OUTPUT_DIR, PipelineConfig, sample_config,
};
use star_schema::export::OutputFormat;
use star_schema::models::ColumnType;
use star_schema::schema::TableRole;
use star_schema::{SpecValidationError, StarError};
use tempfile::tempdir;

const YAML: &str = r#"
source:
  batch_size: 2500
  delimiter: "|"
output:
  directory: warehouse
  format: ndjson
tables:
  - name: sale
    role: fact
    key: invoice
    columns: [invoice, store]
  - name: store
    key: store
    columns: [store, city]
columns:
  store: integer
"#;

#[test]
fn test_yaml_config() {
    let config = PipelineConfig::parse_yaml(YAML).unwrap();
    assert_eq!(config.source.batch_size, 2500);
    assert_eq!(config.source.delimiter, '|');
    assert_eq!(config.output.directory, PathBuf::from("warehouse"));
    assert_eq!(config.output.format, OutputFormat::Ndjson);
    assert_eq!(config.tables[0].role, TableRole::Fact);
    assert_eq!(config.tables[1].role, TableRole::Dimension);
    assert_eq!(config.schema().column_type("store"), ColumnType::Integer);
    assert!(config.validate().is_ok());
}

#[test]
fn test_yaml_and_toml_files_round_trip() {
    let dir = tempdir().unwrap();
    let config = PipelineConfig::parse_yaml(YAML).unwrap();

    for name in ["pipeline.yaml", "pipeline.yml", CONFIG_FILENAME] {
        let path = dir.path().join(name);
        config.save(&path).unwrap();
        let loaded = PipelineConfig::load(&path).unwrap();
        assert_eq!(loaded.tables, config.tables, "{}", name);
        assert_eq!(loaded.columns, config.columns, "{}", name);
        assert_eq!(loaded.source.delimiter, '|', "{}", name);
    }
}

#[test]
fn test_absent_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let config = PipelineConfig::load(&dir.path().join(CONFIG_FILENAME)).unwrap();
    assert_eq!(config.tables, PipelineConfig::default().tables);
}

#[test]
fn test_overrides_from_lookup() {
    let mut config = PipelineConfig::parse_yaml(YAML).unwrap();
    config.apply_overrides(|key| match key {
        ENV_BATCH_SIZE => Some("7".to_string()),
        ENV_OUTPUT_DIR => Some("/tmp/star".to_string()),
        _ => None,
    });
    assert_eq!(config.source.batch_size, 7);
    assert_eq!(config.output.directory, PathBuf::from("/tmp/star"));
    assert_eq!(config.output.format, OutputFormat::Ndjson);
}

#[test]
fn test_malformed_config() {
    let result = PipelineConfig::parse_toml("[source]\nbatch_size = \"many\"\n");
    assert!(matches!(result, Err(StarError::Config(_))));
}

#[test]
fn test_invalid_specs_are_reported() {
    let toml = r#"
[[tables]]
name = "sale"
role = "fact"
key = "invoice"
columns = ["invoice"]

[[tables]]
name = "refund"
role = "fact"
key = "invoice"
columns = ["invoice"]
"#;
    let config = PipelineConfig::parse_toml(toml).unwrap();
    assert!(matches!(
        config.validate(),
        Err(StarError::InvalidSpec(SpecValidationError::MultipleFactTables(_)))
    ));
}

#[test]
fn test_sample_config_matches_defaults() {
    let config = PipelineConfig::parse_toml(sample_config()).unwrap();
    let defaults = PipelineConfig::default();
    assert_eq!(config.tables, defaults.tables);
    assert_eq!(config.source, defaults.source);
    assert_eq!(config.output, defaults.output);
    for (field, ty) in &config.columns {
        assert_eq!(defaults.columns.get(field), Some(ty), "{}", field);
    }
}
