//! Target table spec validation
//!
//! Checks the static table configuration before any data is read: table
//! names, projected columns and the key invariant.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::TargetTableSpec;

/// Maximum length for table names
pub const MAX_TABLE_NAME_LENGTH: usize = 255;

/// Errors found while validating target table specs
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SpecValidationError {
    #[error("at least one target table is required")]
    NoTables,

    #[error("table name cannot be empty")]
    EmptyTableName,

    #[error("table name exceeds maximum length (max: {max}, got: {actual})")]
    TableNameTooLong { max: usize, actual: usize },

    #[error("table name '{name}' contains invalid characters: {reason}")]
    InvalidTableName { name: String, reason: String },

    #[error("duplicate table name '{0}'")]
    DuplicateTable(String),

    #[error("table '{table}' projects no columns")]
    EmptyColumns { table: String },

    #[error("table '{table}' lists column '{column}' more than once")]
    DuplicateColumn { table: String, column: String },

    #[error("key '{key}' of table '{table}' is not one of its projected columns")]
    KeyNotProjected { table: String, key: String },

    #[error("only one fact table is allowed, found: {}", .0.join(", "))]
    MultipleFactTables(Vec<String>),
}

/// Validator for target table specs
#[derive(Default)]
pub struct SpecValidator;

impl SpecValidator {
    /// Create a new spec validator
    ///
    /// # Example
    ///
    /// ```rust
    /// use star_schema::schema::StarSchemaSpec;
    /// use star_schema::validation::SpecValidator;
    ///
    /// let validator = SpecValidator::new();
    /// assert!(validator.validate(&StarSchemaSpec::default().tables).is_ok());
    /// ```
    pub fn new() -> Self {
        Self
    }

    /// Validate a full set of specs, stopping at the first problem
    pub fn validate(&self, specs: &[TargetTableSpec]) -> Result<(), SpecValidationError> {
        if specs.is_empty() {
            return Err(SpecValidationError::NoTables);
        }

        let mut names = HashSet::new();
        for spec in specs {
            self.validate_spec(spec)?;
            if !names.insert(spec.name.as_str()) {
                return Err(SpecValidationError::DuplicateTable(spec.name.clone()));
            }
        }

        let facts: Vec<String> = specs
            .iter()
            .filter(|s| s.is_fact())
            .map(|s| s.name.clone())
            .collect();
        if facts.len() > 1 {
            return Err(SpecValidationError::MultipleFactTables(facts));
        }

        Ok(())
    }

    /// Validate one spec in isolation
    pub fn validate_spec(&self, spec: &TargetTableSpec) -> Result<(), SpecValidationError> {
        validate_table_name(&spec.name)?;

        if spec.columns.is_empty() {
            return Err(SpecValidationError::EmptyColumns {
                table: spec.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        for column in &spec.columns {
            if !seen.insert(column.as_str()) {
                return Err(SpecValidationError::DuplicateColumn {
                    table: spec.name.clone(),
                    column: column.clone(),
                });
            }
        }

        if spec.key_index().is_none() {
            return Err(SpecValidationError::KeyNotProjected {
                table: spec.name.clone(),
                key: spec.key.clone(),
            });
        }

        Ok(())
    }
}

/// Validate a table name.
///
/// Table names become output file names, so they must start with a letter or
/// underscore and may only contain letters, digits, underscores and hyphens.
///
/// # Examples
///
/// ```
/// use star_schema::validation::validate_table_name;
///
/// assert!(validate_table_name("store").is_ok());
/// assert!(validate_table_name("../etc").is_err());
/// assert!(validate_table_name("").is_err());
/// ```
pub fn validate_table_name(name: &str) -> Result<(), SpecValidationError> {
    let Some(first_char) = name.chars().next() else {
        return Err(SpecValidationError::EmptyTableName);
    };

    if name.len() > MAX_TABLE_NAME_LENGTH {
        return Err(SpecValidationError::TableNameTooLong {
            max: MAX_TABLE_NAME_LENGTH,
            actual: name.len(),
        });
    }

    if !first_char.is_alphabetic() && first_char != '_' {
        return Err(SpecValidationError::InvalidTableName {
            name: name.to_string(),
            reason: "must start with a letter or underscore".to_string(),
        });
    }

    if let Some(c) = name
        .chars()
        .find(|c| !c.is_alphanumeric() && *c != '_' && *c != '-')
    {
        return Err(SpecValidationError::InvalidTableName {
            name: name.to_string(),
            reason: format!("invalid character: '{}'", c),
        });
    }

    Ok(())
}
