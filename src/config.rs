//! Pipeline configuration file support
//!
//! Handles parsing of `.star-schema.toml` (or YAML) configuration files and
//! environment variable overrides.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StarError};
use crate::export::OutputFormat;
use crate::ingest::SourceOptions;
use crate::models::ColumnType;
use crate::schema::{StarSchemaSpec, TargetTableSpec, iowa_column_types};

/// Default configuration filename
pub const CONFIG_FILENAME: &str = ".star-schema.toml";

/// Default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "data";

/// Environment variable for the batch size
pub const ENV_BATCH_SIZE: &str = "STAR_SCHEMA_BATCH_SIZE";

/// Environment variable for the output directory
pub const ENV_OUTPUT_DIR: &str = "STAR_SCHEMA_OUTPUT_DIR";

/// Environment variable for the output format
pub const ENV_OUTPUT_FORMAT: &str = "STAR_SCHEMA_OUTPUT_FORMAT";

/// Output configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSection {
    /// Directory the table files are written to
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,

    /// File format of the table files
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            format: OutputFormat::default(),
        }
    }
}

/// Main configuration structure
///
/// Represents the `.star-schema.toml` configuration file format. A file
/// without any `[[tables]]` gets the Iowa liquor sales tables, and with them
/// the Iowa column types unless `[columns]` is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Input reading options
    #[serde(default)]
    pub source: SourceOptions,

    /// Output options
    #[serde(default)]
    pub output: OutputSection,

    /// Target tables, in output order
    #[serde(default)]
    pub tables: Vec<TargetTableSpec>,

    /// Declared type per source field
    #[serde(default)]
    pub columns: BTreeMap<String, ColumnType>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let schema = StarSchemaSpec::iowa_liquor_sales();
        Self {
            source: SourceOptions::default(),
            output: OutputSection::default(),
            tables: schema.tables,
            columns: schema.column_types,
        }
    }
}

impl PipelineConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration running `schema` with default source and output options
    pub fn with_schema(schema: StarSchemaSpec) -> Self {
        Self {
            tables: schema.tables,
            columns: schema.column_types,
            ..Default::default()
        }
    }

    /// Load configuration from a file
    ///
    /// `.yaml`/`.yml` files are read as YAML, anything else as TOML.
    /// Falls back to defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                StarError::Config(format!("Failed to read {}: {}", path.display(), e))
            })?;

            if is_yaml(path) {
                Self::parse_yaml(&content)?
            } else {
                Self::parse_toml(&content)?
            }
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Self::default()
        };

        // Apply environment variable overrides
        config.apply_env_overrides();

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map(Self::fill_defaults)
            .map_err(|e| StarError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Parse configuration from YAML string
    pub fn parse_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str::<Self>(content)
            .map(Self::fill_defaults)
            .map_err(|e| StarError::Config(format!("Failed to parse config: {}", e)))
    }

    fn fill_defaults(mut self) -> Self {
        if self.tables.is_empty() {
            self.tables = StarSchemaSpec::iowa_liquor_sales().tables;
            if self.columns.is_empty() {
                self.columns = iowa_column_types();
            }
        }
        self
    }

    /// Save configuration to a file, as YAML or TOML by extension
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_yaml(path) {
            self.to_yaml()?
        } else {
            self.to_toml()?
        };

        std::fs::write(path, content).map_err(|e| {
            StarError::Config(format!("Failed to write {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| StarError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Convert configuration to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| StarError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any variable lookup. Unparseable values are
    /// ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(size) = lookup(ENV_BATCH_SIZE) {
            match size.parse() {
                Ok(size) => self.source.batch_size = size,
                Err(_) => tracing::warn!("Ignoring {}={}: not a number", ENV_BATCH_SIZE, size),
            }
        }

        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.output.directory = PathBuf::from(dir);
        }

        if let Some(format) = lookup(ENV_OUTPUT_FORMAT) {
            match format.parse() {
                Ok(format) => self.output.format = format,
                Err(e) => tracing::warn!("Ignoring {}: {}", ENV_OUTPUT_FORMAT, e),
            }
        }
    }

    /// The star schema this configuration describes
    pub fn schema(&self) -> StarSchemaSpec {
        StarSchemaSpec::new(self.tables.clone(), self.columns.clone())
    }

    /// Check table specs and source options before a run
    pub fn validate(&self) -> Result<()> {
        if self.source.batch_size == 0 {
            return Err(StarError::Config(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        if !self.source.delimiter.is_ascii() {
            return Err(StarError::Config(format!(
                "delimiter must be a single ASCII character, got '{}'",
                self.source.delimiter
            )));
        }
        self.schema().validate()?;
        Ok(())
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Generate a sample configuration file content
pub fn sample_config() -> &'static str {
    r#"# Star schema decomposition configuration

[source]
# Maximum number of rows per chunk
batch_size = 10000
delimiter = ","
has_headers = true

[output]
# Tables are written to <directory>/<table>.<format>
directory = "data"
# "csv" (default) or "ndjson"
format = "csv"

# Each table projects some source columns and is deduplicated on `key`,
# keeping the first row seen for every key value.
[[tables]]
name = "transaction"
role = "fact"
key = "Invoice/Item Number"
columns = ["Invoice/Item Number", "Date", "Store Number", "Category", "Vendor Number", "Item Number", "Bottles Sold"]

[[tables]]
name = "store"
key = "Store Number"
columns = ["Store Number", "Address", "City", "Zip Code", "County Number"]

[[tables]]
name = "county"
key = "County Number"
columns = ["County Number", "County"]

[[tables]]
name = "category"
key = "Category"
columns = ["Category", "Category Name"]

[[tables]]
name = "vendor"
key = "Vendor Number"
columns = ["Vendor Number", "Vendor Name"]

[[tables]]
name = "item"
key = "Item Number"
columns = ["Item Number", "Item Description", "Pack", "Bottle Volume (ml)", "State Bottle Cost", "State Bottle Retail"]

# Source column types: text (default), integer, float or date
[columns]
"Invoice/Item Number" = "text"
"Date" = "date"
"Store Number" = "float"
"County Number" = "float"
"Category" = "float"
"Vendor Number" = "float"
"Item Number" = "float"
"Pack" = "integer"
"Bottle Volume (ml)" = "float"
"Bottles Sold" = "integer"
"#
}
