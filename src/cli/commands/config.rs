//! Config command implementations

use std::path::{Path, PathBuf};

use crate::cli::error::CliError;
use crate::config::{PipelineConfig, sample_config};

/// Arguments for `config init`
#[derive(Debug, Clone)]
pub struct ConfigInitArgs {
    pub path: PathBuf,
    /// Overwrite an existing file
    pub force: bool,
}

/// Write the sample configuration
pub fn handle_config_init(args: &ConfigInitArgs) -> Result<(), CliError> {
    if args.path.exists() && !args.force {
        return Err(CliError::AlreadyExists(args.path.clone()));
    }

    std::fs::write(&args.path, sample_config())
        .map_err(|e| CliError::FileWriteError(args.path.clone(), e.to_string()))?;

    println!("Wrote sample configuration: {}", args.path.display());
    Ok(())
}

/// Load and validate a configuration file
pub fn handle_config_validate(path: &Path) -> Result<(), CliError> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }

    let config = PipelineConfig::load(path)?;
    config.validate()?;

    println!("Configuration is valid: {}", path.display());
    for table in &config.tables {
        println!(
            "  {} ({}, key '{}', {} columns)",
            table.name,
            table.role,
            table.key,
            table.columns.len()
        );
    }
    Ok(())
}
