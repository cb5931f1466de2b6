//! Decompose command implementation

use std::path::{Path, PathBuf};

use crate::cli::error::CliError;
use crate::cli::progress::{ProgressReporter, format_number};
use crate::config::{CONFIG_FILENAME, PipelineConfig};
use crate::export::{OutputFormat, sink_for, write_schema};
use crate::ingest::ChunkSource;
use crate::pipeline::{StarPipeline, StarSchema};

/// Arguments for the decompose command
#[derive(Debug, Clone)]
pub struct DecomposeArgs {
    /// Raw delimited export
    pub input: PathBuf,
    /// Config file; `.star-schema.toml` in the working directory when absent
    pub config: Option<PathBuf>,
    pub batch_size: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub progress: bool,
}

/// Load the config and apply command-line overrides on top of it
fn resolve_config(args: &DecomposeArgs) -> Result<PipelineConfig, CliError> {
    let path = args
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
    if args.config.is_some() && !path.exists() {
        return Err(CliError::FileNotFound(path));
    }

    let mut config = PipelineConfig::load(&path)?;
    if let Some(batch_size) = args.batch_size {
        config.source.batch_size = batch_size;
    }
    if let Some(dir) = &args.output_dir {
        config.output.directory = dir.clone();
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }

    config.validate()?;
    Ok(config)
}

fn run(config: &PipelineConfig, input: &Path, progress: bool) -> Result<StarSchema, CliError> {
    let schema = config.schema();
    let total_bytes = std::fs::metadata(input).map(|m| m.len()).unwrap_or(0);
    let source = ChunkSource::open(input, &schema, &config.source)?;

    tracing::info!(
        "Decomposing {} into {} tables (batch size {})",
        input.display(),
        schema.tables.len(),
        config.source.batch_size
    );

    let reporter = ProgressReporter::new(progress, total_bytes);
    let mut pipeline = StarPipeline::new(&schema)?;
    let result = pipeline
        .run_source_with(source, |stats| reporter.update(stats))
        .and_then(|()| pipeline.finish());

    match result {
        Ok(star) => {
            reporter.finish(&star.stats);
            Ok(star)
        }
        Err(e) => {
            reporter.abandon();
            Err(e.into())
        }
    }
}

fn print_summary(star: &StarSchema, config: &PipelineConfig) {
    println!(
        "Read {} rows ({} skipped) in {} ({:.0} rows/s)",
        format_number(star.stats.records_read as u64),
        format_number(star.stats.records_skipped as u64),
        star.stats.duration_string(),
        star.stats.throughput()
    );
    for table in star.iter() {
        let fingerprint = table.fingerprint();
        println!(
            "  {:<12} {:>12} records  {}",
            table.name(),
            format_number(table.len() as u64),
            &fingerprint[..12]
        );
    }
    println!(
        "Wrote {} tables to {} ({})",
        star.tables.len(),
        config.output.directory.display(),
        config.output.format
    );
}

/// Handle the decompose command
pub fn handle_decompose(args: &DecomposeArgs) -> Result<(), CliError> {
    if !args.input.exists() {
        return Err(CliError::FileNotFound(args.input.clone()));
    }

    let config = resolve_config(args)?;
    let star = run(&config, &args.input, args.progress)?;

    let mut sink = sink_for(config.output.format, &config.output.directory);
    write_schema(sink.as_mut(), &star)?;

    print_summary(&star, &config);
    Ok(())
}
