//! CLI binary entry point for star-schema

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use star_schema::cli::commands::config::{
    ConfigInitArgs, handle_config_init, handle_config_validate,
};
#[cfg(feature = "cli")]
use star_schema::cli::commands::decompose::{DecomposeArgs, handle_decompose};
#[cfg(feature = "cli")]
use star_schema::cli::logging::{LogLevel, init_logging};
#[cfg(feature = "cli")]
use star_schema::config::CONFIG_FILENAME;
#[cfg(feature = "cli")]
use star_schema::export::OutputFormat;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "star-schema")]
#[command(about = "Decompose a flat transactional export into a star schema")]
#[command(version)]
struct Cli {
    /// Log verbosity (logs go to stderr)
    #[arg(long, value_enum, global = true, default_value = "info")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Split an export into deduplicated fact and dimension tables
    Decompose {
        /// Input file (delimited, with header)
        input: PathBuf,
        /// Configuration file (default: ./.star-schema.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Rows per chunk
        #[arg(short, long)]
        batch_size: Option<usize>,
        /// Directory the tables are written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// Output file format
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
        /// Disable the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum ConfigCommands {
    /// Write a sample configuration file
    Init {
        /// Destination path
        #[arg(default_value = CONFIG_FILENAME)]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Check a configuration file
    Validate {
        /// Configuration file path
        #[arg(default_value = CONFIG_FILENAME)]
        path: PathBuf,
    },
}

#[cfg(feature = "cli")]
#[derive(clap::ValueEnum, Clone, Debug)]
enum FormatArg {
    Csv,
    Ndjson,
}

#[cfg(feature = "cli")]
fn convert_format(format: FormatArg) -> OutputFormat {
    match format {
        FormatArg::Csv => OutputFormat::Csv,
        FormatArg::Ndjson => OutputFormat::Ndjson,
    }
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_level) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Decompose {
            input,
            config,
            batch_size,
            output_dir,
            format,
            no_progress,
        } => {
            let args = DecomposeArgs {
                input,
                config,
                batch_size,
                output_dir,
                format: format.map(convert_format),
                progress: !no_progress,
            };
            handle_decompose(&args)
        }

        Commands::Config { command } => match command {
            ConfigCommands::Init { path, force } => {
                handle_config_init(&ConfigInitArgs { path, force })
            }
            ConfigCommands::Validate { path } => handle_config_validate(&path),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature is not enabled. Build with --features cli");
    std::process::exit(1);
}
