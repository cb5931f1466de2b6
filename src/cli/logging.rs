//! Logging initialization

use tracing::Level;
use tracing_subscriber::fmt;

use super::error::CliError;

/// Log verbosity selectable on the command line
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Install a stderr subscriber at `level`, keeping stdout for the run summary
pub fn init_logging(level: LogLevel) -> Result<(), CliError> {
    fmt::Subscriber::builder()
        .with_max_level(Level::from(level))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| CliError::LoggingError(e.to_string()))
}
