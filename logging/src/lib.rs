//! Logging setup for cmdtree applications.
//!
//! Commands that want a `--verbose` switch hold a [`Verbosity`], list its
//! parameters among their own, and call [`Verbosity::configure`] at the
//! start of `execute`. The first call installs a `tracing-subscriber` fmt
//! subscriber writing to stderr; later calls change its level.
//!
//! The application's converter directory must know [`LogLevel`]; see
//! [`register_converters`].
//!
//! # Example
//!
//! ```
//! use cmdtree_core::ConverterDirectory;
//! use cmdtree_logging::{LogLevel, Verbosity, register_converters};
//!
//! let converters = register_converters(&ConverterDirectory::core()).unwrap();
//! assert!(converters.lookup::<LogLevel>().is_some());
//!
//! let verbosity = Verbosity::new().unwrap();
//! assert_eq!(verbosity.parameters()[0].name().as_str(), "--verbose");
//! ```

use std::sync::OnceLock;

use cmdtree_core::{
    CommandContext, ConverterDirectory, EnumConverter, InvalidArgument, Named1, NamedDeclaration,
    NamedParameter,
};
use strum::{AsRefStr, Display, EnumIter};
use thiserror::Error;
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{Registry, fmt, reload};

/// Severity threshold for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        LevelFilter::from_level(level.into())
    }
}

/// Errors raised while configuring logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The verbosity parameter was not part of the parsed command.
    #[error(transparent)]
    Parameter(#[from] InvalidArgument),

    /// Another global subscriber was installed first.
    #[error("failed to install the log subscriber: {0}")]
    Install(String),

    /// The installed subscriber rejected the level change.
    #[error("failed to change the log level: {0}")]
    Reload(String),
}

/// Returns a copy of `directory` that can also convert [`LogLevel`].
///
/// # Errors
///
/// Never fails in practice; the error is that of [`EnumConverter::new`].
pub fn register_converters(directory: &ConverterDirectory) -> Result<ConverterDirectory, InvalidArgument> {
    Ok(directory.with(EnumConverter::<LogLevel>::new()?))
}

/// The `--verbose` parameter, defaulting to `info`.
#[derive(Debug, Clone)]
pub struct Verbosity {
    verbose: Named1<LogLevel>,
}

impl Verbosity {
    /// Creates the declaration.
    ///
    /// # Errors
    ///
    /// Propagates name validation errors.
    pub fn new() -> Result<Self, InvalidArgument> {
        let verbose = Named1::new("--verbose", "Set the logging level of the application.")?
            .with_default(LogLevel::Info);
        Ok(Self { verbose })
    }

    /// The declaration, for commands that read the level themselves.
    pub fn declaration(&self) -> &Named1<LogLevel> {
        &self.verbose
    }

    /// The named parameters to add to a command's own.
    pub fn parameters(&self) -> Vec<NamedParameter> {
        vec![self.verbose.parameter().clone()]
    }

    /// The level selected on the command line.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`] if the command does not declare the
    /// parameter.
    pub fn level(&self, context: &CommandContext) -> Result<LogLevel, InvalidArgument> {
        context.parameter_value(&self.verbose)
    }

    /// Applies the selected level to the global subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError`] if the parameter is undeclared or the
    /// subscriber cannot be installed.
    pub fn configure(&self, context: &CommandContext) -> Result<LogLevel, LoggingError> {
        let level = self.level(context)?;
        install(level)?;
        Ok(level)
    }
}

static HANDLE: OnceLock<Result<reload::Handle<LevelFilter, Registry>, String>> = OnceLock::new();

/// Installs the stderr subscriber at `level`, or changes the level of the
/// one installed earlier. Installation is attempted once per process; its
/// outcome is kept.
///
/// # Errors
///
/// Returns [`LoggingError::Install`] if a different global subscriber was
/// already set when installation was attempted.
pub fn install(level: LogLevel) -> Result<(), LoggingError> {
    let handle = HANDLE
        .get_or_init(|| {
            let (filter, handle) = reload::Layer::new(LevelFilter::from(level));
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init()
                .map_err(|e| e.to_string())?;
            Ok(handle)
        })
        .as_ref()
        .map_err(|e| LoggingError::Install(e.clone()))?;

    handle
        .modify(|filter| *filter = level.into())
        .map_err(|e| LoggingError::Reload(e.to_string()))?;
    tracing::debug!(level = %level, "log level set");
    Ok(())
}
