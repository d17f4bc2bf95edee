//! Error types.
//!
//! Three families of error exist:
//!
//! - [`StructuredError`]: a user-facing failure (bad arguments, unknown
//!   command, unreadable response file) carrying a stable code, localized
//!   message, ordered attributes, an optional suggested action, an optional
//!   cause and any further errors found in the same phase.
//! - [`InvalidArgument`]: a programmer error, such as building a tree with
//!   two commands of the same name or asking a context for a parameter the
//!   command never declared.
//! - [`ConversionError`]: a value converter rejected its input. The parser
//!   wraps these into `parameter-unparseable-value` structured errors.

use std::error::Error as StdError;
use std::fmt::Write as _;

use thiserror::Error;

use crate::strings::{Localization, keys};

/// Boxed error type returned by command actions.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Stable error codes carried by [`StructuredError`].
pub mod codes {
    /// A response file could not be read.
    pub const IO: &str = "io";
    /// The resolver could not find a name at some level of the tree.
    pub const COMMAND_NONEXISTENT: &str = "command-nonexistent";
    /// A path named a command before the full path was consumed.
    pub const COMMAND_PATH_ERROR: &str = "command-path-error";
    /// Two named declarations share a name or alternative.
    pub const PARAMETER_DUPLICATE: &str = "parameter-duplicate";
    /// No converter is registered for a declared type.
    pub const PARAMETER_NO_VALUE_CONVERTER: &str = "parameter-no-value-converter";
    /// A named parameter was the last token.
    pub const PARAMETER_MISSING_VALUE: &str = "parameter-missing-value";
    /// A converter rejected a provided value.
    pub const PARAMETER_UNPARSEABLE_VALUE: &str = "parameter-unparseable-value";
    /// Minimum or maximum cardinality was violated.
    pub const PARAMETER_CARDINALITY: &str = "parameter-cardinality";
    /// The wrong number of positional arguments was provided.
    pub const PARAMETER_POSITIONAL_COUNT: &str = "parameter-positional-count";
    /// Raised by converters themselves.
    pub const PARAMETER_VALUE_UNPARSEABLE: &str = "parameter-value-unparseable";
}

/// A user-facing error with a stable code and ordered attributes.
///
/// # Examples
///
/// ```
/// use cmdtree_core::StructuredError;
///
/// let error = StructuredError::new("io", "Failed to read an argument file.")
///     .with_attribute("file", "/tmp/args.txt");
///
/// assert_eq!(error.code(), "io");
/// assert_eq!(error.attribute("file"), Some("/tmp/args.txt"));
/// assert_eq!(error.to_string(), "Failed to read an argument file.");
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StructuredError {
    code: String,
    message: String,
    attributes: Vec<(String, String)>,
    remediation: Option<String>,
    #[source]
    cause: Option<BoxError>,
    extra_errors: Vec<StructuredError>,
}

impl StructuredError {
    /// Creates an error with no attributes.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            attributes: Vec::new(),
            remediation: None,
            cause: None,
            extra_errors: Vec::new(),
        }
    }

    /// Appends an attribute. Attribute order is preserved.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Sets the suggested remediating action.
    pub fn with_remediation(mut self, action: impl Into<String>) -> Self {
        self.remediation = Some(action.into());
        self
    }

    /// Attaches the underlying cause.
    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Replaces the list of extra errors.
    pub fn with_extra_errors(mut self, extra: Vec<StructuredError>) -> Self {
        self.extra_errors = extra;
        self
    }

    /// Turns an accumulated list into a single error: the first becomes the
    /// principal error and the rest are attached as extra errors. Returns
    /// `Ok(())` for an empty list.
    pub(crate) fn raise_first(mut errors: Vec<StructuredError>) -> Result<(), StructuredError> {
        if errors.is_empty() {
            return Ok(());
        }
        let first = errors.remove(0);
        Err(first.with_extra_errors(errors))
    }

    /// The short symbolic code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The localized message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Attributes in insertion order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Looks up the first attribute with the given (localized) name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// The suggested remediating action, if any.
    pub fn remediation(&self) -> Option<&str> {
        self.remediation.as_deref()
    }

    /// The underlying cause, if any.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Further errors discovered in the same phase.
    pub fn extra_errors(&self) -> &[StructuredError] {
        &self.extra_errors
    }
}

/// Formats `error` as its message followed by one `  name<padding>: value`
/// line per attribute.
///
/// The attribute table is sorted by name and includes the error code and
/// suggested action. Extra errors are not included; format them
/// individually.
pub fn format_error(localization: &Localization, error: &StructuredError) -> String {
    let mut table: Vec<(String, String)> = error.attributes.clone();
    table.push((
        localization.localize_key(keys::ATTR_ERROR_CODE),
        error.code.clone(),
    ));
    if let Some(action) = &error.remediation {
        table.push((
            localization.localize_key(keys::ATTR_SUGGESTED_ACTION),
            action.clone(),
        ));
    }
    table.sort_by(|a, b| a.0.cmp(&b.0));

    let width = table
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0)
        + 1;

    let mut text = String::with_capacity(table.len() * 32 + error.message.len());
    text.push_str(&error.message);
    text.push('\n');
    for (name, value) in &table {
        let pad = width - name.chars().count();
        let _ = writeln!(text, "  {name}{}: {value}", " ".repeat(pad));
    }
    text
}

/// Programmer errors: misuse of the library API rather than bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidArgument {
    /// A command, group or parameter name failed validation.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName {
        /// The rejected text.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A command with this name already exists at this level of the tree.
    #[error("a command exists with the name {0}")]
    DuplicateCommand(String),

    /// A command group with this name already exists at this level.
    #[error("a command group exists with the name {0}")]
    DuplicateGroup(String),

    /// A parameter lists the same alternative name twice, or lists its own
    /// primary name as an alternative.
    #[error("parameter {parameter} repeats the name {alternative}")]
    DuplicateAlternative {
        /// Primary name of the parameter.
        parameter: String,
        /// The repeated name.
        alternative: String,
    },

    /// The context holds no values for this named parameter.
    #[error("no such parameter '{0}'")]
    NoSuchParameter(String),

    /// The command does not declare this typed positional parameter.
    #[error("no such typed positional parameter '{0}'")]
    NoSuchPositional(String),

    /// A stored value did not have the type the declaration promised.
    #[error("parameter '{parameter}' does not hold values of type {expected}")]
    TypeMismatch {
        /// Parameter name.
        parameter: String,
        /// Type name the caller asked for.
        expected: &'static str,
    },

    /// An enumeration with no variants cannot provide an example value.
    #[error("enumeration {0} has no variants")]
    EmptyEnumeration(&'static str),
}

/// A value converter could not parse its input.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// Integer parse failure.
    #[error(transparent)]
    Integer(#[from] std::num::ParseIntError),

    /// Floating-point parse failure.
    #[error(transparent)]
    Float(#[from] std::num::ParseFloatError),

    /// Large-integer parse failure.
    #[error(transparent)]
    BigInteger(#[from] num_bigint::ParseBigIntError),

    /// Large-decimal parse failure.
    #[error(transparent)]
    BigDecimal(#[from] bigdecimal::ParseBigDecimalError),

    /// Date-time parse failure.
    #[error(transparent)]
    DateTime(#[from] chrono::ParseError),

    /// UUID parse failure.
    #[error(transparent)]
    Uuid(#[from] uuid::Error),

    /// URI or host parse failure.
    #[error(transparent)]
    Url(#[from] url::ParseError),

    /// Regular expression compile failure.
    #[error(transparent)]
    Regex(#[from] regex::Error),

    /// Input was neither `true` nor `false`.
    #[error("expected 'true' or 'false', got {0:?}")]
    Boolean(String),

    /// Input was not an ISO-8601 duration, or was out of range.
    #[error("invalid duration {input:?}: {reason}")]
    Duration {
        /// The rejected text.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Input named no variant of the enumeration.
    #[error("{input:?} is not one of {expected}")]
    Enumeration {
        /// The rejected text.
        input: String,
        /// The accepted variant names.
        expected: String,
    },

    /// Converter-specific failure.
    #[error("{0}")]
    Other(String),
}

impl ConversionError {
    /// All conversion failures share one code.
    pub fn code(&self) -> &'static str {
        codes::PARAMETER_VALUE_UNPARSEABLE
    }
}
