//! Commands and their metadata.

use std::process::ExitCode;

use url::Url;

use crate::context::CommandContext;
use crate::error::{BoxError, InvalidArgument};
use crate::names::Name;
use crate::parameter::{NamedParameter, PositionalParameters};
use crate::strings::StringRef;

/// Name and descriptions of a command or group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMetadata {
    name: Name,
    short_description: StringRef,
    long_description: Option<StringRef>,
}

impl CommandMetadata {
    /// Creates metadata with no long description.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::InvalidName`] if `name` is not a valid
    /// name.
    pub fn new(name: &str, short_description: impl Into<StringRef>) -> Result<Self, InvalidArgument> {
        Ok(Self {
            name: Name::new(name)?,
            short_description: short_description.into(),
            long_description: None,
        })
    }

    /// Metadata for a command this crate provides.
    pub(crate) fn builtin(name: &'static str, short: StringRef, long: Option<StringRef>) -> Self {
        Self {
            name: Name::builtin(name),
            short_description: short,
            long_description: long,
        }
    }

    /// Sets the long description.
    pub fn with_long_description(mut self, text: impl Into<StringRef>) -> Self {
        self.long_description = Some(text.into());
        self
    }

    /// The name.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The one-line description shown in listings.
    pub fn short_description(&self) -> &StringRef {
        &self.short_description
    }

    /// The long description shown in detailed help.
    pub fn long_description(&self) -> Option<&StringRef> {
        self.long_description.as_ref()
    }
}

/// Result of executing a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// Exit code 0.
    Success,
    /// Exit code 1.
    Failure,
}

impl CommandStatus {
    /// The process exit code.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
        }
    }
}

impl From<CommandStatus> for ExitCode {
    fn from(status: CommandStatus) -> Self {
        match status {
            CommandStatus::Success => ExitCode::SUCCESS,
            CommandStatus::Failure => ExitCode::FAILURE,
        }
    }
}

/// A terminal node of the command tree.
///
/// Declarations returned by [`named_parameters`](Self::named_parameters)
/// and [`positional_parameters`](Self::positional_parameters) should be
/// clones of declarations the command keeps, so that
/// [`execute`](Self::execute) can read their values back from the context.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{
///     BoxError, Command, CommandContext, CommandMetadata, CommandStatus, Named1,
///     NamedDeclaration, NamedParameter,
/// };
/// use std::io::Write;
///
/// struct Greet {
///     metadata: CommandMetadata,
///     name: Named1<String>,
/// }
///
/// impl Command for Greet {
///     fn metadata(&self) -> &CommandMetadata {
///         &self.metadata
///     }
///
///     fn named_parameters(&self) -> Vec<NamedParameter> {
///         vec![self.name.parameter().clone()]
///     }
///
///     fn execute(&self, context: &CommandContext) -> Result<CommandStatus, BoxError> {
///         let name = context.parameter_value(&self.name)?;
///         writeln!(context.output(), "Hello, {name}!")?;
///         Ok(CommandStatus::Success)
///     }
/// }
/// ```
pub trait Command: Send + Sync {
    /// Name and descriptions.
    fn metadata(&self) -> &CommandMetadata;

    /// Named parameter declarations. Empty by default.
    fn named_parameters(&self) -> Vec<NamedParameter> {
        Vec::new()
    }

    /// Positional parameter declarations. None by default.
    fn positional_parameters(&self) -> PositionalParameters {
        PositionalParameters::None
    }

    /// Runs the command against a parsed context.
    ///
    /// # Errors
    ///
    /// Any error; [`Application::run`](crate::Application::run) logs it
    /// and reports failure.
    fn execute(&self, context: &CommandContext) -> Result<CommandStatus, BoxError>;

    /// Hidden commands resolve normally but are omitted from listings.
    fn is_hidden(&self) -> bool {
        false
    }
}

/// Application-wide metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationMetadata {
    /// Short name, as typed on the command line.
    pub application_name: String,
    /// Identifier, e.g. `com.example.tool`.
    pub application_id: String,
    /// Version string.
    pub version: String,
    /// Build identifier, e.g. a commit hash.
    pub build: String,
    /// One-line title.
    pub title: String,
    /// Documentation site.
    pub site: Option<Url>,
}

impl ApplicationMetadata {
    /// Creates metadata with no site.
    pub fn new(
        application_name: impl Into<String>,
        application_id: impl Into<String>,
        version: impl Into<String>,
        build: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            application_name: application_name.into(),
            application_id: application_id.into(),
            version: version.into(),
            build: build.into(),
            title: title.into(),
            site: None,
        }
    }

    /// Sets the documentation site.
    pub fn with_site(mut self, site: Url) -> Self {
        self.site = Some(site);
        self
    }
}
