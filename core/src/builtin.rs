//! Commands every application carries: `help`, `version`, and the usage
//! summary shown when no command is given.

use std::io::Write;

use crate::command::{ApplicationMetadata, Command, CommandMetadata, CommandStatus};
use crate::context::CommandContext;
use crate::error::{BoxError, StructuredError, codes};
use crate::help::{help_format_application, help_format_command, help_format_group};
use crate::parameter::PositionalParameters;
use crate::resolve::{Resolution, resolve};
use crate::strings::{Localization, StringRef, keys};

/// `help [path ...]`: shows help for a command or group, or for itself when
/// no path is given.
#[derive(Debug, Clone)]
pub struct HelpCommand {
    metadata: CommandMetadata,
    application_name: String,
}

impl HelpCommand {
    /// Creates the help command for the named application.
    pub fn new(application_name: impl Into<String>) -> Self {
        Self {
            metadata: CommandMetadata::builtin(
                "help",
                StringRef::key(keys::HELP_COMMAND_DESCRIPTION),
                Some(StringRef::key(keys::HELP_COMMAND_DESCRIPTION_LONG)),
            ),
            application_name: application_name.into(),
        }
    }
}

impl Command for HelpCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn positional_parameters(&self) -> PositionalParameters {
        PositionalParameters::Any
    }

    fn execute(&self, context: &CommandContext) -> Result<CommandStatus, BoxError> {
        let raw = context.parameters_positional_raw();
        let converters = context.value_converters();
        let localization = context.localization();
        let mut output = context.output();

        match resolve(context.command_tree(), raw) {
            Resolution::Root => {
                let path = [self.metadata.name().to_string()];
                help_format_command(converters, localization, &self.application_name, &mut output, self, &path)?;
            }
            Resolution::NotFound { path, .. } => {
                return Err(command_nonexistent(localization, &path).into());
            }
            Resolution::Command {
                command,
                path,
                remaining,
            } => {
                if !remaining.is_empty() {
                    return Err(command_path_error(localization, &path, raw).into());
                }
                help_format_command(
                    converters,
                    localization,
                    &self.application_name,
                    &mut output,
                    &**command,
                    &path,
                )?;
            }
            Resolution::Group { group, path } => {
                help_format_group(converters, localization, &self.application_name, &mut output, group, &path)?;
            }
        }
        Ok(CommandStatus::Success)
    }
}

/// `version`: prints `{id} {version} {build}`.
#[derive(Debug, Clone)]
pub struct VersionCommand {
    metadata: CommandMetadata,
    application: ApplicationMetadata,
}

impl VersionCommand {
    /// Creates the version command for `application`.
    pub fn new(application: ApplicationMetadata) -> Self {
        Self {
            metadata: CommandMetadata::builtin(
                "version",
                StringRef::key(keys::VERSION_COMMAND_DESCRIPTION),
                Some(StringRef::key(keys::VERSION_COMMAND_DESCRIPTION_LONG)),
            ),
            application,
        }
    }
}

impl Command for VersionCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn execute(&self, context: &CommandContext) -> Result<CommandStatus, BoxError> {
        let mut output = context.output();
        writeln!(
            output,
            "{} {} {}",
            self.application.application_id, self.application.version, self.application.build
        )?;
        output.flush()?;
        Ok(CommandStatus::Success)
    }
}

/// Runs when the command line is empty. Never part of the command tree.
#[derive(Debug, Clone)]
pub(crate) struct ApplicationUsage {
    metadata: CommandMetadata,
    application: ApplicationMetadata,
}

impl ApplicationUsage {
    pub(crate) fn new(application: ApplicationMetadata) -> Self {
        Self {
            metadata: CommandMetadata::builtin("application", StringRef::constant(""), None),
            application,
        }
    }
}

impl Command for ApplicationUsage {
    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn positional_parameters(&self) -> PositionalParameters {
        PositionalParameters::Any
    }

    fn execute(&self, context: &CommandContext) -> Result<CommandStatus, BoxError> {
        let mut output = context.output();
        help_format_application(context.localization(), &self.application, context.command_tree(), &mut output)?;
        Ok(CommandStatus::Success)
    }
}

pub(crate) fn command_nonexistent(localization: &Localization, path: &[String]) -> StructuredError {
    StructuredError::new(
        codes::COMMAND_NONEXISTENT,
        localization.localize_key(keys::ERROR_COMMAND_NONEXISTENT),
    )
    .with_attribute(localization.localize_key(keys::ATTR_COMMAND), path.join(" "))
    .with_remediation(localization.localize_key(keys::SUGGEST_HELP_COMMANDS))
}

fn command_path_error(localization: &Localization, consumed: &[String], full: &[String]) -> StructuredError {
    StructuredError::new(
        codes::COMMAND_PATH_ERROR,
        localization.localize_key(keys::ERROR_COMMAND_PATH),
    )
    .with_attribute(localization.localize_key(keys::ATTR_COMMAND), consumed.join(" "))
    .with_attribute(localization.localize_key(keys::ATTR_PATH), full.join(" "))
    .with_remediation(localization.localize_key(keys::SUGGEST_HELP_COMMANDS))
}
