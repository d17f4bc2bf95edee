//! The application: a built command tree plus the collaborators needed to
//! parse and run a command line.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error};

use crate::builtin::{ApplicationUsage, HelpCommand, VersionCommand, command_nonexistent};
use crate::command::{ApplicationMetadata, Command, CommandMetadata, CommandStatus};
use crate::context::CommandContext;
use crate::directory::ConverterDirectory;
use crate::error::{InvalidArgument, StructuredError, format_error};
use crate::output::Output;
use crate::parameter::PositionalParameters;
use crate::parser::{CommandParser, ParserConfiguration};
use crate::resolve::{Resolution, resolve};
use crate::response_file::expand_arguments;
use crate::strings::{Localization, StringBundle, StringRef, keys};
use crate::tree::{CommandTree, GroupBuilder, TreeBuilder};

/// Builds an [`Application`].
///
/// The builder starts with the `help` and `version` commands in place, the
/// core converter directory, standard output and the built-in English
/// strings.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{ApplicationBuilder, ApplicationMetadata, CommandStatus, Output};
///
/// let output = Output::buffer();
/// let app = ApplicationBuilder::new(ApplicationMetadata::new(
///     "tool",
///     "com.example.tool",
///     "1.0.0",
///     "eb916bb8",
///     "An example tool.",
/// ))
/// .with_output(output.clone())
/// .build();
///
/// let status = app.run(&["version".to_string()]);
/// assert_eq!(status, CommandStatus::Success);
/// assert_eq!(output.contents(), "com.example.tool 1.0.0 eb916bb8\n");
/// ```
pub struct ApplicationBuilder {
    metadata: ApplicationMetadata,
    tree: TreeBuilder,
    converters: ConverterDirectory,
    output: Output,
    internal_strings: StringBundle,
    application_strings: StringBundle,
}

impl ApplicationBuilder {
    /// Creates a builder seeded with `help` and `version`.
    pub fn new(metadata: ApplicationMetadata) -> Self {
        let mut tree = TreeBuilder::new();
        tree.replace_command(Arc::new(VersionCommand::new(metadata.clone())));
        tree.replace_command(Arc::new(HelpCommand::new(metadata.application_name.clone())));
        Self {
            metadata,
            tree,
            converters: ConverterDirectory::core(),
            output: Output::stdout(),
            internal_strings: StringBundle::internal(),
            application_strings: StringBundle::empty(),
        }
    }

    /// Replaces the converter directory.
    pub fn with_value_converters(mut self, converters: ConverterDirectory) -> Self {
        self.converters = converters;
        self
    }

    /// Replaces the output sink.
    pub fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    /// Sets the application's own strings. They take precedence over the
    /// built-in strings.
    pub fn with_application_strings(mut self, strings: StringBundle) -> Self {
        self.application_strings = strings;
        self
    }

    /// Replaces the built-in strings, e.g. with a translation.
    pub fn with_internal_strings(mut self, strings: StringBundle) -> Self {
        self.internal_strings = strings;
        self
    }

    /// Adds a top-level command.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::DuplicateCommand`] or
    /// [`InvalidArgument::DuplicateGroup`] if the name is taken, including by
    /// `help` or `version`.
    pub fn add_command(&mut self, command: impl Command + 'static) -> Result<&mut Self, InvalidArgument> {
        self.tree.add_command(Arc::new(command))?;
        Ok(self)
    }

    /// Adds a top-level group and returns its builder.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::DuplicateCommand`] or
    /// [`InvalidArgument::DuplicateGroup`] if the name is taken.
    pub fn create_command_group(&mut self, metadata: CommandMetadata) -> Result<&mut GroupBuilder, InvalidArgument> {
        self.tree.create_group(metadata)
    }

    /// Builds the application.
    pub fn build(mut self) -> Application {
        self.tree
            .replace_command(Arc::new(HelpCommand::new(self.metadata.application_name.clone())));
        Application {
            metadata: self.metadata,
            tree: Arc::new(self.tree.build()),
            converters: self.converters,
            output: self.output,
            localization: Arc::new(Localization::new(
                self.internal_strings,
                self.application_strings,
            )),
        }
    }
}

/// A built application.
#[derive(Debug, Clone)]
pub struct Application {
    metadata: ApplicationMetadata,
    tree: Arc<CommandTree>,
    converters: ConverterDirectory,
    output: Output,
    localization: Arc<Localization>,
}

impl Application {
    /// Shorthand for [`ApplicationBuilder::new`].
    pub fn builder(metadata: ApplicationMetadata) -> ApplicationBuilder {
        ApplicationBuilder::new(metadata)
    }

    /// The application metadata.
    pub fn metadata(&self) -> &ApplicationMetadata {
        &self.metadata
    }

    /// The command tree, including `help` and `version`.
    pub fn command_tree(&self) -> &CommandTree {
        &self.tree
    }

    /// The converter directory.
    pub fn value_converters(&self) -> &ConverterDirectory {
        &self.converters
    }

    /// The localization built from the internal and application strings.
    pub fn localization(&self) -> &Localization {
        &self.localization
    }

    /// Resolves a string reference.
    pub fn localize(&self, text: &StringRef) -> String {
        self.localization.localize(text)
    }

    /// Expands a leading `@file`, resolves the command and parses its
    /// arguments.
    ///
    /// An empty command line selects the usage summary. A path that ends at
    /// a group selects `help` for that group.
    ///
    /// # Errors
    ///
    /// Returns a [`StructuredError`] if the argument file cannot be read,
    /// the command does not exist, or the arguments do not parse.
    pub fn parse(&self, arguments: &[String]) -> Result<CommandContext, StructuredError> {
        let arguments = expand_arguments(arguments, &self.localization)?;
        let resolution = resolve(&self.tree, &arguments);
        debug!(resolution = ?resolution, "resolved command line");

        match resolution {
            Resolution::Root => {
                Ok(self.unparsed_context(Arc::new(ApplicationUsage::new(self.metadata.clone())), Vec::new()))
            }
            Resolution::NotFound { path, .. } => Err(command_nonexistent(&self.localization, &path)),
            Resolution::Command {
                command, remaining, ..
            } => {
                let parser = CommandParser::new(ParserConfiguration {
                    converters: self.converters.clone(),
                    localization: Arc::clone(&self.localization),
                });
                parser.execute(Arc::clone(&self.tree), self.output.clone(), Arc::clone(command), &remaining)
            }
            Resolution::Group { path, .. } => {
                let help = HelpCommand::new(self.metadata.application_name.clone());
                Ok(self.unparsed_context(Arc::new(help), path))
            }
        }
    }

    /// Parses and executes `arguments`. Errors are logged through `tracing`
    /// and reported as [`CommandStatus::Failure`].
    pub fn run(&self, arguments: &[String]) -> CommandStatus {
        let context = match self.parse(arguments) {
            Ok(context) => context,
            Err(e) => {
                self.log_structured(&e);
                debug!(error = ?e, "{}", self.localization.localize_key(keys::EXCEPTION));
                return CommandStatus::Failure;
            }
        };

        match context.execute() {
            Ok(status) => status,
            Err(e) => {
                match e.downcast_ref::<StructuredError>() {
                    Some(structured) => self.log_structured(structured),
                    None => error!("{e}"),
                }
                debug!(error = ?e, "{}", self.localization.localize_key(keys::EXCEPTION));
                CommandStatus::Failure
            }
        }
    }

    fn log_structured(&self, e: &StructuredError) {
        error!("{}", format_error(&self.localization, e).trim_end());
        for extra in e.extra_errors() {
            error!("{}", format_error(&self.localization, extra).trim_end());
        }
    }

    /// A context for a built-in that takes its positional input verbatim.
    fn unparsed_context(&self, command: Arc<dyn Command>, raw: Vec<String>) -> CommandContext {
        CommandContext {
            tree: Arc::clone(&self.tree),
            converters: self.converters.clone(),
            output: self.output.clone(),
            localization: Arc::clone(&self.localization),
            command,
            named: HashMap::new(),
            positionals: PositionalParameters::Any,
            positional_values: Vec::new(),
            raw,
        }
    }
}
