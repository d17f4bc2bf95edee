//! The parsed, per-invocation command context.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::command::{Command, CommandStatus};
use crate::convert::{ParameterValue, Value};
use crate::directory::ConverterDirectory;
use crate::error::{BoxError, InvalidArgument};
use crate::output::Output;
use crate::parameter::{
    ListDeclaration, Named01, Named1, NamedDeclaration, ParameterId, Positional,
    PositionalParameters,
};
use crate::strings::{Localization, StringRef};
use crate::tree::CommandTree;

/// Everything a command needs to run: its parsed values and the
/// application's shared collaborators.
///
/// Values are looked up by the declaration that produced them. Asking for a
/// declaration the command never returned from
/// [`Command::named_parameters`] or [`Command::positional_parameters`] is an
/// [`InvalidArgument`].
pub struct CommandContext {
    pub(crate) tree: Arc<CommandTree>,
    pub(crate) converters: ConverterDirectory,
    pub(crate) output: Output,
    pub(crate) localization: Arc<Localization>,
    pub(crate) command: Arc<dyn Command>,
    pub(crate) named: HashMap<ParameterId, Vec<Value>>,
    pub(crate) positionals: PositionalParameters,
    pub(crate) positional_values: Vec<Value>,
    pub(crate) raw: Vec<String>,
}

impl CommandContext {
    /// The value of a [`Named1`] parameter.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidArgument`] if the command does not declare
    /// `parameter`.
    pub fn parameter_value<T: ParameterValue>(&self, parameter: &Named1<T>) -> Result<T, InvalidArgument> {
        self.values_of(parameter)?
            .into_iter()
            .next()
            .ok_or_else(|| InvalidArgument::NoSuchParameter(parameter.name().to_string()))
    }

    /// The value of a [`Named01`] parameter, if one was provided or
    /// defaulted.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidArgument`] if the command does not declare
    /// `parameter`.
    pub fn parameter_optional<T: ParameterValue>(
        &self,
        parameter: &Named01<T>,
    ) -> Result<Option<T>, InvalidArgument> {
        Ok(self.values_of(parameter)?.into_iter().next())
    }

    /// The values of a [`Named1N`](crate::Named1N) or
    /// [`Named0N`](crate::Named0N) parameter, in command-line order.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidArgument`] if the command does not declare
    /// `parameter`.
    pub fn parameter_values<D: ListDeclaration>(&self, parameter: &D) -> Result<Vec<D::Value>, InvalidArgument> {
        self.values_of(parameter)
    }

    /// The value of a typed positional parameter.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::NoSuchPositional`] if the command's
    /// positional set does not contain `parameter`.
    pub fn positional_value<T: ParameterValue>(&self, parameter: &Positional<T>) -> Result<T, InvalidArgument> {
        let name = parameter.name().as_str();
        let value = self
            .positionals
            .index_of(parameter.parameter().id())
            .and_then(|index| self.positional_values.get(index))
            .ok_or_else(|| InvalidArgument::NoSuchPositional(name.to_string()))?;
        downcast(name, value)
    }

    /// The positional tokens before conversion.
    pub fn parameters_positional_raw(&self) -> &[String] {
        &self.raw
    }

    /// The full command tree.
    pub fn command_tree(&self) -> &CommandTree {
        &self.tree
    }

    /// The converters the parse used.
    pub fn value_converters(&self) -> &ConverterDirectory {
        &self.converters
    }

    /// The output sink. Writing through a clone is fine; all clones share
    /// the sink.
    pub fn output(&self) -> Output {
        self.output.clone()
    }

    /// The application's localization.
    pub fn localization(&self) -> &Localization {
        &self.localization
    }

    /// Resolves a string reference.
    pub fn localize(&self, text: &StringRef) -> String {
        self.localization.localize(text)
    }

    /// The selected command.
    pub fn command(&self) -> &Arc<dyn Command> {
        &self.command
    }

    /// Runs the selected command against this context.
    ///
    /// # Errors
    ///
    /// Whatever the command's action returns.
    pub fn execute(&self) -> Result<CommandStatus, BoxError> {
        self.command.execute(self)
    }

    fn values_of<D: NamedDeclaration>(&self, declaration: &D) -> Result<Vec<D::Value>, InvalidArgument> {
        let parameter = declaration.parameter();
        let name = parameter.name().as_str();
        self.named
            .get(&parameter.id())
            .ok_or_else(|| InvalidArgument::NoSuchParameter(name.to_string()))?
            .iter()
            .map(|value| downcast(name, value))
            .collect()
    }
}

fn downcast<T: ParameterValue>(name: &str, value: &Value) -> Result<T, InvalidArgument> {
    value
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(|| InvalidArgument::TypeMismatch {
            parameter: name.to_string(),
            expected: std::any::type_name::<T>(),
        })
}

impl fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandContext")
            .field("command", &self.command.metadata().name().as_str())
            .field("named", &self.named.len())
            .field("positional", &self.positional_values.len())
            .field("raw", &self.raw)
            .finish()
    }
}
