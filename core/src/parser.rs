//! The argument parser.
//!
//! Parsing a command's arguments runs in five phases, and a failure in any
//! phase ends the parse:
//!
//! 1. Validate the command's declarations: every named key is unique and
//!    every declared type has a converter. Errors accumulate.
//! 2. Scan named arguments left to right. The scan stops at the first token
//!    that is not a named key; everything from there on is positional.
//! 3. Apply defaults and check each named parameter's cardinality. Errors
//!    accumulate.
//! 4. Check and convert positional arguments. Errors accumulate.
//! 5. Build the [`CommandContext`].
//!
//! Where a phase accumulates, the first error is returned with the rest
//! attached as [`extra_errors`](StructuredError::extra_errors).

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::command::Command;
use crate::context::CommandContext;
use crate::convert::{ErasedConverter, Value};
use crate::directory::ConverterDirectory;
use crate::error::{StructuredError, codes};
use crate::output::Output;
use crate::parameter::{Cardinality, NamedKind, NamedParameter, ParameterId, PositionalParameters};
use crate::strings::{Localization, keys};
use crate::tree::CommandTree;

/// Collaborators the parser needs.
#[derive(Debug, Clone)]
pub struct ParserConfiguration {
    /// Converters for every declared type.
    pub converters: ConverterDirectory,
    /// Used to localize error messages and attribute names.
    pub localization: Arc<Localization>,
}

impl Default for ParserConfiguration {
    fn default() -> Self {
        Self {
            converters: ConverterDirectory::core(),
            localization: Arc::new(Localization::internal_only()),
        }
    }
}

/// Parses the arguments of one command into a [`CommandContext`].
#[derive(Debug, Clone, Default)]
pub struct CommandParser {
    configuration: ParserConfiguration,
}

type Keyed<'a> = HashMap<&'a str, (&'a NamedParameter, Arc<dyn ErasedConverter>)>;

impl CommandParser {
    /// Creates a parser.
    pub fn new(configuration: ParserConfiguration) -> Self {
        Self { configuration }
    }

    /// Parses `arguments`: the tokens after the command's path.
    ///
    /// # Errors
    ///
    /// Returns the first [`StructuredError`] found, with any others from the
    /// same phase attached.
    pub fn execute(
        &self,
        tree: Arc<CommandTree>,
        output: Output,
        command: Arc<dyn Command>,
        arguments: &[String],
    ) -> Result<CommandContext, StructuredError> {
        let parse = Parse {
            localization: &self.configuration.localization,
            converters: &self.configuration.converters,
            command_name: command.metadata().name().to_string(),
        };

        let named = command.named_parameters();
        let positionals = command.positional_parameters();

        let (keyed, positional_converters) = parse.validate(&named, &positionals)?;
        debug!(command = %parse.command_name, keys = keyed.len(), "declarations valid");

        let (mut values, consumed) = parse.scan_named(&named, &keyed, arguments)?;
        let rest = &arguments[consumed..];
        debug!(command = %parse.command_name, consumed, positional = rest.len(), "named scan complete");

        parse.finalize_named(&named, &mut values)?;
        let positional_values = parse.convert_positionals(&positionals, &positional_converters, rest)?;

        Ok(CommandContext {
            tree,
            converters: self.configuration.converters.clone(),
            output,
            localization: Arc::clone(&self.configuration.localization),
            command,
            named: values,
            positionals,
            positional_values,
            raw: rest.to_vec(),
        })
    }
}

struct Parse<'a> {
    localization: &'a Localization,
    converters: &'a ConverterDirectory,
    command_name: String,
}

impl Parse<'_> {
    fn error(&self, code: &str, message_key: &str) -> StructuredError {
        StructuredError::new(code, self.localization.localize_key(message_key))
            .with_attribute(self.text(keys::ATTR_COMMAND), self.command_name.clone())
    }

    fn text(&self, key: &str) -> String {
        self.localization.localize_key(key)
    }

    fn validate<'a>(
        &self,
        named: &'a [NamedParameter],
        positionals: &PositionalParameters,
    ) -> Result<(Keyed<'a>, Vec<Arc<dyn ErasedConverter>>), StructuredError> {
        let mut errors = Vec::new();
        let mut keyed: Keyed<'a> = HashMap::new();

        for parameter in named {
            let converter = self.converters.lookup_erased(parameter.value_type());
            if converter.is_none() {
                errors.push(self.no_converter(parameter.name().as_str(), &parameter.value_type().simple_name()));
            }
            for name in parameter.all_names() {
                if keyed.contains_key(name.as_str()) {
                    errors.push(
                        self.error(codes::PARAMETER_DUPLICATE, keys::ERROR_PARAMETER_DUPLICATE)
                            .with_attribute(self.text(keys::ATTR_PARAMETER), name.as_str())
                            .with_remediation(self.text(keys::SUGGEST_UNIQUE_NAMES)),
                    );
                    continue;
                }
                if let Some(converter) = &converter {
                    keyed.insert(name.as_str(), (parameter, Arc::clone(converter)));
                }
            }
        }

        let mut positional_converters = Vec::new();
        if let PositionalParameters::Typed(declared) = positionals {
            for parameter in declared {
                match self.converters.lookup_erased(parameter.value_type()) {
                    Some(converter) => positional_converters.push(converter),
                    None => errors.push(
                        self.no_converter(parameter.name().as_str(), &parameter.value_type().simple_name()),
                    ),
                }
            }
        }

        StructuredError::raise_first(errors)?;
        Ok((keyed, positional_converters))
    }

    fn no_converter(&self, parameter: &str, type_name: &str) -> StructuredError {
        self.error(codes::PARAMETER_NO_VALUE_CONVERTER, keys::ERROR_NO_VALUE_CONVERTER)
            .with_attribute(self.text(keys::ATTR_PARAMETER), parameter)
            .with_attribute(self.text(keys::ATTR_TYPE), type_name)
            .with_remediation(self.text(keys::SUGGEST_REGISTER_CONVERTER))
    }

    /// Returns the values per declaration and the number of tokens consumed.
    fn scan_named(
        &self,
        named: &[NamedParameter],
        keyed: &Keyed<'_>,
        arguments: &[String],
    ) -> Result<(HashMap<ParameterId, Vec<Value>>, usize), StructuredError> {
        let mut values: HashMap<ParameterId, Vec<Value>> =
            named.iter().map(|p| (p.id(), Vec::new())).collect();
        let mut index = 0;

        while let Some((parameter, converter)) = arguments.get(index).and_then(|t| keyed.get(t.as_str())) {
            index += 1;
            let existing = values.entry(parameter.id()).or_default();

            if matches!(parameter.kind(), NamedKind::One { .. }) && !existing.is_empty() {
                return Err(self
                    .cardinality(parameter, existing.len() + 1, keys::ERROR_EXPECTS_ONE_VALUE)
                    .with_remediation(self.text(keys::SUGGEST_PROVIDE_EXACTLY_ONE)));
            }

            let Some(text) = arguments.get(index) else {
                return Err(self
                    .error(codes::PARAMETER_MISSING_VALUE, keys::ERROR_MISSING_VALUE)
                    .with_attribute(self.text(keys::ATTR_PARAMETER), parameter.name().as_str())
                    .with_attribute(self.text(keys::ATTR_TYPE), parameter.value_type().simple_name())
                    .with_attribute(self.text(keys::ATTR_SYNTAX), converter.syntax())
                    .with_remediation(self.text(keys::SUGGEST_PROVIDE_VALUE)));
            };
            index += 1;

            let value = converter.parse_value(text).map_err(|e| {
                self.unparseable(parameter.name().as_str(), text, &parameter.value_type().simple_name(), &**converter)
                    .with_cause(e)
            })?;
            existing.push(value);
        }

        Ok((values, index))
    }

    fn finalize_named(
        &self,
        named: &[NamedParameter],
        values: &mut HashMap<ParameterId, Vec<Value>>,
    ) -> Result<(), StructuredError> {
        let mut errors = Vec::new();

        for parameter in named {
            let list = values.entry(parameter.id()).or_default();
            if list.is_empty() {
                list.extend(parameter.kind().defaults().iter().cloned());
            }
            if !parameter.cardinality().admits(list.len()) {
                let remediation = match parameter.kind() {
                    NamedKind::One { .. } => keys::SUGGEST_PROVIDE_EXACTLY_ONE,
                    _ => keys::SUGGEST_PROVIDE_RIGHT_NUMBER,
                };
                errors.push(
                    self.cardinality(parameter, list.len(), keys::ERROR_WRONG_NUMBER_OF_VALUES)
                        .with_remediation(self.text(remediation)),
                );
            }
        }

        StructuredError::raise_first(errors)
    }

    fn convert_positionals(
        &self,
        positionals: &PositionalParameters,
        converters: &[Arc<dyn ErasedConverter>],
        rest: &[String],
    ) -> Result<Vec<Value>, StructuredError> {
        let declared = match positionals {
            PositionalParameters::Any => return Ok(Vec::new()),
            PositionalParameters::None => &[][..],
            PositionalParameters::Typed(declared) => declared.as_slice(),
        };

        if rest.len() != declared.len() {
            return Err(self
                .error(codes::PARAMETER_POSITIONAL_COUNT, keys::ERROR_POSITIONAL_COUNT)
                .with_attribute(self.text(keys::ATTR_EXPECTED_COUNT), declared.len().to_string())
                .with_attribute(self.text(keys::ATTR_PROVIDED_COUNT), rest.len().to_string())
                .with_remediation(self.text(keys::SUGGEST_PROVIDE_RIGHT_NUMBER)));
        }

        let mut errors = Vec::new();
        let mut converted = Vec::with_capacity(rest.len());
        for ((parameter, converter), text) in declared.iter().zip(converters).zip(rest) {
            match converter.parse_value(text) {
                Ok(value) => converted.push(value),
                Err(e) => errors.push(
                    self.unparseable(
                        parameter.name().as_str(),
                        text,
                        &parameter.value_type().simple_name(),
                        &**converter,
                    )
                    .with_cause(e),
                ),
            }
        }

        StructuredError::raise_first(errors)?;
        Ok(converted)
    }

    fn unparseable(
        &self,
        parameter: &str,
        provided: &str,
        type_name: &str,
        converter: &dyn ErasedConverter,
    ) -> StructuredError {
        self.error(codes::PARAMETER_UNPARSEABLE_VALUE, keys::ERROR_UNPARSEABLE)
            .with_attribute(self.text(keys::ATTR_PARAMETER), parameter)
            .with_attribute(self.text(keys::ATTR_PROVIDED), provided)
            .with_attribute(self.text(keys::ATTR_TYPE), type_name)
            .with_attribute(self.text(keys::ATTR_SYNTAX), converter.syntax())
            .with_remediation(self.text(keys::SUGGEST_PROVIDE_PARSEABLE))
    }

    fn cardinality(&self, parameter: &NamedParameter, provided: usize, message_key: &str) -> StructuredError {
        let bounds = parameter.cardinality();
        let maximum = if bounds.maximum == Cardinality::UNBOUNDED {
            "N".to_string()
        } else {
            bounds.maximum.to_string()
        };
        self.error(codes::PARAMETER_CARDINALITY, message_key)
            .with_attribute(self.text(keys::ATTR_PARAMETER), parameter.name().as_str())
            .with_attribute(self.text(keys::ATTR_MINIMUM_VALUES), bounds.minimum.to_string())
            .with_attribute(self.text(keys::ATTR_MAXIMUM_VALUES), maximum)
            .with_attribute(self.text(keys::ATTR_PROVIDED_COUNT), provided.to_string())
    }
}
