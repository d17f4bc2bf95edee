//! Help and usage rendering.
//!
//! Command help is laid out as a usage header, the short description, a
//! table of named parameters sorted by primary name, the positional
//! parameters, and the long description. A `*` before a named parameter
//! marks it as required. Group help lists the group's visible children with
//! their short descriptions.
//!
//! ```text
//! Usage: app cmd [named-arguments ...] <x>
//!
//!   Run the command.
//!
//!   Named parameters:
//!   * --file
//!       Description       : The input file.
//!       Type              : PathBuf
//!       Cardinality       : [1]; Specify exactly once.
//!       Syntax            : <path>
//!
//!   Positional parameters:
//!     x
//!       Type              : i32
//!       Description       : A number.
//!       Syntax            : -?(0 | [1-9][0-9]*)
//! ```

use std::io::{self, Write};

use crate::command::{ApplicationMetadata, Command, CommandMetadata};
use crate::convert::{ErasedConverter, Value};
use crate::directory::ConverterDirectory;
use crate::parameter::{NamedKind, NamedParameter, PositionalParameter, PositionalParameters};
use crate::strings::{Localization, keys};
use crate::tree::{CommandGroup, CommandTree};

/// Writes detailed help for `command`, reached by `path`.
///
/// # Errors
///
/// Propagates write errors from `output`.
pub fn help_format_command(
    converters: &ConverterDirectory,
    localization: &Localization,
    application_name: &str,
    output: &mut impl Write,
    command: &dyn Command,
    path: &[String],
) -> io::Result<()> {
    let help = Help::new(converters, localization);
    let metadata = command.metadata();
    let mut named = command.named_parameters();
    named.sort_by(|a, b| a.name().as_str().cmp(b.name().as_str()));
    let positionals = command.positional_parameters();

    help.usage_header(output, application_name, path, &named, &positionals)?;
    help.short_description(output, metadata)?;
    help.named_table(output, &named)?;
    help.positional_table(output, &positionals)?;
    help.long_description(output, metadata)?;
    writeln!(output)?;
    output.flush()
}

/// Writes help for `group`, reached by `path`.
///
/// # Errors
///
/// Propagates write errors from `output`.
pub fn help_format_group(
    converters: &ConverterDirectory,
    localization: &Localization,
    application_name: &str,
    output: &mut impl Write,
    group: &CommandGroup,
    path: &[String],
) -> io::Result<()> {
    let help = Help::new(converters, localization);
    let usage = localization.format_key(keys::USAGE_GROUP, &[&application_name, &path.join(" ")]);
    writeln!(output, "{usage}")?;
    writeln!(output)?;
    help.short_description(output, group.metadata())?;
    command_list(localization, output, group.tree())?;
    help.long_description(output, group.metadata())?;
    writeln!(output)?;
    output.flush()
}

/// Writes the application's usage summary: the usage line, title, a hint on
/// using `help` and argument files, the visible top-level commands and the
/// documentation site if there is one.
///
/// # Errors
///
/// Propagates write errors from `output`.
pub fn help_format_application(
    localization: &Localization,
    metadata: &ApplicationMetadata,
    tree: &CommandTree,
    output: &mut impl Write,
) -> io::Result<()> {
    let name = metadata.application_name.as_str();
    writeln!(output, "{}", localization.format_key(keys::USAGE, &[&name]))?;
    writeln!(output)?;
    writeln!(output, "  {}", metadata.title)?;
    for line in localization.format_key(keys::USAGE_HELP, &[&name]).lines() {
        writeln!(output, "  {line}")?;
    }
    writeln!(output)?;

    command_list(localization, output, tree)?;

    if let Some(site) = &metadata.site {
        writeln!(output, "  {}", localization.localize_key(keys::USAGE_DOCUMENTATION))?;
        writeln!(output, "    {site}")?;
    }
    writeln!(output)?;
    output.flush()
}

struct Labels {
    description: String,
    syntax: String,
    default: String,
    cardinality: String,
    alternatives: String,
    value_type: String,
    width: usize,
}

struct Help<'a> {
    converters: &'a ConverterDirectory,
    localization: &'a Localization,
    labels: Labels,
}

impl<'a> Help<'a> {
    fn new(converters: &'a ConverterDirectory, localization: &'a Localization) -> Self {
        let label = |key: &str| localization.localize_key(key);
        let mut labels = Labels {
            description: label(keys::HELP_DESCRIPTION),
            syntax: label(keys::HELP_SYNTAX),
            default: label(keys::HELP_DEFAULT),
            cardinality: label(keys::HELP_CARDINALITY),
            alternatives: label(keys::HELP_ALTERNATIVES),
            value_type: label(keys::HELP_TYPE),
            width: 0,
        };
        labels.width = [
            &labels.description,
            &labels.syntax,
            &labels.default,
            &labels.cardinality,
            &labels.alternatives,
            &labels.value_type,
        ]
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
            + 1;
        Self {
            converters,
            localization,
            labels,
        }
    }

    fn row(&self, output: &mut impl Write, label: &str, value: &str) -> io::Result<()> {
        let pad = self.labels.width.saturating_sub(label.chars().count());
        writeln!(output, "      {label}{}: {value}", " ".repeat(pad))
    }

    fn usage_header(
        &self,
        output: &mut impl Write,
        application_name: &str,
        path: &[String],
        named: &[NamedParameter],
        positionals: &PositionalParameters,
    ) -> io::Result<()> {
        let positional_names = match positionals {
            PositionalParameters::None => String::new(),
            PositionalParameters::Typed(parameters) => parameters
                .iter()
                .map(|p| format!("<{}>", p.name()))
                .collect::<Vec<_>>()
                .join(" "),
            PositionalParameters::Any => self.localization.localize_key(keys::POSITIONAL_ANY),
        };
        let key = match (named.is_empty(), positionals) {
            (true, PositionalParameters::None) => keys::USAGE_COMMAND_NONE,
            (true, _) => keys::USAGE_COMMAND_NO_NAMED,
            (false, PositionalParameters::None) => keys::USAGE_COMMAND_NO_POSITIONAL,
            (false, _) => keys::USAGE_COMMAND,
        };
        let usage = self
            .localization
            .format_key(key, &[&application_name, &path.join(" "), &positional_names]);
        writeln!(output, "{usage}")?;
        writeln!(output)
    }

    fn short_description(&self, output: &mut impl Write, metadata: &CommandMetadata) -> io::Result<()> {
        writeln!(output, "  {}", self.localization.localize(metadata.short_description()))?;
        writeln!(output)
    }

    fn long_description(&self, output: &mut impl Write, metadata: &CommandMetadata) -> io::Result<()> {
        if let Some(text) = metadata.long_description() {
            for line in self.localization.localize(text).lines() {
                writeln!(output, "  {line}")?;
            }
        }
        Ok(())
    }

    fn named_table(&self, output: &mut impl Write, named: &[NamedParameter]) -> io::Result<()> {
        if named.is_empty() {
            writeln!(output, "  {}", self.localization.localize_key(keys::HELP_NAMED_NONE))?;
            return writeln!(output);
        }

        writeln!(output, "  {}", self.localization.localize_key(keys::HELP_NAMED))?;
        for parameter in named {
            let converter = self.converters.lookup_erased(parameter.value_type());
            let marker = if parameter.is_required() { "  * " } else { "    " };
            writeln!(output, "{marker}{}", parameter.name())?;
            self.row(
                output,
                &self.labels.description,
                &self.localization.localize(parameter.description()),
            )?;
            self.row(output, &self.labels.value_type, &parameter.value_type().simple_name())?;
            self.cardinality_rows(output, parameter, converter.as_deref())?;
            if let Some(converter) = &converter {
                self.row(output, &self.labels.syntax, &converter.syntax())?;
            }
            if !parameter.alternatives().is_empty() {
                let alternatives: Vec<&str> = parameter.alternatives().iter().map(|n| n.as_str()).collect();
                self.row(output, &self.labels.alternatives, &alternatives.join(", "))?;
            }
        }
        writeln!(output)
    }

    fn cardinality_rows(
        &self,
        output: &mut impl Write,
        parameter: &NamedParameter,
        converter: Option<&dyn ErasedConverter>,
    ) -> io::Result<()> {
        let defaults = parameter.kind().defaults();
        let key = match (parameter.kind(), defaults.is_empty()) {
            (NamedKind::One { .. }, false) => keys::CARDINALITY_1,
            (NamedKind::One { .. }, true) => keys::CARDINALITY_1_NO_DEFAULT,
            (NamedKind::ZeroOrOne { .. }, false) => keys::CARDINALITY_01,
            (NamedKind::ZeroOrOne { .. }, true) => keys::CARDINALITY_01_NO_DEFAULT,
            (NamedKind::OneOrMore { .. }, false) => keys::CARDINALITY_1N,
            (NamedKind::OneOrMore { .. }, true) => keys::CARDINALITY_1N_NO_DEFAULT,
            (NamedKind::ZeroOrMore { .. }, false) => keys::CARDINALITY_0N,
            (NamedKind::ZeroOrMore { .. }, true) => keys::CARDINALITY_0N_NO_DEFAULT,
        };
        self.row(output, &self.labels.cardinality, &self.localization.localize_key(key))?;

        let (Some(converter), false) = (converter, defaults.is_empty()) else {
            return Ok(());
        };
        let text = match parameter.kind() {
            NamedKind::ZeroOrMore { .. } => format!("[{}]", print_all(converter, defaults).join(", ")),
            _ => print_all(converter, defaults).join(""),
        };
        self.row(output, &self.labels.default, &text)
    }

    fn positional_table(&self, output: &mut impl Write, positionals: &PositionalParameters) -> io::Result<()> {
        let parameters = match positionals {
            PositionalParameters::None => {
                return writeln!(output, "  {}", self.localization.localize_key(keys::HELP_POSITIONAL_NONE));
            }
            PositionalParameters::Any => {
                return writeln!(output, "  {}", self.localization.localize_key(keys::HELP_POSITIONAL_ANY));
            }
            PositionalParameters::Typed(parameters) => parameters,
        };

        let mut sorted: Vec<&PositionalParameter> = parameters.iter().collect();
        sorted.sort_by(|a, b| a.name().as_str().cmp(b.name().as_str()));

        writeln!(output, "  {}", self.localization.localize_key(keys::HELP_POSITIONAL))?;
        for parameter in sorted {
            writeln!(output, "    {}", parameter.name())?;
            self.row(output, &self.labels.value_type, &parameter.value_type().simple_name())?;
            self.row(
                output,
                &self.labels.description,
                &self.localization.localize(parameter.description()),
            )?;
            if let Some(converter) = self.converters.lookup_erased(parameter.value_type()) {
                self.row(output, &self.labels.syntax, &converter.syntax())?;
            }
        }
        writeln!(output)
    }
}

fn command_list(localization: &Localization, output: &mut impl Write, tree: &CommandTree) -> io::Result<()> {
    writeln!(output, "  {}", localization.localize_key(keys::USAGE_COMMANDS))?;
    let longest = 4 + tree
        .visible()
        .map(|node| node.metadata().name().as_str().chars().count())
        .max()
        .unwrap_or(0);
    for node in tree.visible() {
        let metadata = node.metadata();
        let name = metadata.name().as_str();
        let pad = longest - name.chars().count();
        writeln!(
            output,
            "    {name}{}{}",
            " ".repeat(pad),
            localization.localize(metadata.short_description())
        )?;
    }
    writeln!(output)
}

fn print_all(converter: &dyn ErasedConverter, values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(|value| converter.print_value(&**value))
        .collect()
}
