//! Locale-agnostic string references and the localization tables that
//! resolve them.
//!
//! Declarations carry a [`StringRef`] rather than display text. At render
//! time a [`Localization`] resolves the reference: application strings take
//! precedence over the built-in (internal) strings, and an unknown key
//! resolves to itself.
//!
//! String bundles can be loaded from YAML or JSON files:
//!
//! ```yaml
//! example.cat.description: Hear a cat speak.
//! example.dog.description: Hear a dog speak.
//! ```
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::{Localization, StringBundle, StringRef};
//!
//! let app = StringBundle::from_pairs([("greeting", "Hello, {0}!")]);
//! let localization = Localization::new(StringBundle::internal(), app);
//!
//! assert_eq!(localization.format(&StringRef::key("greeting"), &[&"world"]), "Hello, world!");
//! assert_eq!(localization.localize(&StringRef::constant("fixed")), "fixed");
//! ```

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A human-readable string attached to a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StringRef {
    /// Literal text, shown as-is.
    Constant(String),
    /// A key resolved through a [`Localization`].
    Localize(String),
}

impl StringRef {
    /// Creates a literal string reference.
    pub fn constant(text: impl Into<String>) -> Self {
        Self::Constant(text.into())
    }

    /// Creates a localized string reference.
    pub fn key(key: impl Into<String>) -> Self {
        Self::Localize(key.into())
    }
}

impl From<&str> for StringRef {
    fn from(value: &str) -> Self {
        Self::Constant(value.to_string())
    }
}

impl From<String> for StringRef {
    fn from(value: String) -> Self {
        Self::Constant(value)
    }
}

/// Errors raised while loading or saving a [`StringBundle`].
#[derive(Debug, Error)]
pub enum BundleError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A flat key → text table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringBundle {
    entries: BTreeMap<String, String>,
}

impl StringBundle {
    /// An empty bundle.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in English strings used by the parser, errors and help.
    pub fn internal() -> Self {
        Self::from_pairs(INTERNAL_STRINGS.iter().copied())
    }

    /// Builds a bundle from key/text pairs. Later pairs replace earlier ones.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Loads a bundle from a YAML file, or a JSON file when the path ends
    /// in `.json`.
    ///
    /// # Errors
    ///
    /// Returns [`BundleError::Io`] if the file cannot be read, or a
    /// format error if it is not a flat string map.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BundleError> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let bundle = if is_json {
            serde_json::from_reader(reader)?
        } else {
            serde_yaml::from_reader(reader)?
        };
        Ok(bundle)
    }

    /// Saves the bundle as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`BundleError::Io`] if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BundleError> {
        let writer = BufWriter::new(std::fs::File::create(path)?);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Looks up the text for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Inserts or replaces an entry.
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the bundle has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves [`StringRef`]s against an application bundle and the internal
/// bundle, in that order.
#[derive(Debug, Clone, Default)]
pub struct Localization {
    internal: StringBundle,
    application: StringBundle,
}

impl Localization {
    /// Creates a localization over the two bundles.
    pub fn new(internal: StringBundle, application: StringBundle) -> Self {
        Self {
            internal,
            application,
        }
    }

    /// Built-in strings only.
    pub fn internal_only() -> Self {
        Self::new(StringBundle::internal(), StringBundle::empty())
    }

    /// Resolves a string reference to display text.
    pub fn localize(&self, text: &StringRef) -> String {
        match text {
            StringRef::Constant(s) => s.clone(),
            StringRef::Localize(key) => self.lookup(key).to_string(),
        }
    }

    /// Resolves a built-in key.
    pub fn localize_key(&self, key: &str) -> String {
        self.lookup(key).to_string()
    }

    /// Resolves `text` and substitutes `{0}`, `{1}`, ... with `arguments`.
    pub fn format(&self, text: &StringRef, arguments: &[&dyn Display]) -> String {
        substitute(&self.localize(text), arguments)
    }

    /// Resolves a built-in key and substitutes its placeholders.
    pub fn format_key(&self, key: &str, arguments: &[&dyn Display]) -> String {
        substitute(self.lookup(key), arguments)
    }

    fn lookup<'a>(&'a self, key: &'a str) -> &'a str {
        self.application
            .get(key)
            .or_else(|| self.internal.get(key))
            .unwrap_or(key)
    }
}

/// Replaces `{n}` placeholders. Placeholders with no matching argument are
/// left untouched.
fn substitute(pattern: &str, arguments: &[&dyn Display]) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            let argument = arguments.get(index)?;
            Some((close, argument))
        });
        match replaced {
            Some((close, argument)) => {
                out.push_str(&argument.to_string());
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

impl fmt::Display for StringRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(s) | Self::Localize(s) => f.write_str(s),
        }
    }
}

/// Keys of the built-in strings that other modules refer to.
pub(crate) mod keys {
    pub const ATTR_COMMAND: &str = "attribute.command";
    pub const ATTR_PARAMETER: &str = "attribute.parameter";
    pub const ATTR_PROVIDED: &str = "attribute.provided";
    pub const ATTR_TYPE: &str = "attribute.type";
    pub const ATTR_SYNTAX: &str = "attribute.syntax";
    pub const ATTR_FILE: &str = "attribute.file";
    pub const ATTR_PATH: &str = "attribute.path";
    pub const ATTR_EXPECTED_COUNT: &str = "attribute.expected_count";
    pub const ATTR_PROVIDED_COUNT: &str = "attribute.provided_count";
    pub const ATTR_MINIMUM_VALUES: &str = "attribute.minimum_values";
    pub const ATTR_MAXIMUM_VALUES: &str = "attribute.maximum_values";
    pub const ATTR_ERROR_CODE: &str = "attribute.error_code";
    pub const ATTR_SUGGESTED_ACTION: &str = "attribute.suggested_action";

    pub const ERROR_IO_FILE: &str = "error.io_file";
    pub const ERROR_COMMAND_NONEXISTENT: &str = "error.command_nonexistent";
    pub const ERROR_COMMAND_PATH: &str = "error.command_path";
    pub const ERROR_PARAMETER_DUPLICATE: &str = "error.parameter_duplicate";
    pub const ERROR_NO_VALUE_CONVERTER: &str = "error.parameter_no_value_converter";
    pub const ERROR_MISSING_VALUE: &str = "error.parameter_missing_value";
    pub const ERROR_UNPARSEABLE: &str = "error.parameter_unparseable";
    pub const ERROR_EXPECTS_ONE_VALUE: &str = "error.parameter_expects_one_value";
    pub const ERROR_WRONG_NUMBER_OF_VALUES: &str = "error.parameter_wrong_number_of_values";
    pub const ERROR_POSITIONAL_COUNT: &str = "error.positional_count";

    pub const SUGGEST_UNIQUE_NAMES: &str = "suggest.unique_names";
    pub const SUGGEST_REGISTER_CONVERTER: &str = "suggest.register_converter";
    pub const SUGGEST_PROVIDE_VALUE: &str = "suggest.provide_value";
    pub const SUGGEST_PROVIDE_PARSEABLE: &str = "suggest.provide_parseable";
    pub const SUGGEST_PROVIDE_EXACTLY_ONE: &str = "suggest.provide_exactly_one";
    pub const SUGGEST_PROVIDE_RIGHT_NUMBER: &str = "suggest.provide_right_number";
    pub const SUGGEST_HELP_COMMANDS: &str = "suggest.help_commands";

    pub const USAGE: &str = "usage";
    pub const USAGE_HELP: &str = "usage.help";
    pub const USAGE_COMMANDS: &str = "usage.commands";
    pub const USAGE_DOCUMENTATION: &str = "usage.documentation";
    pub const USAGE_GROUP: &str = "usage.group";
    pub const USAGE_COMMAND: &str = "usage.command";
    pub const USAGE_COMMAND_NONE: &str = "usage.command.none";
    pub const USAGE_COMMAND_NO_NAMED: &str = "usage.command.no_named";
    pub const USAGE_COMMAND_NO_POSITIONAL: &str = "usage.command.no_positional";
    pub const POSITIONAL_ANY: &str = "usage.positional.any";

    pub const HELP_NAMED: &str = "help.named";
    pub const HELP_NAMED_NONE: &str = "help.named.none";
    pub const HELP_POSITIONAL: &str = "help.positional";
    pub const HELP_POSITIONAL_NONE: &str = "help.positional.none";
    pub const HELP_POSITIONAL_ANY: &str = "help.positional.any";
    pub const HELP_DESCRIPTION: &str = "help.label.description";
    pub const HELP_SYNTAX: &str = "help.label.syntax";
    pub const HELP_DEFAULT: &str = "help.label.default";
    pub const HELP_CARDINALITY: &str = "help.label.cardinality";
    pub const HELP_ALTERNATIVES: &str = "help.label.alternatives";
    pub const HELP_TYPE: &str = "help.label.type";
    pub const CARDINALITY_1: &str = "help.cardinality.1";
    pub const CARDINALITY_1_NO_DEFAULT: &str = "help.cardinality.1.no_default";
    pub const CARDINALITY_01: &str = "help.cardinality.01";
    pub const CARDINALITY_01_NO_DEFAULT: &str = "help.cardinality.01.no_default";
    pub const CARDINALITY_0N: &str = "help.cardinality.0n";
    pub const CARDINALITY_0N_NO_DEFAULT: &str = "help.cardinality.0n.no_default";
    pub const CARDINALITY_1N: &str = "help.cardinality.1n";
    pub const CARDINALITY_1N_NO_DEFAULT: &str = "help.cardinality.1n.no_default";

    pub const HELP_COMMAND_DESCRIPTION: &str = "command.help.description";
    pub const HELP_COMMAND_DESCRIPTION_LONG: &str = "command.help.description.long";
    pub const VERSION_COMMAND_DESCRIPTION: &str = "command.version.description";
    pub const VERSION_COMMAND_DESCRIPTION_LONG: &str = "command.version.description.long";

    pub const EXCEPTION: &str = "exception";
}

const INTERNAL_STRINGS: &[(&str, &str)] = &[
    (keys::ATTR_COMMAND, "command"),
    (keys::ATTR_PARAMETER, "parameter"),
    (keys::ATTR_PROVIDED, "provided"),
    (keys::ATTR_TYPE, "type"),
    (keys::ATTR_SYNTAX, "syntax"),
    (keys::ATTR_FILE, "file"),
    (keys::ATTR_PATH, "path"),
    (keys::ATTR_EXPECTED_COUNT, "expected_count"),
    (keys::ATTR_PROVIDED_COUNT, "provided_count"),
    (keys::ATTR_MINIMUM_VALUES, "minimum_values"),
    (keys::ATTR_MAXIMUM_VALUES, "maximum_values"),
    (keys::ATTR_ERROR_CODE, "error_code"),
    (keys::ATTR_SUGGESTED_ACTION, "suggested_action"),
    (keys::ERROR_IO_FILE, "Failed to read an argument file."),
    (keys::ERROR_COMMAND_NONEXISTENT, "No such command exists."),
    (
        keys::ERROR_COMMAND_PATH,
        "The command path names a command before the end of the path.",
    ),
    (
        keys::ERROR_PARAMETER_DUPLICATE,
        "Multiple parameters are declared with the same name.",
    ),
    (
        keys::ERROR_NO_VALUE_CONVERTER,
        "No value converter is registered for the parameter type.",
    ),
    (keys::ERROR_MISSING_VALUE, "The parameter requires a value."),
    (keys::ERROR_UNPARSEABLE, "The provided value could not be parsed."),
    (
        keys::ERROR_EXPECTS_ONE_VALUE,
        "The parameter accepts exactly one value.",
    ),
    (
        keys::ERROR_WRONG_NUMBER_OF_VALUES,
        "The wrong number of values was provided for the parameter.",
    ),
    (
        keys::ERROR_POSITIONAL_COUNT,
        "The wrong number of positional arguments was provided.",
    ),
    (
        keys::SUGGEST_UNIQUE_NAMES,
        "Give each parameter of the command a unique name.",
    ),
    (
        keys::SUGGEST_REGISTER_CONVERTER,
        "Register a value converter for the parameter type.",
    ),
    (keys::SUGGEST_PROVIDE_VALUE, "Provide a value for the parameter."),
    (
        keys::SUGGEST_PROVIDE_PARSEABLE,
        "Provide a value that matches the parameter syntax.",
    ),
    (
        keys::SUGGEST_PROVIDE_EXACTLY_ONE,
        "Specify the parameter exactly once.",
    ),
    (
        keys::SUGGEST_PROVIDE_RIGHT_NUMBER,
        "Provide the number of values the command expects.",
    ),
    (
        keys::SUGGEST_HELP_COMMANDS,
        "Run the help command to list the available commands.",
    ),
    (keys::USAGE, "Usage: {0} [command] [arguments ...]"),
    (
        keys::USAGE_HELP,
        "Use the \"help\" command to examine specific commands:\n\n  $ {0} help help\n\nCommand-line arguments can be placed one per line into a file, and\nthe file can be referenced using the @ symbol:\n\n  $ echo help > file.txt\n  $ echo help >> file.txt\n  $ {0} @file.txt\n",
    ),
    (keys::USAGE_COMMANDS, "Commands:"),
    (keys::USAGE_DOCUMENTATION, "Documentation:"),
    (keys::USAGE_GROUP, "Usage: {0} {1} [command] [arguments ...]"),
    (keys::USAGE_COMMAND, "Usage: {0} {1} [named-arguments ...] {2}"),
    (keys::USAGE_COMMAND_NONE, "Usage: {0} {1}"),
    (keys::USAGE_COMMAND_NO_NAMED, "Usage: {0} {1} {2}"),
    (
        keys::USAGE_COMMAND_NO_POSITIONAL,
        "Usage: {0} {1} [named-arguments ...]",
    ),
    (keys::POSITIONAL_ANY, "<argument> ..."),
    (keys::HELP_NAMED, "Named parameters:"),
    (
        keys::HELP_NAMED_NONE,
        "The command does not accept any named parameters.",
    ),
    (keys::HELP_POSITIONAL, "Positional parameters:"),
    (
        keys::HELP_POSITIONAL_NONE,
        "The command does not accept any positional parameters.",
    ),
    (
        keys::HELP_POSITIONAL_ANY,
        "The command accepts any number of positional arguments.",
    ),
    (keys::HELP_DESCRIPTION, "Description"),
    (keys::HELP_SYNTAX, "Syntax"),
    (keys::HELP_DEFAULT, "Default value"),
    (keys::HELP_CARDINALITY, "Cardinality"),
    (keys::HELP_ALTERNATIVES, "Alternative names"),
    (keys::HELP_TYPE, "Type"),
    (
        keys::CARDINALITY_1,
        "[1]; Specify at most once; the default is used if omitted.",
    ),
    (keys::CARDINALITY_1_NO_DEFAULT, "[1]; Specify exactly once."),
    (
        keys::CARDINALITY_01,
        "[0, 1]; Specify at most once; the default is used if omitted.",
    ),
    (keys::CARDINALITY_01_NO_DEFAULT, "[0, 1]; Specify at most once."),
    (
        keys::CARDINALITY_0N,
        "[0, N]; Specify zero or more times; the defaults are used if omitted.",
    ),
    (keys::CARDINALITY_0N_NO_DEFAULT, "[0, N]; Specify zero or more times."),
    (
        keys::CARDINALITY_1N,
        "[1, N]; Specify one or more times; the default is used if omitted.",
    ),
    (keys::CARDINALITY_1N_NO_DEFAULT, "[1, N]; Specify one or more times."),
    (keys::HELP_COMMAND_DESCRIPTION, "Show detailed help for a command or group."),
    (
        keys::HELP_COMMAND_DESCRIPTION_LONG,
        "With no arguments, shows help for the help command itself. Given a\ncommand path, shows the usage, parameters and description of the\nnamed command or group.",
    ),
    (keys::VERSION_COMMAND_DESCRIPTION, "Show the application version."),
    (
        keys::VERSION_COMMAND_DESCRIPTION_LONG,
        "Prints the application identifier, version and build.",
    ),
    (keys::EXCEPTION, "Exception trace"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_bundle_overrides_internal() {
        let app = StringBundle::from_pairs([(keys::ATTR_COMMAND, "Befehl")]);
        let loc = Localization::new(StringBundle::internal(), app);
        assert_eq!(loc.localize_key(keys::ATTR_COMMAND), "Befehl");
        assert_eq!(loc.localize_key(keys::ATTR_PARAMETER), "parameter");
    }

    #[test]
    fn test_unknown_key_resolves_to_itself() {
        let loc = Localization::internal_only();
        assert_eq!(loc.localize(&StringRef::key("no.such.key")), "no.such.key");
    }

    #[test]
    fn test_format_substitutes_positional_arguments() {
        let loc = Localization::internal_only();
        let text = loc.format_key(keys::USAGE_GROUP, &[&"app", &"a b"]);
        assert_eq!(text, "Usage: app a b [command] [arguments ...]");
    }

    #[test]
    fn test_substitute_leaves_unmatched_braces() {
        assert_eq!(substitute("{0} {1} {x} {", &[&"a"]), "a {1} {x} {");
    }

    #[test]
    fn test_internal_bundle_has_attribute_labels() {
        let bundle = StringBundle::internal();
        assert_eq!(bundle.get(keys::ATTR_ERROR_CODE), Some("error_code"));
        assert_eq!(bundle.get(keys::ATTR_SUGGESTED_ACTION), Some("suggested_action"));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strings.yaml");

        let bundle = StringBundle::from_pairs([("a", "first"), ("b", "second")]);
        bundle.save(&path).unwrap();

        let loaded = StringBundle::load(&path).unwrap();
        assert_eq!(loaded, bundle);
    }

    #[test]
    fn test_load_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strings.json");
        std::fs::write(&path, r#"{"greeting": "hi"}"#).unwrap();

        let loaded = StringBundle::load(&path).unwrap();
        assert_eq!(loaded.get("greeting"), Some("hi"));
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = StringBundle::load("/nonexistent/strings.yaml").unwrap_err();
        assert!(matches!(err, BundleError::Io(_)));
    }
}
