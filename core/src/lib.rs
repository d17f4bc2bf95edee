//! Command trees, typed parameters and argument parsing for command-line
//! applications.
//!
//! An application is a tree of named commands and command groups. Each
//! command declares typed parameters:
//!
//! - [`Named1`], [`Named01`], [`Named1N`] and [`Named0N`] for named
//!   parameters with cardinality `[1, 1]`, `[0, 1]`, `[1, N]` and `[0, N]`.
//! - [`PositionalParameters`] for what follows the named parameters: none,
//!   an exact list of typed [`Positional`] values, or any raw tokens.
//!
//! A command line is first expanded ([`expand_arguments`]), then
//! [`resolve`]d against the tree, and the selected command's arguments are
//! parsed by [`CommandParser`] into a [`CommandContext`]. Values are
//! converted by the [`ValueConverter`]s of a [`ConverterDirectory`].
//! Failures are [`StructuredError`]s with stable codes and localized,
//! attribute-rich messages.
//!
//! [`ApplicationBuilder`] puts it together and adds `help` and `version`
//! commands.
//!
//! # Example
//!
//! ```
//! use cmdtree_core::*;
//! use std::io::Write;
//!
//! struct Count {
//!     metadata: CommandMetadata,
//!     times: Named01<i32>,
//!     word: Positional<String>,
//! }
//!
//! impl Command for Count {
//!     fn metadata(&self) -> &CommandMetadata {
//!         &self.metadata
//!     }
//!
//!     fn named_parameters(&self) -> Vec<NamedParameter> {
//!         vec![self.times.parameter().clone()]
//!     }
//!
//!     fn positional_parameters(&self) -> PositionalParameters {
//!         PositionalParameters::typed([self.word.parameter()])
//!     }
//!
//!     fn execute(&self, context: &CommandContext) -> Result<CommandStatus, BoxError> {
//!         let times = context.parameter_optional(&self.times)?.unwrap_or(1);
//!         let word = context.positional_value(&self.word)?;
//!         let mut output = context.output();
//!         for _ in 0..times {
//!             writeln!(output, "{word}")?;
//!         }
//!         Ok(CommandStatus::Success)
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let output = Output::buffer();
//! let mut builder = ApplicationBuilder::new(ApplicationMetadata::new(
//!     "echo", "com.example.echo", "1.0.0", "0000", "Repeats a word.",
//! ))
//! .with_output(output.clone());
//! builder.add_command(Count {
//!     metadata: CommandMetadata::new("count", "Repeat a word.")?,
//!     times: Named01::new("--times", "How many times.")?,
//!     word: Positional::new("word", "The word.")?,
//! })?;
//! let app = builder.build();
//!
//! let args: Vec<String> = ["count", "--times", "2", "hi"].map(String::from).to_vec();
//! assert_eq!(app.run(&args), CommandStatus::Success);
//! assert_eq!(output.contents(), "hi\nhi\n");
//! # Ok(())
//! # }
//! ```

mod application;
mod builtin;
mod command;
mod context;
mod convert;
mod directory;
mod error;
mod help;
mod names;
mod output;
mod parameter;
mod parser;
mod resolve;
mod response_file;
mod strings;
mod tree;

pub use application::{Application, ApplicationBuilder};
pub use builtin::{HelpCommand, VersionCommand};
pub use command::{ApplicationMetadata, Command, CommandMetadata, CommandStatus};
pub use context::CommandContext;
pub use convert::{
    BigDecimalConverter, BigIntegerConverter, BooleanConverter, DateTimeConverter,
    DurationConverter, EnumConverter, ErasedConverter, F32Converter, F64Converter, HostConverter,
    I32Converter, I64Converter, ParameterValue, PathConverter, RegexConverter, StringConverter,
    UriConverter, UuidConverter, Value, ValueConverter, ValueType,
};
pub use directory::ConverterDirectory;
pub use error::{BoxError, ConversionError, InvalidArgument, StructuredError, codes, format_error};
pub use help::{help_format_application, help_format_command, help_format_group};
pub use names::{Name, is_valid as is_valid_name};
pub use output::Output;
pub use parameter::{
    Cardinality, ListDeclaration, Named0N, Named01, Named1, Named1N, NamedDeclaration, NamedKind,
    NamedParameter, ParameterId, Positional, PositionalParameter, PositionalParameters,
};
pub use parser::{CommandParser, ParserConfiguration};
pub use resolve::{Resolution, resolve};
pub use response_file::expand_arguments;
pub use strings::{BundleError, Localization, StringBundle, StringRef};
pub use tree::{CommandGroup, CommandNode, CommandTree, GroupBuilder, TreeBuilder};
