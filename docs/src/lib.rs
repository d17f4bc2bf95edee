//! A command that writes structural XML documentation skeletons for the
//! other commands of an application.
//!
//! ```text
//! $ app docs --type main cmd-everything > cmd-everything.xml
//! $ app docs --type parameters cmd-everything > parameters.xml
//! ```
//!
//! The `main` document is a `Section` naming the command, with description
//! and example stubs to fill in. When the command has named parameters the
//! description pulls in the `parameters` document through `xi:include`; its
//! file name is set with `--parameters-include`.

mod document;

use std::io::Write;

use cmdtree_core::{
    BoxError, Command, CommandContext, CommandMetadata, CommandStatus, InvalidArgument, Named1,
    NamedDeclaration, NamedParameter, PositionalParameters, Resolution, resolve,
};
use strum::{AsRefStr, EnumString};
use thiserror::Error;
use tracing::debug;

pub use document::{NAMESPACE, NAMESPACE_XINCLUDE, main_document, parameter_id, parameters_document, section_id};

/// Errors raised while producing a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// `--type` named something other than `main` or `parameters`.
    #[error("unknown document type '{0}' (expected 'main' or 'parameters')")]
    UnknownType(String),

    /// A parameter's type has no converter to print its defaults with.
    #[error("no value converter for parameter {parameter} of type {value_type}")]
    NoConverter { parameter: String, value_type: String },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parameter(#[from] InvalidArgument),
}

/// Which document to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum DocumentType {
    Main,
    Parameters,
}

/// Produces documentation skeletons for the command named by its positional
/// arguments. Roots and groups produce nothing; an unknown path fails.
#[derive(Debug, Clone)]
pub struct DocumentationCommand {
    metadata: CommandMetadata,
    hidden: bool,
    document_type: Named1<String>,
    parameters_include: Named1<String>,
}

impl DocumentationCommand {
    /// Creates the command under `name`. Hidden commands stay out of
    /// listings.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::InvalidName`] if `name` is not a valid
    /// name.
    pub fn new(name: &str, hidden: bool) -> Result<Self, InvalidArgument> {
        Ok(Self {
            metadata: CommandMetadata::new(name, "Produce an xstructural documentation template.")?,
            hidden,
            document_type: Named1::new("--type", "The type of output.")?,
            parameters_include: Named1::new("--parameters-include", "The name of the file to include for parameters.")?
                .with_default("parameters.xml".to_string()),
        })
    }

    fn document_type(&self, context: &CommandContext) -> Result<DocumentType, DocumentError> {
        let text = context.parameter_value(&self.document_type)?;
        text.parse().map_err(|_| DocumentError::UnknownType(text))
    }

    fn render(
        &self,
        context: &CommandContext,
        document_type: DocumentType,
        target: &dyn Command,
    ) -> Result<Vec<u8>, DocumentError> {
        debug!(command = %target.metadata().name(), document = document_type.as_ref(), "rendering documentation");

        match document_type {
            DocumentType::Main => {
                let include = context.parameter_value(&self.parameters_include)?;
                main_document(context.localization(), target, &include)
            }
            DocumentType::Parameters => parameters_document(context.localization(), context.value_converters(), target),
        }
    }
}

impl Command for DocumentationCommand {
    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn named_parameters(&self) -> Vec<NamedParameter> {
        vec![self.document_type.parameter().clone(), self.parameters_include.parameter().clone()]
    }

    fn positional_parameters(&self) -> PositionalParameters {
        PositionalParameters::Any
    }

    fn execute(&self, context: &CommandContext) -> Result<CommandStatus, BoxError> {
        let document_type = self.document_type(context)?;
        match resolve(context.command_tree(), context.parameters_positional_raw()) {
            Resolution::Root | Resolution::Group { .. } => Ok(CommandStatus::Success),
            Resolution::NotFound { .. } => Ok(CommandStatus::Failure),
            Resolution::Command { command, .. } => {
                let bytes = self.render(context, document_type, &**command)?;
                let mut output = context.output();
                output.write_all(&bytes)?;
                output.flush()?;
                Ok(CommandStatus::Success)
            }
        }
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_names() {
        assert_eq!("main".parse::<DocumentType>().unwrap(), DocumentType::Main);
        assert_eq!("parameters".parse::<DocumentType>().unwrap(), DocumentType::Parameters);
        assert!("Main".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_declares_type_and_include() {
        let command = DocumentationCommand::new("docs", true).unwrap();
        let names: Vec<String> = command.named_parameters().iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, ["--type", "--parameters-include"]);
        assert!(command.is_hidden());
        assert!(matches!(command.positional_parameters(), PositionalParameters::Any));
    }

    #[test]
    fn test_invalid_name_is_rejected() {
        assert!(DocumentationCommand::new("two words", false).is_err());
    }
}
