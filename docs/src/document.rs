//! Structural XML documents describing one command.

use cmdtree_core::{Command, ConverterDirectory, Localization, NamedKind, NamedParameter};
use quick_xml::Writer;
use md5::{Digest, Md5};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use uuid::{Builder, Uuid};

use crate::DocumentError;

/// Default namespace of every generated document.
pub const NAMESPACE: &str = "urn:com.io7m.structural:8:0";

/// Namespace of `xi:include`.
pub const NAMESPACE_XINCLUDE: &str = "http://www.w3.org/2001/XInclude";

/// Small wrapper that keeps element bookkeeping out of the renderers.
struct Document {
    writer: Writer<Vec<u8>>,
}

impl Document {
    fn new() -> Result<Self, DocumentError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(Self { writer })
    }

    fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), DocumentError> {
        let mut element = BytesStart::new(name);
        element.extend_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Start(element))?;
        Ok(())
    }

    fn end(&mut self, name: &str) -> Result<(), DocumentError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<(), DocumentError> {
        let mut element = BytesStart::new(name);
        element.extend_attributes(attributes.iter().copied());
        self.writer.write_event(Event::Empty(element))?;
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), DocumentError> {
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    fn element(&mut self, name: &str, attributes: &[(&str, &str)], text: &str) -> Result<(), DocumentError> {
        self.start(name, attributes)?;
        self.text(text)?;
        self.end(name)
    }

    fn finish(self) -> Vec<u8> {
        let mut bytes = self.writer.into_inner();
        bytes.push(b'\n');
        bytes
    }
}

/// The stable id of a command's main section.
pub fn section_id(command: &dyn Command) -> Uuid {
    let metadata = command.metadata();
    let key = format!("{}{}", metadata.name(), metadata.short_description());
    name_uuid(key.as_bytes())
}

/// The stable id of a parameter's table within a command.
pub fn parameter_id(command: &dyn Command, parameter: &NamedParameter) -> Uuid {
    let key = format!("{}:{}", command.metadata().name(), parameter.name());
    name_uuid(key.as_bytes())
}

/// A version 3 UUID over the MD5 of `data` alone, with no namespace prefix.
fn name_uuid(data: &[u8]) -> Uuid {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&Md5::digest(data));
    Builder::from_md5_bytes(bytes).into_uuid()
}

/// Renders the main section skeleton for `command`: its name, a description
/// stub that includes `parameters_include` when the command has named
/// parameters, and an examples stub.
///
/// # Errors
///
/// Returns [`DocumentError::Xml`] or [`DocumentError::Io`] if writing fails.
pub fn main_document(
    localization: &Localization,
    command: &dyn Command,
    parameters_include: &str,
) -> Result<Vec<u8>, DocumentError> {
    let metadata = command.metadata();
    let name = metadata.name().as_str();
    let id = section_id(command).to_string();

    let mut doc = Document::new()?;
    doc.start(
        "Section",
        &[
            ("xmlns", NAMESPACE),
            ("xmlns:xi", NAMESPACE_XINCLUDE),
            ("title", name),
            ("id", id.as_str()),
        ],
    )?;

    doc.start("Subsection", &[("title", "Name")])?;
    doc.start("Paragraph", &[])?;
    doc.element("Term", &[("type", "command")], name)?;
    doc.text(&format!(" - {}", localization.localize(metadata.short_description())))?;
    doc.end("Paragraph")?;
    doc.end("Subsection")?;

    doc.start("Subsection", &[("title", "Description")])?;
    doc.start("Paragraph", &[])?;
    doc.text("The ")?;
    doc.element("Term", &[("type", "command")], name)?;
    doc.text(" command... ")?;
    doc.end("Paragraph")?;
    if !command.named_parameters().is_empty() {
        doc.start("FormalItem", &[("title", "Parameters")])?;
        doc.empty("xi:include", &[("href", parameters_include)])?;
        doc.end("FormalItem")?;
    }
    doc.end("Subsection")?;

    doc.start("Subsection", &[("title", "Examples")])?;
    doc.start("FormalItem", &[("title", "Example"), ("type", "example")])?;
    doc.element("Verbatim", &[], "...")?;
    doc.end("FormalItem")?;
    doc.end("Subsection")?;

    doc.end("Section")?;
    Ok(doc.finish())
}

/// Renders one parameter table per named parameter of `command`, sorted by
/// name.
///
/// # Errors
///
/// Returns [`DocumentError::NoConverter`] if a parameter's type has no
/// converter in `converters`, or a write error.
pub fn parameters_document(
    localization: &Localization,
    converters: &ConverterDirectory,
    command: &dyn Command,
) -> Result<Vec<u8>, DocumentError> {
    let mut named = command.named_parameters();
    named.sort_by(|a, b| a.name().as_str().cmp(b.name().as_str()));

    let mut doc = Document::new()?;
    doc.start("Subsection", &[("xmlns", NAMESPACE), ("title", "Parameters")])?;

    for parameter in &named {
        let id = parameter_id(command, parameter).to_string();
        doc.start("FormalItem", &[("title", parameter.name().as_str()), ("id", id.as_str())])?;
        doc.start("Table", &[("type", "parameterTable")])?;

        doc.start("Columns", &[])?;
        doc.element("Column", &[], "Attribute")?;
        doc.element("Column", &[], "Value")?;
        doc.end("Columns")?;

        term_row(&mut doc, "Name", "parameter", parameter.name().as_str())?;
        term_row(&mut doc, "Type", "class", parameter.value_type().name())?;
        term_row(&mut doc, "Default Value", "constant", &defaults_text(converters, parameter)?)?;
        term_row(&mut doc, "Cardinality", "expression", &parameter.cardinality().to_string())?;

        doc.start("Row", &[])?;
        doc.element("Cell", &[], "Description")?;
        doc.element("Cell", &[], &localization.localize(parameter.description()))?;
        doc.end("Row")?;

        doc.end("Table")?;
        doc.end("FormalItem")?;
    }

    doc.end("Subsection")?;
    Ok(doc.finish())
}

fn term_row(doc: &mut Document, label: &str, term_type: &str, value: &str) -> Result<(), DocumentError> {
    doc.start("Row", &[])?;
    doc.element("Cell", &[], label)?;
    doc.start("Cell", &[])?;
    doc.element("Term", &[("type", term_type)], value)?;
    doc.end("Cell")?;
    doc.end("Row")
}

/// `[a, b]` for list kinds, the bare value otherwise, empty when there is no
/// default.
fn defaults_text(converters: &ConverterDirectory, parameter: &NamedParameter) -> Result<String, DocumentError> {
    let converter = converters
        .lookup_erased(parameter.value_type())
        .ok_or_else(|| DocumentError::NoConverter {
            parameter: parameter.name().to_string(),
            value_type: parameter.value_type().simple_name(),
        })?;

    let printed: Vec<String> = parameter
        .kind()
        .defaults()
        .iter()
        .filter_map(|value| converter.print_value(&**value))
        .collect();

    Ok(match parameter.kind() {
        NamedKind::One { .. } | NamedKind::ZeroOrOne { .. } => printed.join(""),
        NamedKind::OneOrMore { .. } | NamedKind::ZeroOrMore { .. } => format!("[{}]", printed.join(", ")),
    })
}

#[cfg(test)]
mod tests {
    use cmdtree_core::{
        BoxError, CommandContext, CommandMetadata, CommandStatus, Named0N, Named1, NamedDeclaration,
    };

    use super::*;

    struct Sample {
        metadata: CommandMetadata,
        count: Named1<i32>,
        tags: Named0N<String>,
    }

    impl Sample {
        fn new() -> Self {
            Self {
                metadata: CommandMetadata::new("sample", "A <sample> command.").unwrap(),
                count: Named1::new("--count", "How many.").unwrap().with_default(3),
                tags: Named0N::new("--tag", "Tags.").unwrap().with_defaults(["a".to_string(), "b".to_string()]),
            }
        }
    }

    impl Command for Sample {
        fn metadata(&self) -> &CommandMetadata {
            &self.metadata
        }

        fn named_parameters(&self) -> Vec<NamedParameter> {
            vec![self.tags.parameter().clone(), self.count.parameter().clone()]
        }

        fn execute(&self, _context: &CommandContext) -> Result<CommandStatus, BoxError> {
            Ok(CommandStatus::Success)
        }
    }

    #[test]
    fn test_ids_are_stable() {
        let sample = Sample::new();
        assert_eq!(section_id(&sample), section_id(&Sample::new()));
        let parameters = sample.named_parameters();
        assert_ne!(parameter_id(&sample, &parameters[0]), parameter_id(&sample, &parameters[1]));
        assert_eq!(section_id(&sample).get_version_num(), 3);
    }

    #[test]
    fn test_name_uuid_hashes_bare_bytes() {
        assert_eq!(name_uuid(b"").to_string(), "d41d8cd9-8f00-3204-a980-0998ecf8427e");
        assert_eq!(name_uuid(b"abc").to_string(), "90015098-3cd2-3fb0-9696-3f7d28e17f72");
        assert_eq!(name_uuid(b"abc").get_variant(), uuid::Variant::RFC4122);
    }

    #[test]
    fn test_ids_hash_name_and_description() {
        let sample = Sample::new();
        let metadata = sample.metadata();
        let key = format!("{}{}", metadata.name(), metadata.short_description());
        assert_eq!(section_id(&sample), name_uuid(key.as_bytes()));
        let parameters = sample.named_parameters();
        let key = format!("{}:{}", metadata.name(), parameters[0].name());
        assert_eq!(parameter_id(&sample, &parameters[0]), name_uuid(key.as_bytes()));
    }

    #[test]
    fn test_defaults_text_by_kind() {
        let sample = Sample::new();
        let converters = ConverterDirectory::core();
        assert_eq!(defaults_text(&converters, sample.count.parameter()).unwrap(), "3");
        assert_eq!(defaults_text(&converters, sample.tags.parameter()).unwrap(), "[a, b]");
    }

    #[test]
    fn test_missing_converter() {
        let sample = Sample::new();
        let error = defaults_text(&ConverterDirectory::empty(), sample.count.parameter()).unwrap_err();
        assert!(matches!(error, DocumentError::NoConverter { .. }));
    }

    #[test]
    fn test_text_is_escaped() {
        let bytes = main_document(&Localization::internal_only(), &Sample::new(), "p.xml").unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("A &lt;sample&gt; command."), "{text}");
    }
}
