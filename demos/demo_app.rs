//! Example application exercising every parameter kind, a command group,
//! hidden commands, the documentation command and the logging bridge.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p cmdtree-demo
//! cargo run -p cmdtree-demo -- help cmd-everything
//! cargo run -p cmdtree-demo -- cmd-everything --2number-opt 1 10 20 30
//! cargo run -p cmdtree-demo -- animal cat --verbose debug
//! cargo run -p cmdtree-demo -- xstructural --type main cmd-everything
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, FixedOffset, Utc};
use cmdtree_core::{
    Application, ApplicationBuilder, ApplicationMetadata, BoxError, Command, CommandContext,
    CommandMetadata, CommandStatus, ConverterDirectory, InvalidArgument, Named0N, Named01, Named1,
    Named1N, NamedDeclaration, NamedParameter, Output, Positional, PositionalParameters,
    StringBundle, StringRef,
};
use cmdtree_docs::DocumentationCommand;
use cmdtree_logging::{Verbosity, register_converters};
use url::{Host, Url};
use uuid::Uuid;

const EVERYTHING_TEXT: &str = "\
Farmer Bertram was in bed when the stranger entered, having had a fall
from his horse while hunting.
The horseman said his business was of such pressing importance that he
must see the farmer at once.";

/// A command that declares one of each parameter kind and prints what it
/// was given.
struct Everything {
    metadata: CommandMetadata,
    file: Named01<String>,
    number: Named01<i32>,
    number_required: Named1<i32>,
    date: Named1<DateTime<FixedOffset>>,
    hosts: Named0N<Host<String>>,
    uuids: Named0N<Uuid>,
    paths: Named1N<PathBuf>,
    uris: Named1N<Url>,
    x: Positional<i32>,
    y: Positional<i32>,
    z: Positional<i32>,
}

impl Everything {
    fn new() -> Result<Self, BoxError> {
        Ok(Self {
            metadata: CommandMetadata::new("cmd-everything", "A command with everything.")?
                .with_long_description(EVERYTHING_TEXT),
            file: Named01::new("--0file", "A file.")?
                .with_alternative("-x")?
                .with_alternative("-y")?
                .with_alternative("-z")?,
            number: Named01::new("--1number", "A number.")?.with_default(23),
            number_required: Named1::new("--2number-opt", "A number.")?,
            date: Named1::new("--3date", "A date.")?.with_default(Utc::now().fixed_offset()),
            hosts: Named0N::new("--4net", "A network address.")?,
            uuids: Named0N::new("--5uuid", "A UUID.")?.with_defaults([Uuid::new_v4()]),
            paths: Named1N::new("--6path", "A path.")?,
            uris: Named1N::new("--7uri", "A URI.")?.with_default(Url::parse("urn:x")?),
            x: Positional::new("x", "An x.")?,
            y: Positional::new("y", "A y.")?,
            z: Positional::new("z", "A z.")?,
        })
    }
}

impl Command for Everything {
    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn named_parameters(&self) -> Vec<NamedParameter> {
        vec![
            self.file.parameter().clone(),
            self.number.parameter().clone(),
            self.number_required.parameter().clone(),
            self.date.parameter().clone(),
            self.hosts.parameter().clone(),
            self.uuids.parameter().clone(),
            self.paths.parameter().clone(),
            self.uris.parameter().clone(),
        ]
    }

    fn positional_parameters(&self) -> PositionalParameters {
        PositionalParameters::typed([self.x.parameter(), self.y.parameter(), self.z.parameter()])
    }

    fn execute(&self, context: &CommandContext) -> Result<CommandStatus, BoxError> {
        let mut w = context.output();
        writeln!(w, "{:?}", context.parameter_optional(&self.file)?)?;
        writeln!(w, "{:?}", context.parameter_optional(&self.number)?)?;
        writeln!(w, "{}", context.parameter_value(&self.number_required)?)?;
        writeln!(w, "{}", context.parameter_value(&self.date)?.to_rfc3339())?;
        writeln!(w, "{:?}", context.parameter_values(&self.hosts)?)?;
        writeln!(w, "{:?}", context.parameter_values(&self.uuids)?)?;
        writeln!(w, "{:?}", context.parameter_values(&self.paths)?)?;
        let uris: Vec<String> = context.parameter_values(&self.uris)?.iter().map(Url::to_string).collect();
        writeln!(w, "{uris:?}")?;
        writeln!(w, "{}", context.positional_value(&self.x)?)?;
        writeln!(w, "{}", context.positional_value(&self.y)?)?;
        writeln!(w, "{}", context.positional_value(&self.z)?)?;
        w.flush()?;
        Ok(CommandStatus::Success)
    }
}

/// `cmd-0 [--file f]`: accepts a file and does nothing with it.
struct Cmd0 {
    metadata: CommandMetadata,
    file: Named01<String>,
}

impl Cmd0 {
    fn new() -> Result<Self, InvalidArgument> {
        Ok(Self {
            metadata: CommandMetadata::new("cmd-0", "Command 0.")?,
            file: Named01::new("--file", "A file.")?,
        })
    }
}

impl Command for Cmd0 {
    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn named_parameters(&self) -> Vec<NamedParameter> {
        vec![self.file.parameter().clone()]
    }

    fn execute(&self, _context: &CommandContext) -> Result<CommandStatus, BoxError> {
        Ok(CommandStatus::Success)
    }
}

/// `meta converters`: lists the types the application can convert.
struct Meta {
    metadata: CommandMetadata,
}

impl Command for Meta {
    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn positional_parameters(&self) -> PositionalParameters {
        PositionalParameters::Any
    }

    fn execute(&self, context: &CommandContext) -> Result<CommandStatus, BoxError> {
        if context.parameters_positional_raw().first().map(String::as_str) == Some("converters") {
            let mut names: Vec<&str> = context.value_converters().value_types().iter().map(|t| t.name()).collect();
            names.sort_unstable();
            let mut w = context.output();
            for name in names {
                writeln!(w, "{name}")?;
            }
            w.flush()?;
        }
        Ok(CommandStatus::Success)
    }

    fn is_hidden(&self) -> bool {
        true
    }
}

/// An animal in the `animal` group. Logs at debug level before speaking.
struct Animal {
    metadata: CommandMetadata,
    verbosity: Verbosity,
    sound: &'static str,
}

impl Animal {
    fn new(name: &str, sound: &'static str) -> Result<Self, InvalidArgument> {
        Ok(Self {
            metadata: CommandMetadata::new(name, StringRef::key(format!("animal.{name}")))?,
            verbosity: Verbosity::new()?,
            sound,
        })
    }
}

impl Command for Animal {
    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn named_parameters(&self) -> Vec<NamedParameter> {
        self.verbosity.parameters()
    }

    fn execute(&self, context: &CommandContext) -> Result<CommandStatus, BoxError> {
        self.verbosity.configure(context)?;
        tracing::debug!(animal = %self.metadata.name(), "clearing throat");
        writeln!(context.output(), "{}", self.sound)?;
        Ok(CommandStatus::Success)
    }
}

fn strings() -> StringBundle {
    StringBundle::from_pairs([
        ("animal.cat", "Hear a cat speak."),
        ("animal.dog", "Hear a dog speak."),
        ("animal.cow", "Hear a cow speak."),
    ])
}

fn application(output: Output) -> Result<Application, BoxError> {
    let metadata = ApplicationMetadata::new(
        "cmdtree-demo",
        "com.example.cmdtree.demo",
        "1.2.0",
        "eacd59a2",
        "The cmdtree example application.",
    )
    .with_site(Url::parse("https://docs.example.com/cmdtree/")?);

    let mut builder = ApplicationBuilder::new(metadata)
        .with_value_converters(register_converters(&ConverterDirectory::core())?)
        .with_application_strings(strings())
        .with_output(output);

    builder.add_command(Cmd0::new()?)?;
    builder.add_command(Everything::new()?)?;
    builder.add_command(Meta {
        metadata: CommandMetadata::new("meta", "Display hidden application metadata.")?,
    })?;
    builder.add_command(DocumentationCommand::new("xstructural", true)?)?;
    {
        let group = builder.create_command_group(
            CommandMetadata::new("animal", "Hear an animal speak.")?.with_long_description("A long description."),
        )?;
        group.add_command(Animal::new("cat", "Meow!")?)?;
        group.add_command(Animal::new("dog", "Woof!")?)?;
        group.add_command(Animal::new("cow", "Moo!")?)?;
    }
    Ok(builder.build())
}

fn main() -> ExitCode {
    let app = match application(Output::stdout()) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let args: Vec<String> = std::env::args().skip(1).collect();
    app.run(&args).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(tokens: &[&str]) -> (CommandStatus, String) {
        let output = Output::buffer();
        let app = application(output.clone()).unwrap();
        let args: Vec<String> = tokens.iter().map(|s| s.to_string()).collect();
        (app.run(&args), output.contents())
    }

    #[test]
    fn test_everything_prints_parsed_values() {
        let (status, text) = run(&[
            "cmd-everything",
            "-y",
            "other.txt",
            "--2number-opt",
            "344",
            "--3date",
            "2000-01-01T00:03:00+00:00",
            "--4net",
            "[::1]",
            "--6path",
            "/tmp",
            "1000",
            "2000",
            "3000",
        ]);
        assert_eq!(status, CommandStatus::Success);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Some(\"other.txt\")");
        assert_eq!(lines[1], "Some(23)");
        assert_eq!(lines[2], "344");
        assert_eq!(lines[3], "2000-01-01T00:03:00+00:00");
        assert_eq!(lines[7], "[\"urn:x\"]");
        assert_eq!(&lines[8..], ["1000", "2000", "3000"]);
    }

    #[test]
    fn test_usage_hides_meta_and_docs() {
        let (status, text) = run(&[]);
        assert_eq!(status, CommandStatus::Success);
        assert!(text.contains("    animal"));
        assert!(text.contains("    cmd-everything"));
        assert!(!text.contains("xstructural"));
        assert!(!text.contains("    meta"));
        assert!(text.contains("https://docs.example.com/cmdtree/"));
    }

    #[test]
    fn test_meta_lists_converters() {
        let (_, text) = run(&["meta", "converters"]);
        assert!(text.lines().any(|l| l == "i32"));
        assert!(text.lines().any(|l| l == "cmdtree_logging::LogLevel"));
    }

    #[test]
    fn test_animal_group_help_uses_application_strings() {
        let (status, text) = run(&["animal"]);
        assert_eq!(status, CommandStatus::Success);
        assert!(text.contains("    cat    Hear a cat speak.\n"), "{text}");
        assert!(text.contains("  A long description.\n"));
    }

    #[test]
    fn test_version() {
        assert_eq!(
            run(&["version"]),
            (CommandStatus::Success, "com.example.cmdtree.demo 1.2.0 eacd59a2\n".to_string())
        );
    }

    #[test]
    fn test_arguments_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("args.txt");
        std::fs::write(&path, "# pick an animal\nanimal\ndog\n").unwrap();
        let (status, text) = run(&[&format!("@{}", path.display())]);
        assert_eq!(status, CommandStatus::Success);
        assert_eq!(text, "Woof!\n");
    }
}
