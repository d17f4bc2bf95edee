use cmdtree_core::{
    BoxError, Command, CommandContext, CommandMetadata, CommandStatus, ConverterDirectory,
    Localization, Named0N, Named01, Named1, NamedDeclaration, NamedParameter, Positional,
    PositionalParameters, help_format_command,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Run {
    metadata: CommandMetadata,
    count: Named1<i32>,
    label: Named01<String>,
    tags: Named0N<String>,
    x: Positional<i32>,
}

impl Run {
    fn new() -> Self {
        Self {
            metadata: CommandMetadata::new("run", "Run it.")
                .unwrap()
                .with_long_description("First line.\nSecond line."),
            count: Named1::new("--count", "How many.")
                .unwrap()
                .with_alternative("-c")
                .unwrap(),
            label: Named01::new("--label", "A label.")
                .unwrap()
                .with_default("none".to_string()),
            tags: Named0N::new("--tag", "A tag.").unwrap(),
            x: Positional::new("x", "An x.").unwrap(),
        }
    }
}

impl Command for Run {
    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn named_parameters(&self) -> Vec<NamedParameter> {
        vec![
            self.tags.parameter().clone(),
            self.label.parameter().clone(),
            self.count.parameter().clone(),
        ]
    }

    fn positional_parameters(&self) -> PositionalParameters {
        PositionalParameters::typed([self.x.parameter()])
    }

    fn execute(&self, _context: &CommandContext) -> Result<CommandStatus, BoxError> {
        Ok(CommandStatus::Success)
    }
}

struct Bare {
    metadata: CommandMetadata,
}

impl Command for Bare {
    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn execute(&self, _context: &CommandContext) -> Result<CommandStatus, BoxError> {
        Ok(CommandStatus::Success)
    }
}

fn render(command: &dyn Command) -> String {
    let mut out = Vec::new();
    let path = vec!["tools".to_string(), command.metadata().name().to_string()];
    help_format_command(
        &ConverterDirectory::core(),
        &Localization::internal_only(),
        "app",
        &mut out,
        command,
        &path,
    )
    .unwrap();
    String::from_utf8(out).unwrap()
}

// ---------------------------------------------------------------------------
// Command help
// ---------------------------------------------------------------------------

#[test]
fn test_command_help_layout() {
    let text = render(&Run::new());
    let expected = "\
Usage: app tools run [named-arguments ...] <x>

  Run it.

  Named parameters:
  * --count
      Description       : How many.
      Type              : i32
      Cardinality       : [1]; Specify exactly once.
      Syntax            : -?(0 | [1-9][0-9]*)
      Alternative names : -c
    --label
      Description       : A label.
      Type              : String
      Cardinality       : [0, 1]; Specify at most once; the default is used if omitted.
      Default value     : none
      Syntax            : <any sequence of characters>
    --tag
      Description       : A tag.
      Type              : String
      Cardinality       : [0, N]; Specify zero or more times.
      Syntax            : <any sequence of characters>

  Positional parameters:
    x
      Type              : i32
      Description       : An x.
      Syntax            : -?(0 | [1-9][0-9]*)

  First line.
  Second line.

";
    assert_eq!(text, expected);
}

#[test]
fn test_command_help_without_parameters() {
    let bare = Bare {
        metadata: CommandMetadata::new("bare", "Nothing to see.").unwrap(),
    };
    let text = render(&bare);
    assert!(text.starts_with("Usage: app tools bare\n\n  Nothing to see.\n\n"), "{text}");
    assert!(text.contains("  The command does not accept any named parameters.\n"));
    assert!(text.contains("  The command does not accept any positional parameters.\n"));
}

#[test]
fn test_missing_converter_omits_syntax_and_default() {
    let mut out = Vec::new();
    let run = Run::new();
    help_format_command(
        &ConverterDirectory::empty(),
        &Localization::internal_only(),
        "app",
        &mut out,
        &run,
        &["run".to_string()],
    )
    .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(!text.contains("Syntax"));
    assert!(!text.contains("Default value"));
    assert!(text.contains("Cardinality       : [0, 1]; Specify at most once; the default is used if omitted."));
}
