//! Registering a converter for an application-defined type.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p cmdtree-demo --example custom_converter -- paint --color '#ff8800'
//! cargo run -p cmdtree-demo --example custom_converter -- help paint
//! ```

use std::io::Write;
use std::process::ExitCode;

use cmdtree_core::{
    Application, ApplicationBuilder, ApplicationMetadata, BoxError, Command, CommandContext, CommandMetadata,
    CommandStatus, ConversionError, ConverterDirectory, Named1, NamedDeclaration, NamedParameter,
    ValueConverter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rgb(u8, u8, u8);

struct RgbConverter;

impl ValueConverter for RgbConverter {
    type Value = Rgb;

    fn parse(&self, text: &str) -> Result<Rgb, ConversionError> {
        let hex = text
            .strip_prefix('#')
            .filter(|hex| hex.len() == 6 && hex.is_ascii())
            .ok_or_else(|| ConversionError::Other(format!("expected #rrggbb, got '{text}'")))?;
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16);
        Ok(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    fn print(&self, value: &Rgb) -> String {
        format!("#{:02x}{:02x}{:02x}", value.0, value.1, value.2)
    }

    fn example(&self) -> Rgb {
        Rgb(0xff, 0x88, 0x00)
    }

    fn syntax(&self) -> String {
        "#[0-9a-f]{6}".to_string()
    }
}

struct Paint {
    metadata: CommandMetadata,
    color: Named1<Rgb>,
}

impl Command for Paint {
    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn named_parameters(&self) -> Vec<NamedParameter> {
        vec![self.color.parameter().clone()]
    }

    fn execute(&self, context: &CommandContext) -> Result<CommandStatus, BoxError> {
        let Rgb(r, g, b) = context.parameter_value(&self.color)?;
        writeln!(context.output(), "painting with red={r} green={g} blue={b}")?;
        Ok(CommandStatus::Success)
    }
}

fn application() -> Result<Application, BoxError> {
    let mut builder = ApplicationBuilder::new(ApplicationMetadata::new(
        "painter",
        "com.example.painter",
        "0.1.0",
        "0000000",
        "Paints things.",
    ))
    .with_value_converters(ConverterDirectory::core().with(RgbConverter));

    builder.add_command(Paint {
        metadata: CommandMetadata::new("paint", "Paint with a color.")?,
        color: Named1::new("--color", "The color to paint with.")?.with_default(Rgb(0, 0, 0)),
    })?;
    Ok(builder.build())
}

fn main() -> ExitCode {
    match application() {
        Ok(app) => {
            let args: Vec<String> = std::env::args().skip(1).collect();
            app.run(&args).into()
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
