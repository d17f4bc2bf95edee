//! Property tests for names, converters, the resolver and the parser.

use std::sync::Arc;

use std::net::{Ipv4Addr, Ipv6Addr};

use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, FixedOffset};
use cmdtree_core::{
    BigDecimalConverter, BigIntegerConverter, BoxError, Cardinality, Command, CommandContext,
    CommandMetadata, CommandParser, CommandStatus, CommandTree, ConverterDirectory,
    DateTimeConverter, DurationConverter, F32Converter, F64Converter, HostConverter, I32Converter,
    I64Converter, Name, Named0N, Named01, Named1, Named1N, NamedDeclaration, NamedParameter,
    Output, PositionalParameters, Resolution, TreeBuilder, UuidConverter, ValueConverter,
    is_valid_name, resolve,
};
use num_bigint::BigInt;
use proptest::prelude::*;
use url::Host;
use uuid::Uuid;

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    }
}

struct Leaf {
    metadata: CommandMetadata,
}

impl Command for Leaf {
    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn positional_parameters(&self) -> PositionalParameters {
        PositionalParameters::Any
    }

    fn execute(&self, _context: &CommandContext) -> Result<CommandStatus, BoxError> {
        Ok(CommandStatus::Success)
    }
}

fn leaf(name: &str) -> Arc<dyn Command> {
    Arc::new(Leaf {
        metadata: CommandMetadata::new(name, "Leaf.").unwrap(),
    })
}

fn tree() -> CommandTree {
    let mut builder = TreeBuilder::new();
    builder.add_command(leaf("run")).unwrap();
    builder
        .create_group(CommandMetadata::new("group", "Group.").unwrap())
        .unwrap()
        .add_command(Leaf {
            metadata: CommandMetadata::new("inner", "Inner.").unwrap(),
        })
        .unwrap();
    builder.build()
}

fn token() -> impl Strategy<Value = String> {
    "[a-z0-9@#-]{1,8}"
}

/// One declaration of each named kind, followed by any positionals.
struct Mixed {
    metadata: CommandMetadata,
    one: Named1<i32>,
    optional: Named01<i32>,
    some: Named1N<i32>,
    many: Named0N<i32>,
}

impl Mixed {
    fn new() -> Self {
        Self {
            metadata: CommandMetadata::new("mixed", "Mixed.").unwrap(),
            one: Named1::new("--one", "One.").unwrap().with_default(1),
            optional: Named01::new("--optional", "Optional.").unwrap(),
            some: Named1N::new("--some", "Some.").unwrap().with_default(2),
            many: Named0N::new("--many", "Many.").unwrap().with_defaults([3, 4]),
        }
    }
}

impl Command for Mixed {
    fn metadata(&self) -> &CommandMetadata {
        &self.metadata
    }

    fn named_parameters(&self) -> Vec<NamedParameter> {
        vec![
            self.one.parameter().clone(),
            self.optional.parameter().clone(),
            self.some.parameter().clone(),
            self.many.parameter().clone(),
        ]
    }

    fn positional_parameters(&self) -> PositionalParameters {
        PositionalParameters::Any
    }

    fn execute(&self, _context: &CommandContext) -> Result<CommandStatus, BoxError> {
        Ok(CommandStatus::Success)
    }
}

fn host() -> impl Strategy<Value = Host<String>> {
    prop_oneof![
        any::<[u8; 4]>().prop_map(|b| Host::Ipv4(Ipv4Addr::from(b))),
        any::<[u16; 8]>().prop_map(|s| Host::Ipv6(Ipv6Addr::from(s))),
        "[a-z][a-z0-9]{0,10}(\\.[a-z][a-z0-9]{0,10}){0,3}".prop_map(Host::Domain),
    ]
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn test_names_without_whitespace_are_valid(text in "[a-zA-Z0-9_.-][a-zA-Z0-9_.@-]{0,15}") {
        prop_assert!(is_valid_name(&text));
        let name = Name::new(text.clone()).unwrap();
        prop_assert_eq!(name.as_str(), text.as_str());
    }

    #[test]
    fn test_names_with_whitespace_are_invalid(
        prefix in "[a-z]{0,4}",
        space in prop::sample::select(vec![" ", "\t", "\n", "\u{00a0}", "\u{2003}"]),
        suffix in "[a-z]{0,4}",
    ) {
        let text = format!("{prefix}{space}{suffix}");
        prop_assert!(!is_valid_name(&text));
        prop_assert!(Name::new(text).is_err());
    }

    #[test]
    fn test_names_starting_with_at_are_invalid(rest in "[a-z]{0,8}") {
        let text = format!("@{rest}");
        prop_assert!(!is_valid_name(&text));
    }
}

// ---------------------------------------------------------------------------
// Converters
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn test_integer_print_parses_back(a in any::<i32>(), b in any::<i64>()) {
        prop_assert_eq!(I32Converter.parse(&I32Converter.print(&a)).unwrap(), a);
        prop_assert_eq!(I64Converter.parse(&I64Converter.print(&b)).unwrap(), b);
    }

    #[test]
    fn test_uuid_print_parses_back(bytes in any::<[u8; 16]>()) {
        let value = Uuid::from_bytes(bytes);
        prop_assert_eq!(UuidConverter.parse(&UuidConverter.print(&value)).unwrap(), value);
    }

    #[test]
    fn test_float_print_parses_back(
        a in any::<f32>().prop_filter("finite", |v| v.is_finite()),
        b in any::<f64>().prop_filter("finite", |v| v.is_finite()),
    ) {
        prop_assert_eq!(F32Converter.parse(&F32Converter.print(&a)).unwrap(), a);
        prop_assert_eq!(F64Converter.parse(&F64Converter.print(&b)).unwrap(), b);
    }

    #[test]
    fn test_big_number_print_parses_back(digits in "-?[1-9][0-9]{0,40}", scale in -20i64..20) {
        let integer: BigInt = digits.parse().unwrap();
        prop_assert_eq!(BigIntegerConverter.parse(&BigIntegerConverter.print(&integer)).unwrap(), integer.clone());

        let decimal = BigDecimal::new(integer, scale);
        prop_assert_eq!(BigDecimalConverter.parse(&BigDecimalConverter.print(&decimal)).unwrap(), decimal);
    }

    #[test]
    fn test_duration_print_parses_back(
        seconds in 0i64..1_000_000_000_000,
        nanos in 0u32..1_000_000_000,
        negative in any::<bool>(),
    ) {
        let magnitude = Duration::new(seconds, nanos).unwrap();
        let value = if negative { -magnitude } else { magnitude };
        prop_assert_eq!(DurationConverter.parse(&DurationConverter.print(&value)).unwrap(), value);
    }

    #[test]
    fn test_datetime_print_parses_back(
        seconds in -10_000_000_000i64..10_000_000_000,
        nanos in 0u32..1_000_000_000,
        offset in -86_399i32..86_400,
    ) {
        let offset = FixedOffset::east_opt(offset).unwrap();
        let value = DateTime::from_timestamp(seconds, nanos).unwrap().with_timezone(&offset);
        let text = DateTimeConverter.print(&value);
        let parsed = DateTimeConverter.parse(&text).unwrap();
        prop_assert_eq!(parsed, value, "{}", text);
        prop_assert_eq!(parsed.offset(), value.offset(), "{}", text);
    }

    #[test]
    fn test_host_print_parses_back(value in host()) {
        prop_assert_eq!(HostConverter.parse(&HostConverter.print(&value)).unwrap(), value);
    }

    #[test]
    fn test_erased_print_matches_typed(value in any::<i32>()) {
        let directory = ConverterDirectory::core();
        let erased = directory.lookup_erased(cmdtree_core::ValueType::of::<i32>()).unwrap();
        let parsed = erased.parse_value(&value.to_string()).unwrap();
        prop_assert_eq!(erased.print_value(&*parsed), Some(value.to_string()));
    }
}

// ---------------------------------------------------------------------------
// Cardinality
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn test_every_named_parameter_is_within_its_cardinality(
        one in prop::option::of(any::<i32>()),
        optional in prop::option::of(any::<i32>()),
        some in prop::collection::vec(any::<i32>(), 0..4),
        many in prop::collection::vec(any::<i32>(), 0..4),
        rest in prop::collection::vec("[a-z0-9]{1,6}", 0..4),
    ) {
        let command = Mixed::new();
        let mut arguments = Vec::new();
        let mut occurrences = 0;
        for (key, value) in one.iter().map(|v| ("--one", v))
            .chain(optional.iter().map(|v| ("--optional", v)))
            .chain(some.iter().map(|v| ("--some", v)))
            .chain(many.iter().map(|v| ("--many", v)))
        {
            arguments.push(key.to_string());
            arguments.push(value.to_string());
            occurrences += 1;
        }
        arguments.extend(rest.iter().cloned());

        let declared = command.named_parameters();
        let command = Arc::new(command);
        let context = CommandParser::default()
            .execute(Arc::new(tree()), Output::buffer(), command.clone(), &arguments)
            .unwrap();

        let counts = [
            1,
            usize::from(context.parameter_optional(&command.optional).unwrap().is_some()),
            context.parameter_values(&command.some).unwrap().len(),
            context.parameter_values(&command.many).unwrap().len(),
        ];
        for (parameter, count) in declared.iter().zip(counts) {
            prop_assert!(parameter.cardinality().admits(count), "{} had {}", parameter.name(), count);
        }

        prop_assert_eq!(context.parameter_value(&command.one).unwrap(), one.unwrap_or(1));
        prop_assert_eq!(context.parameter_optional(&command.optional).unwrap(), optional);
        let expected_some = if some.is_empty() { vec![2] } else { some.clone() };
        prop_assert_eq!(context.parameter_values(&command.some).unwrap(), expected_some);
        let expected_many = if many.is_empty() { vec![3, 4] } else { many.clone() };
        prop_assert_eq!(context.parameter_values(&command.many).unwrap(), expected_many);

        prop_assert_eq!(
            context.parameters_positional_raw().len() + 2 * occurrences,
            arguments.len()
        );
        prop_assert_eq!(context.parameters_positional_raw(), rest.as_slice());
    }

    #[test]
    fn test_unbounded_cardinality_admits_everything_above_minimum(minimum in 0u32..4, count in 0usize..64) {
        let cardinality = Cardinality { minimum, maximum: Cardinality::UNBOUNDED };
        prop_assert_eq!(cardinality.admits(count), count >= minimum as usize);
    }
}

// ---------------------------------------------------------------------------
// Resolver and parser
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn test_command_remainder_is_everything_after_the_path(rest in prop::collection::vec(token(), 0..6)) {
        let tree = tree();

        let mut arguments = vec!["run".to_string()];
        arguments.extend(rest.iter().cloned());
        match resolve(&tree, &arguments) {
            Resolution::Command { path, remaining, .. } => {
                prop_assert_eq!(path, vec!["run".to_string()]);
                prop_assert_eq!(remaining, rest.clone());
            }
            other => prop_assert!(false, "unexpected {other:?}"),
        }

        let mut arguments = vec!["group".to_string(), "inner".to_string()];
        arguments.extend(rest.iter().cloned());
        match resolve(&tree, &arguments) {
            Resolution::Command { path, remaining, .. } => {
                prop_assert_eq!(path.len(), 2);
                prop_assert_eq!(remaining, rest);
            }
            other => prop_assert!(false, "unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unknown_first_token_is_not_found(name in "[A-Z]{1,8}") {
        let tree = tree();
        match resolve(&tree, &[name.clone()]) {
            Resolution::NotFound { path, name: missing } => {
                prop_assert_eq!(path, vec![name.clone()]);
                prop_assert_eq!(missing, name);
            }
            other => prop_assert!(false, "unexpected {other:?}"),
        }
    }

    #[test]
    fn test_any_positionals_are_passed_through(rest in prop::collection::vec(token(), 0..6)) {
        let context = CommandParser::default()
            .execute(Arc::new(tree()), Output::buffer(), leaf("run"), &rest)
            .unwrap();
        prop_assert_eq!(context.parameters_positional_raw(), rest.as_slice());
    }
}
