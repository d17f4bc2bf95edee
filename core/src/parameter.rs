//! Parameter declarations.
//!
//! A command declares its named parameters with one of four cardinality
//! kinds and its positional parameters as one of [`PositionalParameters`]:
//!
//! | Declaration    | Cardinality | Default            |
//! |----------------|-------------|--------------------|
//! | [`Named1`]     | `[1, 1]`    | optional, single   |
//! | [`Named01`]    | `[0, 1]`    | optional, single   |
//! | [`Named1N`]    | `[1, N]`    | optional, single   |
//! | [`Named0N`]    | `[0, N]`    | list (may be empty)|
//!
//! Each declaration gets a process-unique [`ParameterId`] when constructed.
//! The parsed [`CommandContext`](crate::CommandContext) is keyed by that
//! identity, so two declarations of the same type never alias. Clones of a
//! declaration share its identity.
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::{Named01, Named1, NamedDeclaration};
//!
//! let file = Named1::<String>::new("--file", "The input file.")
//!     .unwrap()
//!     .with_alternative("-f")
//!     .unwrap();
//! let count = Named01::<i32>::new("--count", "How many.").unwrap().with_default(3);
//!
//! assert!(file.parameter().is_required());
//! assert!(!count.parameter().is_required());
//! assert_eq!(file.parameter().alternatives()[0].as_str(), "-f");
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::convert::{ParameterValue, Value, ValueType};
use crate::error::InvalidArgument;
use crate::names::Name;
use crate::strings::StringRef;

static NEXT_PARAMETER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a parameter declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParameterId(u64);

impl ParameterId {
    fn next() -> Self {
        Self(NEXT_PARAMETER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Permitted number of values for a named parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cardinality {
    /// Fewest values accepted.
    pub minimum: u32,
    /// Most values accepted; [`Cardinality::UNBOUNDED`] for no limit.
    pub maximum: u32,
}

impl Cardinality {
    /// Marker for an unbounded maximum.
    pub const UNBOUNDED: u32 = u32::MAX;

    /// Returns `true` if `count` values satisfy this cardinality.
    pub fn admits(&self, count: usize) -> bool {
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        count >= self.minimum && count <= self.maximum
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.maximum == Self::UNBOUNDED {
            write!(f, "[{}, N]", self.minimum)
        } else {
            write!(f, "[{}, {}]", self.minimum, self.maximum)
        }
    }
}

/// The cardinality kind of a named parameter, with its defaults.
#[derive(Clone)]
pub enum NamedKind {
    /// Exactly one value.
    One {
        /// Used when the parameter is not provided.
        default: Option<Value>,
    },
    /// At most one value.
    ZeroOrOne {
        /// Used when the parameter is not provided.
        default: Option<Value>,
    },
    /// At least one value.
    OneOrMore {
        /// Used when the parameter is not provided.
        default: Option<Value>,
    },
    /// Any number of values.
    ZeroOrMore {
        /// Used, in order, when the parameter is not provided.
        defaults: Vec<Value>,
    },
}

impl NamedKind {
    /// The cardinality bounds of this kind.
    pub fn cardinality(&self) -> Cardinality {
        let (minimum, maximum) = match self {
            Self::One { .. } => (1, 1),
            Self::ZeroOrOne { .. } => (0, 1),
            Self::OneOrMore { .. } => (1, Cardinality::UNBOUNDED),
            Self::ZeroOrMore { .. } => (0, Cardinality::UNBOUNDED),
        };
        Cardinality { minimum, maximum }
    }

    /// The default values, in order.
    pub fn defaults(&self) -> &[Value] {
        match self {
            Self::One { default } | Self::ZeroOrOne { default } | Self::OneOrMore { default } => {
                default.as_slice()
            }
            Self::ZeroOrMore { defaults } => defaults,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::One { .. } => "Named1",
            Self::ZeroOrOne { .. } => "Named01",
            Self::OneOrMore { .. } => "Named1N",
            Self::ZeroOrMore { .. } => "Named0N",
        }
    }
}

impl fmt::Debug for NamedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.label())
            .field("defaults", &self.defaults().len())
            .finish()
    }
}

/// A named parameter declaration with its value type erased.
#[derive(Debug, Clone)]
pub struct NamedParameter {
    id: ParameterId,
    name: Name,
    alternatives: Vec<Name>,
    description: StringRef,
    value_type: ValueType,
    kind: NamedKind,
}

impl NamedParameter {
    /// The declaration's identity.
    pub fn id(&self) -> ParameterId {
        self.id
    }

    /// The primary name.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Alternative names, in declaration order.
    pub fn alternatives(&self) -> &[Name] {
        &self.alternatives
    }

    /// The primary name followed by each alternative.
    pub fn all_names(&self) -> impl Iterator<Item = &Name> {
        std::iter::once(&self.name).chain(self.alternatives.iter())
    }

    /// The description.
    pub fn description(&self) -> &StringRef {
        &self.description
    }

    /// The value type.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// The cardinality kind and defaults.
    pub fn kind(&self) -> &NamedKind {
        &self.kind
    }

    /// Shorthand for `kind().cardinality()`.
    pub fn cardinality(&self) -> Cardinality {
        self.kind.cardinality()
    }

    /// `true` for a [`Named1`] with no default: it must appear on the
    /// command line.
    pub fn is_required(&self) -> bool {
        matches!(self.kind, NamedKind::One { default: None })
    }
}

/// Implemented by the typed named declarations.
pub trait NamedDeclaration {
    /// The parsed value type.
    type Value: ParameterValue;

    /// The erased declaration.
    fn parameter(&self) -> &NamedParameter;
}

/// Named declarations that may hold more than one value.
pub trait ListDeclaration: NamedDeclaration {}

fn check_alternative(parameter: &NamedParameter, alternative: &str) -> Result<Name, InvalidArgument> {
    let name = Name::new(alternative)?;
    if parameter.all_names().any(|existing| existing == &name) {
        return Err(InvalidArgument::DuplicateAlternative {
            parameter: parameter.name.to_string(),
            alternative: name.into_string(),
        });
    }
    Ok(name)
}

macro_rules! named_declaration {
    ($(#[$meta:meta])* $ty:ident, $initial:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $ty<T> {
            inner: NamedParameter,
            _marker: PhantomData<fn() -> T>,
        }

        impl<T: ParameterValue> $ty<T> {
            /// Declares a parameter with no alternatives and no default.
            ///
            /// # Errors
            ///
            /// Returns [`InvalidArgument::InvalidName`] if `name` is not a
            /// valid name.
            pub fn new(name: &str, description: impl Into<StringRef>) -> Result<Self, InvalidArgument> {
                Ok(Self {
                    inner: NamedParameter {
                        id: ParameterId::next(),
                        name: Name::new(name)?,
                        alternatives: Vec::new(),
                        description: description.into(),
                        value_type: ValueType::of::<T>(),
                        kind: $initial,
                    },
                    _marker: PhantomData,
                })
            }

            /// Adds an alternative name.
            ///
            /// # Errors
            ///
            /// Returns [`InvalidArgument::InvalidName`] for an invalid name,
            /// or [`InvalidArgument::DuplicateAlternative`] if the parameter
            /// already answers to it.
            pub fn with_alternative(mut self, alternative: &str) -> Result<Self, InvalidArgument> {
                let name = check_alternative(&self.inner, alternative)?;
                self.inner.alternatives.push(name);
                Ok(self)
            }

            /// The primary name.
            pub fn name(&self) -> &Name {
                &self.inner.name
            }

            /// The declaration's identity.
            pub fn id(&self) -> ParameterId {
                self.inner.id
            }
        }

        impl<T: ParameterValue> NamedDeclaration for $ty<T> {
            type Value = T;

            fn parameter(&self) -> &NamedParameter {
                &self.inner
            }
        }
    };
}

named_declaration!(
    /// A named parameter that takes exactly one value. Without a default it
    /// is required.
    Named1,
    NamedKind::One { default: None }
);
named_declaration!(
    /// A named parameter that takes at most one value.
    Named01,
    NamedKind::ZeroOrOne { default: None }
);
named_declaration!(
    /// A named parameter that takes one or more values.
    Named1N,
    NamedKind::OneOrMore { default: None }
);
named_declaration!(
    /// A named parameter that takes any number of values.
    Named0N,
    NamedKind::ZeroOrMore { defaults: Vec::new() }
);

impl<T: ParameterValue> ListDeclaration for Named1N<T> {}
impl<T: ParameterValue> ListDeclaration for Named0N<T> {}

impl<T: ParameterValue> Named1<T> {
    /// Sets the value used when the parameter is not provided.
    pub fn with_default(mut self, value: T) -> Self {
        self.inner.kind = NamedKind::One {
            default: Some(Arc::new(value)),
        };
        self
    }
}

impl<T: ParameterValue> Named01<T> {
    /// Sets the value used when the parameter is not provided.
    pub fn with_default(mut self, value: T) -> Self {
        self.inner.kind = NamedKind::ZeroOrOne {
            default: Some(Arc::new(value)),
        };
        self
    }
}

impl<T: ParameterValue> Named1N<T> {
    /// Sets the single value used when the parameter is not provided.
    pub fn with_default(mut self, value: T) -> Self {
        self.inner.kind = NamedKind::OneOrMore {
            default: Some(Arc::new(value)),
        };
        self
    }
}

impl<T: ParameterValue> Named0N<T> {
    /// Sets the values used, in order, when the parameter is not provided.
    pub fn with_defaults(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.inner.kind = NamedKind::ZeroOrMore {
            defaults: values
                .into_iter()
                .map(|v| Arc::new(v) as Value)
                .collect(),
        };
        self
    }
}

/// A positional parameter declaration with its value type erased.
#[derive(Debug, Clone)]
pub struct PositionalParameter {
    id: ParameterId,
    name: Name,
    description: StringRef,
    value_type: ValueType,
}

impl PositionalParameter {
    /// The declaration's identity.
    pub fn id(&self) -> ParameterId {
        self.id
    }

    /// The name, used in usage text and errors.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The description.
    pub fn description(&self) -> &StringRef {
        &self.description
    }

    /// The value type.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }
}

/// A typed positional parameter.
#[derive(Debug, Clone)]
pub struct Positional<T> {
    inner: PositionalParameter,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ParameterValue> Positional<T> {
    /// Declares a positional parameter.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::InvalidName`] if `name` is not a valid
    /// name.
    pub fn new(name: &str, description: impl Into<StringRef>) -> Result<Self, InvalidArgument> {
        Ok(Self {
            inner: PositionalParameter {
                id: ParameterId::next(),
                name: Name::new(name)?,
                description: description.into(),
                value_type: ValueType::of::<T>(),
            },
            _marker: PhantomData,
        })
    }

    /// The erased declaration.
    pub fn parameter(&self) -> &PositionalParameter {
        &self.inner
    }

    /// The name.
    pub fn name(&self) -> &Name {
        &self.inner.name
    }
}

/// The positional parameters a command accepts.
#[derive(Debug, Clone, Default)]
pub enum PositionalParameters {
    /// No positional arguments.
    #[default]
    None,
    /// Exactly these, in order.
    Typed(Vec<PositionalParameter>),
    /// Any number of raw, unconverted arguments.
    Any,
}

impl PositionalParameters {
    /// Shorthand for [`PositionalParameters::Typed`] over typed declarations'
    /// erased forms.
    pub fn typed<'a>(parameters: impl IntoIterator<Item = &'a PositionalParameter>) -> Self {
        Self::Typed(parameters.into_iter().cloned().collect())
    }

    /// Index of the declaration with `id` in a typed set.
    pub(crate) fn index_of(&self, id: ParameterId) -> Option<usize> {
        match self {
            Self::Typed(parameters) => parameters.iter().position(|p| p.id == id),
            Self::None | Self::Any => None,
        }
    }
}
