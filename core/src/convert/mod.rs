//! Value converters: bidirectional `String` ↔ `T` mappings with syntax and
//! example metadata.
//!
//! Every converter obeys `parse(print(x)) == x`, and its [`example`] value
//! round-trips the same way.
//!
//! [`example`]: ValueConverter::example

mod enums;
mod scalar;
mod time;

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

pub use enums::EnumConverter;
pub use scalar::{
    BigDecimalConverter, BigIntegerConverter, BooleanConverter, F32Converter, F64Converter,
    HostConverter, I32Converter, I64Converter, PathConverter, RegexConverter, StringConverter,
    UriConverter, UuidConverter,
};
pub use time::{DateTimeConverter, DurationConverter};

use crate::error::ConversionError;

/// Bound on every type a parameter may hold.
pub trait ParameterValue: Any + Clone + fmt::Debug + Send + Sync {}

impl<T: Any + Clone + fmt::Debug + Send + Sync> ParameterValue for T {}

/// A type-erased parsed value.
pub type Value = Arc<dyn Any + Send + Sync>;

/// Converts between strings and values of one type.
pub trait ValueConverter: Send + Sync {
    /// The target type.
    type Value: ParameterValue;

    /// Parses `text`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] if `text` is not in the converter's
    /// syntax.
    fn parse(&self, text: &str) -> Result<Self::Value, ConversionError>;

    /// Prints `value` such that [`parse`](Self::parse) returns an equal value.
    fn print(&self, value: &Self::Value) -> String;

    /// A representative value, used in documentation.
    fn example(&self) -> Self::Value;

    /// A short human-readable description of the accepted syntax.
    fn syntax(&self) -> String;
}

/// Identity and display name of a parameter's value type.
#[derive(Clone, Copy)]
pub struct ValueType {
    id: TypeId,
    name: &'static str,
}

impl ValueType {
    /// The value type of `T`.
    pub fn of<T: ParameterValue>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The type's identity.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The type name with module paths removed, e.g. `DateTime<FixedOffset>`.
    pub fn simple_name(&self) -> String {
        simple_name(self.name)
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ValueType {}

impl std::hash::Hash for ValueType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.simple_name())
    }
}

fn simple_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;

    for (index, c) in full.char_indices() {
        if matches!(c, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | ';' | '&') {
            let segment = &full[segment_start..index];
            out.push_str(segment.rsplit("::").next().unwrap_or(segment));
            out.push(c);
            segment_start = index + c.len_utf8();
        }
    }
    let segment = &full[segment_start..];
    out.push_str(segment.rsplit("::").next().unwrap_or(segment));
    out
}

/// A converter with its target type erased, as stored in a
/// [`ConverterDirectory`](crate::ConverterDirectory).
pub trait ErasedConverter: Send + Sync {
    /// The target type.
    fn value_type(&self) -> ValueType;

    /// Parses `text` into an erased value.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] if `text` is not in the converter's
    /// syntax.
    fn parse_value(&self, text: &str) -> Result<Value, ConversionError>;

    /// Prints an erased value, or returns `None` if it is not of the target
    /// type.
    fn print_value(&self, value: &(dyn Any + Send + Sync)) -> Option<String>;

    /// The printed form of the converter's example value.
    fn example_text(&self) -> String;

    /// See [`ValueConverter::syntax`].
    fn syntax(&self) -> String;

    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;
}

/// Erased wrapper that still remembers the typed converter.
pub(crate) struct Entry<T: ParameterValue> {
    pub(crate) typed: Arc<dyn ValueConverter<Value = T>>,
}

impl<T: ParameterValue> ErasedConverter for Entry<T> {
    fn value_type(&self) -> ValueType {
        ValueType::of::<T>()
    }

    fn parse_value(&self, text: &str) -> Result<Value, ConversionError> {
        let value = self.typed.parse(text)?;
        Ok(Arc::new(value))
    }

    fn print_value(&self, value: &(dyn Any + Send + Sync)) -> Option<String> {
        let value: &dyn Any = value;
        value.downcast_ref::<T>().map(|v| self.typed.print(v))
    }

    fn example_text(&self) -> String {
        self.typed.print(&self.typed.example())
    }

    fn syntax(&self) -> String {
        self.typed.syntax()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name_strips_paths() {
        assert_eq!(simple_name("i32"), "i32");
        assert_eq!(simple_name("alloc::string::String"), "String");
        assert_eq!(
            simple_name("chrono::datetime::DateTime<chrono::offset::fixed::FixedOffset>"),
            "DateTime<FixedOffset>"
        );
        assert_eq!(simple_name("url::host::Host<alloc::string::String>"), "Host<String>");
    }

    #[test]
    fn test_value_type_equality_is_by_type() {
        assert_eq!(ValueType::of::<i32>(), ValueType::of::<i32>());
        assert_ne!(ValueType::of::<i32>(), ValueType::of::<i64>());
        assert_eq!(ValueType::of::<String>().to_string(), "String");
    }

    #[test]
    fn test_entry_prints_only_matching_type() {
        let entry = Entry::<i32> {
            typed: Arc::new(I32Converter),
        };
        let value = entry.parse_value("42").unwrap();
        assert_eq!(entry.print_value(value.as_ref()).as_deref(), Some("42"));

        let other: Value = Arc::new(String::from("42"));
        assert!(entry.print_value(other.as_ref()).is_none());
    }
}
