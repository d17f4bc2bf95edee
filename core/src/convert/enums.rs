use std::marker::PhantomData;

use strum::IntoEnumIterator;

use super::{ParameterValue, ValueConverter};
use crate::error::{ConversionError, InvalidArgument};

/// Converter for enumerations whose variants carry textual names.
///
/// Works with any enum deriving `strum::EnumIter` and `strum::AsRefStr`.
/// Lookup is by exact variant name; the syntax is the sorted names joined
/// with `|`.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{EnumConverter, ValueConverter};
/// use strum::{AsRefStr, EnumIter};
///
/// #[derive(Debug, Clone, Copy, PartialEq, EnumIter, AsRefStr)]
/// #[strum(serialize_all = "lowercase")]
/// enum Animal { Dog, Cat }
///
/// let converter = EnumConverter::<Animal>::new().unwrap();
/// assert_eq!(converter.parse("cat").unwrap(), Animal::Cat);
/// assert_eq!(converter.syntax(), "cat|dog");
/// ```
pub struct EnumConverter<T> {
    example: T,
    _marker: PhantomData<fn() -> T>,
}

impl<T> EnumConverter<T>
where
    T: IntoEnumIterator + AsRef<str> + ParameterValue,
{
    /// Creates the converter.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::EmptyEnumeration`] if `T` has no variants.
    pub fn new() -> Result<Self, InvalidArgument> {
        let example = T::iter()
            .next()
            .ok_or(InvalidArgument::EmptyEnumeration(std::any::type_name::<T>()))?;
        Ok(Self {
            example,
            _marker: PhantomData,
        })
    }
}

impl<T> ValueConverter for EnumConverter<T>
where
    T: IntoEnumIterator + AsRef<str> + ParameterValue,
{
    type Value = T;

    fn parse(&self, text: &str) -> Result<T, ConversionError> {
        T::iter()
            .find(|variant| variant.as_ref() == text)
            .ok_or_else(|| ConversionError::Enumeration {
                input: text.to_string(),
                expected: self.syntax(),
            })
    }

    fn print(&self, value: &T) -> String {
        value.as_ref().to_string()
    }

    fn example(&self) -> T {
        self.example.clone()
    }

    fn syntax(&self) -> String {
        let mut names: Vec<String> = T::iter().map(|v| v.as_ref().to_string()).collect();
        names.sort();
        names.join("|")
    }
}

#[cfg(test)]
mod tests {
    use strum::{AsRefStr, EnumIter};

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, EnumIter, AsRefStr)]
    enum Color {
        Red,
        Green,
        Blue,
    }

    #[test]
    fn test_exact_name_lookup() {
        let c = EnumConverter::<Color>::new().unwrap();
        assert_eq!(c.parse("Green").unwrap(), Color::Green);
        assert!(matches!(
            c.parse("green"),
            Err(ConversionError::Enumeration { .. })
        ));
    }

    #[test]
    fn test_syntax_is_sorted() {
        let c = EnumConverter::<Color>::new().unwrap();
        assert_eq!(c.syntax(), "Blue|Green|Red");
    }

    #[test]
    fn test_example_is_first_variant() {
        let c = EnumConverter::<Color>::new().unwrap();
        assert_eq!(c.example(), Color::Red);
        assert_eq!(c.parse(&c.print(&c.example())).unwrap(), Color::Red);
    }
}
