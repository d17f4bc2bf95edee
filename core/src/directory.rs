//! The converter directory: an immutable map from value type to converter.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::convert::{
    BigDecimalConverter, BigIntegerConverter, BooleanConverter, DateTimeConverter,
    DurationConverter, Entry, ErasedConverter, F32Converter, F64Converter, HostConverter,
    I32Converter, I64Converter, ParameterValue, PathConverter, StringConverter, UriConverter,
    UuidConverter, ValueConverter, ValueType,
};

/// Maps value types to converters.
///
/// Directories are immutable; [`with`](Self::with) returns an extended copy
/// and leaves the original untouched. Cloning is cheap.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{ConverterDirectory, RegexConverter, ValueType};
///
/// let core = ConverterDirectory::core();
/// assert!(core.contains(ValueType::of::<i32>()));
/// assert!(!core.contains(ValueType::of::<regex::Regex>()));
///
/// let extended = core.with(RegexConverter);
/// assert!(extended.contains(ValueType::of::<regex::Regex>()));
/// assert!(!core.contains(ValueType::of::<regex::Regex>()));
/// ```
#[derive(Clone, Default)]
pub struct ConverterDirectory {
    converters: Arc<HashMap<TypeId, Arc<dyn ErasedConverter>>>,
}

impl ConverterDirectory {
    /// A directory with no converters.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A directory seeded with converters for the core type set: `BigInt`,
    /// `BigDecimal`, `bool`, `f32`, `f64`, `i32`, `i64`, `chrono::Duration`,
    /// `DateTime<FixedOffset>`, `String`, `PathBuf`, `Url`, `Uuid` and
    /// `Host<String>`.
    pub fn core() -> Self {
        Self::empty()
            .with(BigIntegerConverter)
            .with(BigDecimalConverter)
            .with(BooleanConverter)
            .with(F32Converter)
            .with(F64Converter)
            .with(I32Converter)
            .with(I64Converter)
            .with(DurationConverter)
            .with(DateTimeConverter)
            .with(StringConverter)
            .with(PathConverter)
            .with(UriConverter)
            .with(UuidConverter)
            .with(HostConverter)
    }

    /// Returns a new directory that also maps the converter's target type.
    /// An existing converter for the same type is replaced in the copy.
    pub fn with<C>(&self, converter: C) -> Self
    where
        C: ValueConverter + 'static,
    {
        let shared: Arc<dyn ValueConverter<Value = C::Value>> = Arc::new(converter);
        self.with_shared(shared)
    }

    /// Like [`with`](Self::with), for a converter that is already shared.
    pub fn with_shared<T: ParameterValue>(&self, converter: Arc<dyn ValueConverter<Value = T>>) -> Self {
        let mut converters = HashMap::clone(&self.converters);
        converters.insert(
            TypeId::of::<T>(),
            Arc::new(Entry { typed: converter }) as Arc<dyn ErasedConverter>,
        );
        Self {
            converters: Arc::new(converters),
        }
    }

    /// Looks up the typed converter for `T`.
    pub fn lookup<T: ParameterValue>(&self) -> Option<Arc<dyn ValueConverter<Value = T>>> {
        let erased = self.converters.get(&TypeId::of::<T>())?;
        let entry = erased.as_any().downcast_ref::<Entry<T>>()?;
        Some(Arc::clone(&entry.typed))
    }

    /// Looks up the type-erased converter for `value_type`.
    pub fn lookup_erased(&self, value_type: ValueType) -> Option<Arc<dyn ErasedConverter>> {
        self.converters.get(&value_type.id()).cloned()
    }

    /// Returns `true` if a converter for `value_type` is registered.
    pub fn contains(&self, value_type: ValueType) -> bool {
        self.converters.contains_key(&value_type.id())
    }

    /// The registered types, sorted by name.
    pub fn value_types(&self) -> Vec<ValueType> {
        let mut types: Vec<ValueType> = self.converters.values().map(|c| c.value_type()).collect();
        types.sort_by_key(|t| t.name());
        types
    }

    /// Number of registered converters.
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Returns `true` if no converters are registered.
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl fmt::Debug for ConverterDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.value_types()).finish()
    }
}
