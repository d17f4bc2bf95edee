//! Name validation for commands, groups and parameters.
//!
//! A name is non-empty, contains no whitespace or control characters, and
//! does not begin with `@` (which introduces a response file on the command
//! line).
//!
//! # Examples
//!
//! ```
//! use cmdtree_core::Name;
//!
//! assert!(Name::new("--file").is_ok());
//! assert!(Name::new("").is_err());
//! assert!(Name::new("two words").is_err());
//! assert!(Name::new("@args").is_err());
//! ```

use std::fmt;

use crate::error::InvalidArgument;

/// A validated command, group or parameter name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(String);

impl Name {
    /// Validates `text` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument::InvalidName`] if the text is empty,
    /// contains whitespace, or starts with `@`.
    pub fn new(text: impl Into<String>) -> Result<Self, InvalidArgument> {
        let text = text.into();
        check(&text)?;
        Ok(Self(text))
    }

    /// Wraps a name fixed at compile time by this crate.
    pub(crate) fn builtin(text: &'static str) -> Self {
        debug_assert!(is_valid(text), "invalid built-in name {text:?}");
        Self(text.to_string())
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the name, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl TryFrom<&str> for Name {
    type Error = InvalidArgument;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Returns `true` if `text` would be accepted by [`Name::new`].
pub fn is_valid(text: &str) -> bool {
    check(text).is_ok()
}

fn check(text: &str) -> Result<(), InvalidArgument> {
    let reason = if text.is_empty() {
        "names must be non-empty"
    } else if text.starts_with('@') {
        "names must not begin with '@'"
    } else if text.chars().any(|c| c.is_whitespace() || c.is_control()) {
        "names must not contain whitespace"
    } else {
        return Ok(());
    };

    Err(InvalidArgument::InvalidName {
        name: text.to_string(),
        reason,
    })
}
