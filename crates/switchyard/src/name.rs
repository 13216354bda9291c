//! Canonical action names.
//!
//! Configuration keys and dispatch lookups both pass through
//! [`ActionName::parse`], so `"greet"`, `String::from("greet")`,
//! `" greet "`, and an existing `ActionName` all address the same registry
//! entry.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ConfigError;

/// Normalised, non-empty identifier for a registered action.
///
/// Names are cheap to clone and compare, and borrow as `str` so registry maps
/// can be queried with plain string slices.
///
/// # Example
///
/// ```
/// use switchyard::ActionName;
///
/// let name = ActionName::parse("  greet ").expect("valid name");
/// assert_eq!(name.as_str(), "greet");
/// assert!(ActionName::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionName(Arc<str>);

impl ActionName {
    /// Parses a raw key into its canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidName`] when the key is empty once
    /// surrounding whitespace is removed.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let normalised = normalise(raw);
        if normalised.is_empty() {
            return Err(ConfigError::invalid_name(raw, "name must not be empty"));
        }
        Ok(Self(Arc::from(normalised)))
    }

    /// Returns the canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Applies the normalisation shared by registration and lookup.
pub(crate) fn normalise(raw: &str) -> &str {
    raw.trim()
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ActionName {
    type Err = ConfigError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input)
    }
}

impl AsRef<str> for ActionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ActionName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<ActionName> for String {
    fn from(name: ActionName) -> Self {
        Self::from(&*name.0)
    }
}
