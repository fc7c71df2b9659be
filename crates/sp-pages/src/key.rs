//! Composite page keys.

use std::fmt;
use std::str::FromStr;

use crate::error::LoadError;

/// Separator between group name and page name.
pub const SEPARATOR: char = '%';

/// Identifier of one static page: `group%name`.
///
/// Splits on the first separator only, so page names may themselves contain
/// `%`. Both halves must be non-empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PageKey {
    group: String,
    name: String,
}

impl PageKey {
    /// Build a key from its parts.
    #[must_use]
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }

    /// Parse a full `group%name` key.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::MalformedKey`] if the separator is missing or
    /// either half is empty.
    pub fn parse(key: &str) -> Result<Self, LoadError> {
        match key.split_once(SEPARATOR) {
            Some((group, name)) if !group.is_empty() && !name.is_empty() => {
                Ok(Self::new(group, name))
            }
            _ => Err(LoadError::MalformedKey(key.to_owned())),
        }
    }

    /// Group name.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Page name within the group.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.group, self.name)
    }
}

impl FromStr for PageKey {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
