//! Runtime dimension matching.
//!
//! A page may restrict itself to certain values of named runtime dimensions
//! (e.g. `language`). A caller's dimension set passes when, for every
//! dimension the page constrains, at least one runtime value is allowed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sp_config::DimensionConstraints;

/// Value of one runtime dimension: a single value or several.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimensionValue {
    Single(String),
    Multiple(Vec<String>),
}

impl DimensionValue {
    /// Values normalized to a slice; a single value becomes a one-element slice.
    #[must_use]
    pub fn values(&self) -> &[String] {
        match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::Multiple(values) => values,
        }
    }
}

impl From<&str> for DimensionValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}

impl From<Vec<String>> for DimensionValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

/// Runtime dimensions of a request, keyed by dimension name.
pub type RuntimeDimensions = BTreeMap<String, DimensionValue>;

/// Check runtime `dimensions` against a page's `constraints`.
///
/// Dimensions the page does not constrain are ignored, as are constrained
/// dimensions the caller does not supply. Fails closed on the first
/// constrained dimension with no allowed value.
#[must_use]
pub fn passes(constraints: &DimensionConstraints, dimensions: &RuntimeDimensions) -> bool {
    dimensions.iter().all(|(name, value)| {
        constraints
            .get(name)
            .is_none_or(|allowed| value.values().iter().any(|v| allowed.contains(v)))
    })
}
