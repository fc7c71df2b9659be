//! Page group filtering for selection UIs.

use serde::Serialize;
use sp_config::PageGroups;

use crate::dimensions::{RuntimeDimensions, passes};
use crate::key::PageKey;

/// Label used for pages without one.
pub const DEFAULT_LABEL: &str = "No Label";

/// One selectable page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageOption {
    /// Display label.
    pub label: String,
    /// Full page key (`group%name`).
    pub value: String,
    /// Icon identifier, serialized as `null` when unset.
    pub icon: Option<String>,
}

/// List the pages of `group` available for `dimensions`.
///
/// Unknown groups yield an empty list. Surviving pages keep their
/// declaration order.
#[must_use]
pub fn filter_page_group(
    page_groups: &PageGroups,
    group: &str,
    dimensions: &RuntimeDimensions,
) -> Vec<PageOption> {
    let Some(pages) = page_groups.get(group) else {
        return Vec::new();
    };

    pages
        .iter()
        .filter(|(_, page)| match &page.dimension_constraints {
            Some(constraints) => passes(constraints, dimensions),
            // Unconstrained pages skip the matcher entirely.
            None => true,
        })
        .map(|(name, page)| PageOption {
            label: page
                .label
                .clone()
                .unwrap_or_else(|| DEFAULT_LABEL.to_owned()),
            value: PageKey::new(group, name).to_string(),
            icon: page.icon.clone(),
        })
        .collect()
}
