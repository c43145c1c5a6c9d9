//! Aggregate tag counts.

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashMap;
use serde::Serialize;

use super::element::TaggedElement;

// ============================================================================
// TagStats
// ============================================================================

/// Counts over the elements matching the configured selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagStats {
    /// Matching elements.
    pub total: usize,
    /// Matching elements that are tagged.
    pub tagged: usize,
    /// Tagged elements per type.
    pub types: FxHashMap<String, usize>,
    /// Tagged elements per action.
    pub actions: FxHashMap<String, usize>,
    /// Tagged elements per context.
    pub contexts: FxHashMap<String, usize>,
}

impl TagStats {
    /// Builds stats from the match count and the tagged subset.
    #[must_use]
    pub fn collect(total: usize, tagged: &[TaggedElement]) -> Self {
        let mut stats = Self {
            total,
            tagged: tagged.len(),
            ..Self::default()
        };
        for element in tagged {
            *stats.types.entry(element.element_type.clone()).or_default() += 1;
            *stats.actions.entry(element.action.clone()).or_default() += 1;
            *stats.contexts.entry(element.context.clone()).or_default() += 1;
        }
        stats
    }

    /// Count for one type.
    #[inline]
    #[must_use]
    pub fn type_count(&self, element_type: &str) -> usize {
        self.types.get(element_type).copied().unwrap_or(0)
    }
}

// ============================================================================
// Tests
// ============================================================================
