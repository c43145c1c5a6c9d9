//! Element classification and the tagging pipeline.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Tagger`] | Lifecycle, bulk tagging and click/change listeners |
//! | [`TaggerConfig`] | Selectors, attribute names and debug flag |
//! | [`TaggedElement`] | Tag values read back from an element |
//! | [`PerformanceSnapshot`] | Metrics captured at the end of `init` |
//! | [`TagStats`] | Counts by type, action and context |

// ============================================================================
// Submodules
// ============================================================================

/// Type, action, context and value inference.
pub mod classifier;

/// Configuration and its builder.
pub mod config;

/// Tagger lifecycle and event handling.
pub mod core;

/// Tagging protocol on single elements.
pub mod element;

/// Initialization metrics.
pub mod performance;

/// Aggregate counts.
pub mod stats;

// ============================================================================
// Re-exports
// ============================================================================

pub use classifier::{Classification, ElementType, PageContext, classify, is_numeric};
pub use config::{AttributeNames, AttributeOverrides, TaggerConfig, TaggerConfigBuilder};
pub use core::{MAX_CLICK_DEPTH, Tagger, TaggerState};
pub use element::{TaggedElement, is_tagged, read_tags, tag_element};
pub use performance::PerformanceSnapshot;
pub use stats::TagStats;
