//! Page Tagger - automatic analytics annotation for interactive elements.
//!
//! The tagger walks a document once, writes four attributes onto every
//! element matching its selectors, then reports clicks and load metrics to
//! an analytics sink.
//!
//! # Architecture
//!
//! - **Classifier**: infers type, action, context and value for one element
//!   from its tag, attributes, classes, text and ancestors
//! - **Event pipeline**: capture-phase click and change listeners that tag
//!   late elements and assemble click records from the ancestor chain
//!
//! The document is the only store. Tag values live in attributes
//! (`data-type`, `data-action`, `data-context`, `data-value` by default)
//! and are read back from there.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use page_tagger::{Document, MemorySink, Result, Tagger, TaggerConfig};
//!
//! fn main() -> Result<()> {
//!     let mut doc = Document::new();
//!     let nav = doc.append_element(doc.body(), "nav", &[])?;
//!     let link = doc.append_element(nav, "a", &[("href", "/pricing")])?;
//!     doc.append_text(link, "Pricing")?;
//!
//!     let sink = Arc::new(MemorySink::new());
//!     let mut tagger = Tagger::with_sink(TaggerConfig::default(), sink.clone());
//!     tagger.init(&mut doc);
//!
//!     assert_eq!(doc.attribute(link, "data-context"), Some("navigation"));
//!
//!     doc.click(link);
//!     println!("{}", sink.to_json()?);
//!
//!     tagger.destroy(&mut doc);
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`analytics`] | Sink records and the [`AnalyticsSink`] trait |
//! | [`dom`] | Host document: nodes, selectors, events |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`tagger`] | Classifier, configuration and [`Tagger`] |

// ============================================================================
// Modules
// ============================================================================

/// Analytics records and sinks.
///
/// Records are pushed in emission order: one performance record per
/// `init`, then click records in click order.
pub mod analytics;

/// Host document model.
///
/// Arena-backed nodes addressed by [`NodeId`], CSS selectors and
/// capture/bubble event dispatch.
pub mod dom;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for document entities.
pub mod identifiers;

/// Element classification and the tagging pipeline.
///
/// Use [`TaggerConfig::builder()`] to configure a [`Tagger`].
pub mod tagger;

// ============================================================================
// Re-exports
// ============================================================================

// Analytics types
pub use analytics::{AnalyticsSink, ClickObject, MemorySink, SinkRecord};

// Document types
pub use dom::{Document, DomEvent, EventType, Phase, SelectorList};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{ListenerId, NodeId};

// Tagger types
pub use tagger::{
    AttributeNames, AttributeOverrides, ElementType, PageContext, PerformanceSnapshot, TagStats,
    TaggedElement, Tagger, TaggerConfig, TaggerConfigBuilder, TaggerState,
};
