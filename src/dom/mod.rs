//! Host document model.
//!
//! The tagger reads and writes a live document through this module:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Document`] | Arena-backed node tree with attributes, form state and layout |
//! | [`SelectorList`] | Parsed CSS selector list used for matching and queries |
//! | [`DomEvent`] | Event travelling through capture, target and bubble phases |
//!
//! # Example
//!
//! ```ignore
//! use page_tagger::dom::{Document, SelectorList};
//!
//! let mut doc = Document::new();
//! let nav = doc.append_element(doc.body(), "nav", &[])?;
//! let link = doc.append_element(nav, "a", &[("href", "/")])?;
//!
//! let links = SelectorList::parse("nav a")?;
//! assert_eq!(doc.query_selector_all(&links), vec![link]);
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Arena document and node data.
pub mod document;

/// Event listeners and dispatch.
pub mod event;

/// CSS selector parsing and matching.
pub mod selector;

// ============================================================================
// Re-exports
// ============================================================================

pub use document::{Attribute, Document, ElementData, HeapProbe, NodeKind, Rect};
pub use event::{DomEvent, EventPhase, EventType, Listener, Phase};
pub use selector::{AttrCondition, Combinator, Compound, Part, Selector, SelectorList};
