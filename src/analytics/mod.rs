//! Analytics records and sinks.
//!
//! The tagger reports two kinds of records, see [`SinkRecord`]:
//!
//! - one `tagger_performance` record at the end of every `init`
//! - one `click_event` record per click that reaches an action or context
//!
//! Records go to an [`AnalyticsSink`]. Inject your own with
//! [`Tagger::with_sink`](crate::Tagger::with_sink), or let the tagger
//! create a [`MemorySink`] the first time it emits.

// ============================================================================
// Submodules
// ============================================================================

/// Record types and their JSON layout.
pub mod event;

/// Sink trait and the in-memory queue.
pub mod sink;

// ============================================================================
// Re-exports
// ============================================================================

pub use event::{CLICK_EVENT, ClickObject, PERFORMANCE_EVENT, SinkRecord};
pub use sink::{AnalyticsSink, MemorySink};

pub(crate) use sink::SinkSlot;
