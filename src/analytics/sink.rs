//! Analytics sinks.
//!
//! A sink is an append-only, order-preserving destination for
//! [`SinkRecord`]s. The tagger depends on the [`AnalyticsSink`] trait only;
//! [`MemorySink`] is the in-process queue used when nothing else is
//! injected.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;

use super::event::SinkRecord;

// ============================================================================
// AnalyticsSink
// ============================================================================

/// Append-only destination for analytics records.
pub trait AnalyticsSink: Send + Sync {
    /// Appends one record. Implementations must preserve push order.
    fn push(&self, record: SinkRecord);
}

// ============================================================================
// MemorySink
// ============================================================================

/// In-memory event queue.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<SinkRecord>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all records in push order.
    #[must_use]
    pub fn records(&self) -> Vec<SinkRecord> {
        self.records.lock().clone()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns `true` if nothing was pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Serializes the queue as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&*self.records.lock())?)
    }
}

impl AnalyticsSink for MemorySink {
    fn push(&self, record: SinkRecord) {
        self.records.lock().push(record);
    }
}

impl fmt::Debug for MemorySink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySink")
            .field("len", &self.len())
            .finish()
    }
}

// ============================================================================
// SinkSlot
// ============================================================================

/// Holds the sink a tagger emits to, creating a [`MemorySink`] on first
/// use when none was injected.
///
/// The default sink is kept as a concrete [`MemorySink`] so its records
/// stay readable through [`memory_sink`](Self::memory_sink).
#[derive(Default)]
pub(crate) struct SinkSlot {
    injected: Option<Arc<dyn AnalyticsSink>>,
    default: Mutex<Option<Arc<MemorySink>>>,
}

impl SinkSlot {
    pub(crate) fn with_sink(sink: Arc<dyn AnalyticsSink>) -> Self {
        Self {
            injected: Some(sink),
            default: Mutex::new(None),
        }
    }

    /// Returns the sink, creating the default one if absent.
    pub(crate) fn get(&self) -> Arc<dyn AnalyticsSink> {
        match &self.injected {
            Some(sink) => Arc::clone(sink),
            None => self.default_sink(),
        }
    }

    /// The default sink, `None` when one was injected.
    pub(crate) fn memory_sink(&self) -> Option<Arc<MemorySink>> {
        self.injected.is_none().then(|| self.default_sink())
    }

    #[cfg(test)]
    pub(crate) fn is_resolved(&self) -> bool {
        self.injected.is_some() || self.default.lock().is_some()
    }

    pub(crate) fn push(&self, record: SinkRecord) {
        self.get().push(record);
    }

    fn default_sink(&self) -> Arc<MemorySink> {
        let mut slot = self.default.lock();
        Arc::clone(slot.get_or_insert_with(|| Arc::new(MemorySink::new())))
    }
}

// ============================================================================
// Tests
// ============================================================================
