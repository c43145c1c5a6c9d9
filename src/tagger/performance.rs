//! Initialization metrics.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dom::event::epoch_millis;

// ============================================================================
// Constants
// ============================================================================

const BYTES_PER_MB: f64 = 1_048_576.0;

// ============================================================================
// PerformanceSnapshot
// ============================================================================

/// Metrics captured once at the end of [`Tagger::init`](super::Tagger::init).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSnapshot {
    /// Wall-clock duration of `init`, rounded to 2 decimals.
    pub init_time_ms: f64,

    /// Elements carrying type, action and context attributes.
    pub total_elements_tagged: usize,

    /// Heap usage in MB, rounded to 2 decimals. `0` if unknown.
    pub total_page_memory_mb: f64,

    /// Capture time in milliseconds since the UNIX epoch.
    pub timestamp: u64,
}

impl PerformanceSnapshot {
    /// Builds a snapshot stamped with the current time.
    #[must_use]
    pub fn capture(elapsed: Duration, tagged: usize, heap_bytes: Option<u64>) -> Self {
        Self {
            init_time_ms: round2(elapsed.as_secs_f64() * 1000.0),
            total_elements_tagged: tagged,
            total_page_memory_mb: heap_bytes.map_or(0.0, |bytes| round2(bytes as f64 / BYTES_PER_MB)),
            timestamp: epoch_millis(),
        }
    }
}

/// Rounds to two decimal places.
#[inline]
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// Tests
// ============================================================================
