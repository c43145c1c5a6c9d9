//! Analytics record types.
//!
//! Records are what the tagger hands to an [`AnalyticsSink`](super::AnalyticsSink).
//!
//! # Event Types
//!
//! | `event` | Payload field | Emitted |
//! |---------|---------------|---------|
//! | `tagger_performance` | `performance` | Once per `init` |
//! | `click_event` | `click_object` | Once per click that reaches an action or context |
//!
//! # Format
//!
//! ```json
//! {
//!   "event": "click_event",
//!   "click_object": { "action": "Buy Now", "context": "hero", "type": "button" },
//!   "timestamp": 1760000000000
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::tagger::PerformanceSnapshot;

// ============================================================================
// Constants
// ============================================================================

/// `event` name of performance records.
pub const PERFORMANCE_EVENT: &str = "tagger_performance";

/// `event` name of click records.
pub const CLICK_EVENT: &str = "click_event";

// ============================================================================
// ClickObject
// ============================================================================

/// Payload assembled from the attributes around a clicked element.
///
/// Every field is optional; absent fields are omitted from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickObject {
    /// User-facing action label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Page region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Semantic element type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<String>,

    /// Numeric value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ClickObject {
    /// Returns `true` if an action or a context was found.
    #[inline]
    #[must_use]
    pub fn is_reportable(&self) -> bool {
        self.action.is_some() || self.context.is_some()
    }
}

// ============================================================================
// SinkRecord
// ============================================================================

/// A record pushed to the analytics sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum SinkRecord {
    /// Initialization metrics.
    #[serde(rename = "tagger_performance")]
    Performance {
        /// The snapshot taken at the end of `init`.
        performance: PerformanceSnapshot,
        /// Emission time in milliseconds since the UNIX epoch.
        timestamp: u64,
    },

    /// A reported click.
    #[serde(rename = "click_event")]
    Click {
        /// Collected attributes.
        click_object: ClickObject,
        /// Emission time in milliseconds since the UNIX epoch.
        timestamp: u64,
    },
}

impl SinkRecord {
    /// Returns the `event` name.
    #[must_use]
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Performance { .. } => PERFORMANCE_EVENT,
            Self::Click { .. } => CLICK_EVENT,
        }
    }

    /// Returns the emission timestamp.
    #[must_use]
    pub fn timestamp(&self) -> u64 {
        match self {
            Self::Performance { timestamp, .. } | Self::Click { timestamp, .. } => *timestamp,
        }
    }

    /// Returns the click payload for click records.
    #[must_use]
    pub fn click_object(&self) -> Option<&ClickObject> {
        match self {
            Self::Click { click_object, .. } => Some(click_object),
            Self::Performance { .. } => None,
        }
    }

    /// Returns the snapshot for performance records.
    #[must_use]
    pub fn performance(&self) -> Option<&PerformanceSnapshot> {
        match self {
            Self::Performance { performance, .. } => Some(performance),
            Self::Click { .. } => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
