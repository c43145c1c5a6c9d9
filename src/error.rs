//! Error types for the page tagger.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! Fallible internal operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use page_tagger::{Document, Result};
//!
//! fn mark(doc: &mut Document) -> Result<()> {
//!     let body = doc.body();
//!     let button = doc.append_element(body, "button", &[("class", "hero")])?;
//!     doc.append_text(button, "Buy Now")?;
//!     Ok(())
//! }
//! ```
//!
//! The tagger's public entry points never surface these errors to the
//! page: they are logged and replaced with fallback values.
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::InvalidSelector`] |
//! | Node | [`Error::StaleNode`], [`Error::NotAnElement`], [`Error::Hierarchy`] |
//! | Setup | [`Error::ListenerInstall`] |
//! | External | [`Error::Json`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

use crate::identifiers::NodeId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when tagger configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// CSS selector could not be parsed.
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector {
        /// The offending selector text.
        selector: String,
        /// Why parsing stopped.
        reason: String,
    },

    // ========================================================================
    // Node Errors
    // ========================================================================
    /// Node id does not refer to a node of this document.
    #[error("Stale node: {node}")]
    StaleNode {
        /// The unknown node id.
        node: NodeId,
    },

    /// Node exists but is not an element.
    #[error("Node {node} is not an element")]
    NotAnElement {
        /// The non-element node id.
        node: NodeId,
    },

    /// Tree mutation would produce an invalid hierarchy.
    #[error("Hierarchy error: {message}")]
    Hierarchy {
        /// Description of the rejected mutation.
        message: String,
    },

    // ========================================================================
    // Setup Errors
    // ========================================================================
    /// Event listener could not be registered.
    #[error("Failed to install {event} listener: {message}")]
    ListenerInstall {
        /// Event type the listener was meant for.
        event: String,
        /// Description of the failure.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid selector error.
    #[inline]
    pub fn invalid_selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }

    /// Creates a stale node error.
    #[inline]
    pub fn stale_node(node: NodeId) -> Self {
        Self::StaleNode { node }
    }

    /// Creates a not-an-element error.
    #[inline]
    pub fn not_an_element(node: NodeId) -> Self {
        Self::NotAnElement { node }
    }

    /// Creates a hierarchy error.
    #[inline]
    pub fn hierarchy(message: impl Into<String>) -> Self {
        Self::Hierarchy {
            message: message.into(),
        }
    }

    /// Creates a listener installation error.
    #[inline]
    pub fn listener_install(event: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ListenerInstall {
            event: event.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error concerns a specific node.
    #[inline]
    #[must_use]
    pub fn is_element_error(&self) -> bool {
        matches!(
            self,
            Self::StaleNode { .. } | Self::NotAnElement { .. } | Self::Hierarchy { .. }
        )
    }

    /// Returns `true` if this error comes from configuration.
    #[inline]
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::InvalidSelector { .. } | Self::Json(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
