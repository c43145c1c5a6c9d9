//! Tagging protocol.
//!
//! The document is the only store: a [`TaggedElement`] is always read back
//! from attributes, never cached.

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;

use crate::dom::Document;
use crate::error::{Error, Result};
use crate::identifiers::NodeId;

use super::classifier::classify;
use super::config::AttributeNames;

// ============================================================================
// TaggedElement
// ============================================================================

/// An element and the tag values it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaggedElement {
    /// The element.
    pub node: NodeId,
    /// Type attribute value.
    #[serde(rename = "type")]
    pub element_type: String,
    /// Action attribute value.
    pub action: String,
    /// Context attribute value.
    pub context: String,
    /// Value attribute value, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

// ============================================================================
// Protocol
// ============================================================================

/// Returns `true` if `node` carries the type, action and context attributes.
#[must_use]
pub fn is_tagged(doc: &Document, node: NodeId, names: &AttributeNames) -> bool {
    doc.has_attribute(node, names.type_name())
        && doc.has_attribute(node, names.action())
        && doc.has_attribute(node, names.context())
}

/// Reads the tag values back, `None` unless `node` is tagged.
#[must_use]
pub fn read_tags(doc: &Document, node: NodeId, names: &AttributeNames) -> Option<TaggedElement> {
    Some(TaggedElement {
        node,
        element_type: doc.attribute(node, names.type_name())?.to_string(),
        action: doc.attribute(node, names.action())?.to_string(),
        context: doc.attribute(node, names.context())?.to_string(),
        value: doc.attribute(node, names.value()).map(String::from),
    })
}

/// Tags `node`, setting only attributes it does not carry yet.
///
/// Already tagged elements are returned as they are.
///
/// # Errors
///
/// Returns [`Error::StaleNode`] or [`Error::NotAnElement`].
pub fn tag_element(doc: &mut Document, node: NodeId, names: &AttributeNames) -> Result<TaggedElement> {
    doc.element(node)?;

    if let Some(existing) = read_tags(doc, node, names) {
        return Ok(existing);
    }

    let classification = classify(doc, node);
    set_missing(doc, node, names.type_name(), classification.element_type.as_str())?;
    set_missing(doc, node, names.action(), &classification.action)?;
    set_missing(doc, node, names.context(), classification.context.as_str())?;
    if let Some(value) = &classification.value {
        set_missing(doc, node, names.value(), value)?;
    }

    read_tags(doc, node, names).ok_or_else(|| Error::not_an_element(node))
}

/// Removes all four tag attributes. Returns `true` if any was present.
///
/// # Errors
///
/// Returns [`Error::StaleNode`] or [`Error::NotAnElement`].
pub fn clear_element(doc: &mut Document, node: NodeId, names: &AttributeNames) -> Result<bool> {
    let mut removed = false;
    for name in names.all() {
        removed |= doc.remove_attribute(node, name)?;
    }
    Ok(removed)
}

fn set_missing(doc: &mut Document, node: NodeId, name: &str, value: &str) -> Result<()> {
    if !doc.has_attribute(node, name) {
        doc.set_attribute(node, name, value)?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
