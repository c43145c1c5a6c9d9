//! Arena-backed HTML document.
//!
//! A [`Document`] owns every node in a flat `Vec`, addressed by
//! [`NodeId`]. Elements carry their attributes in source order, form
//! state (dirty input value, select index) and a layout box in absolute
//! page coordinates so region heuristics can be evaluated without a
//! rendering engine.
//!
//! # Example
//!
//! ```ignore
//! use page_tagger::Document;
//!
//! let mut doc = Document::new();
//! let body = doc.body();
//! let footer = doc.append_element(body, "footer", &[])?;
//! let link = doc.append_element(footer, "a", &[("href", "/about")])?;
//! doc.append_text(link, "About us")?;
//!
//! assert_eq!(doc.text_content(footer), "About us");
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::identifiers::NodeId;

use super::event::ListenerStore;
use super::selector::SelectorList;

// ============================================================================
// Types
// ============================================================================

/// Host capability reporting current script heap usage in bytes.
pub type HeapProbe = Arc<dyn Fn() -> Option<u64> + Send + Sync>;

/// Viewport-relative bounding box, like `getBoundingClientRect()`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Distance from the viewport top to the box top.
    pub top: f64,
    /// Distance from the viewport top to the box bottom.
    pub bottom: f64,
}

impl Rect {
    /// Returns the box height.
    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// A single attribute, kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

/// Element-specific node data.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    tag_name: String,
    attrs: Vec<Attribute>,
    /// Dirty `value` for form controls; `None` falls back to the attribute.
    value: Option<String>,
    /// Explicit selection for `select` elements.
    selected_index: Option<usize>,
    /// Absolute page position: (top, height).
    layout: (f64, f64),
}

impl ElementData {
    fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    /// Returns the lowercased tag name.
    #[inline]
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
            .map(|attr| attr.value.as_str())
    }

    /// Returns all attributes in insertion order.
    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attrs
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        if let Some(attr) = self
            .attrs
            .iter_mut()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
        {
            attr.value = value.to_string();
            return;
        }
        self.attrs.push(Attribute {
            name: name.to_ascii_lowercase(),
            value: value.to_string(),
        });
    }

    fn remove_attribute(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|attr| !attr.name.eq_ignore_ascii_case(name));
        self.attrs.len() != before
    }
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// The document node (arena root).
    Document,
    /// An element.
    Element(ElementData),
    /// A text node.
    Text(String),
    /// A comment node.
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

// ============================================================================
// Document
// ============================================================================

/// An HTML document tree plus the host state the tagger reads from it.
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    html: NodeId,
    head: NodeId,
    body: NodeId,
    scroll_y: f64,
    scroll_height: f64,
    heap_probe: Option<HeapProbe>,
    pub(super) listeners: ListenerStore,
}

// ============================================================================
// Document - Display
// ============================================================================

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("scroll_y", &self.scroll_y)
            .field("scroll_height", &self.scroll_height)
            .field("heap_probe", &self.heap_probe.is_some())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Document - Constructor
// ============================================================================

impl Document {
    /// Creates a document with an `html > head + body` skeleton.
    #[must_use]
    pub fn new() -> Self {
        let root = NodeId::new(0);
        let mut doc = Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            root,
            html: root,
            head: root,
            body: root,
            scroll_y: 0.0,
            scroll_height: 0.0,
            heap_probe: None,
            listeners: ListenerStore::default(),
        };

        let html = doc.push_node(Some(root), NodeKind::Element(ElementData::new("html")));
        let head = doc.push_node(Some(html), NodeKind::Element(ElementData::new("head")));
        let body = doc.push_node(Some(html), NodeKind::Element(ElementData::new("body")));
        doc.html = html;
        doc.head = head;
        doc.body = body;
        doc
    }

    fn push_node(&mut self, parent: Option<NodeId>, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            kind,
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        id
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Document - Structure
// ============================================================================

impl Document {
    /// Returns the document node.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the `<html>` element.
    #[inline]
    #[must_use]
    pub fn document_element(&self) -> NodeId {
        self.html
    }

    /// Returns the `<head>` element.
    #[inline]
    #[must_use]
    pub fn head(&self) -> NodeId {
        self.head
    }

    /// Returns the `<body>` element.
    #[inline]
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Number of nodes ever created, including detached ones.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if `node` belongs to this document's arena.
    #[inline]
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.nodes.len()
    }

    /// Returns the node payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleNode`] for unknown ids.
    pub fn kind(&self, node: NodeId) -> Result<&NodeKind> {
        self.node(node).map(|n| &n.kind)
    }

    /// Returns the parent node, if attached.
    #[inline]
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.index()).and_then(|n| n.parent)
    }

    /// Returns the children of `node` (empty for unknown ids).
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.index())
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Returns `true` if `node` is an element.
    #[inline]
    #[must_use]
    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(
            self.nodes.get(node.index()).map(|n| &n.kind),
            Some(NodeKind::Element(_))
        )
    }

    /// Returns the lowercased tag name of an element.
    #[must_use]
    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).ok().map(ElementData::tag_name)
    }

    /// Returns element data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleNode`] or [`Error::NotAnElement`].
    pub fn element(&self, node: NodeId) -> Result<&ElementData> {
        match &self.node(node)?.kind {
            NodeKind::Element(data) => Ok(data),
            _ => Err(Error::not_an_element(node)),
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut ElementData> {
        match &mut self.node_mut(node)?.kind {
            NodeKind::Element(data) => Ok(data),
            _ => Err(Error::not_an_element(node)),
        }
    }

    fn node(&self, node: NodeId) -> Result<&Node> {
        self.nodes
            .get(node.index())
            .ok_or_else(|| Error::stale_node(node))
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(node.index())
            .ok_or_else(|| Error::stale_node(node))
    }

    /// All descendants of `node` in document order, excluding `node`.
    #[must_use]
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// Returns `true` if `ancestor` is a proper ancestor of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = self.parent(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }
}

// ============================================================================
// Document - Mutation
// ============================================================================

impl Document {
    /// Creates a detached element.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.push_node(None, NodeKind::Element(ElementData::new(tag_name)))
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(None, NodeKind::Text(text.to_string()))
    }

    /// Creates a detached comment node.
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push_node(None, NodeKind::Comment(text.to_string()))
    }

    /// Moves `child` to the end of `parent`'s children.
    ///
    /// # Errors
    ///
    /// - [`Error::StaleNode`] if either id is unknown
    /// - [`Error::Hierarchy`] if `parent` cannot hold children or the move
    ///   would create a cycle
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let parent_kind = &self.node(parent)?.kind;
        if !matches!(parent_kind, NodeKind::Document | NodeKind::Element(_)) {
            return Err(Error::hierarchy(format!("{parent} cannot have children")));
        }
        if matches!(self.node(child)?.kind, NodeKind::Document) {
            return Err(Error::hierarchy("the document node cannot be moved"));
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(Error::hierarchy(format!(
                "appending {child} to {parent} would create a cycle"
            )));
        }

        if let Some(old_parent) = self.nodes[child.index()].parent {
            self.nodes[old_parent.index()]
                .children
                .retain(|&id| id != child);
        }
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
        Ok(())
    }

    /// Creates an element with attributes and appends it to `parent`.
    ///
    /// # Errors
    ///
    /// See [`Document::append_child`].
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag_name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<NodeId> {
        let node = self.create_element(tag_name);
        for (name, value) in attrs {
            self.set_attribute(node, name, value)?;
        }
        self.append_child(parent, node)?;
        Ok(node)
    }

    /// Creates a text node and appends it to `parent`.
    ///
    /// # Errors
    ///
    /// See [`Document::append_child`].
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId> {
        let node = self.create_text(text);
        self.append_child(parent, node)?;
        Ok(node)
    }

    /// Creates a comment node and appends it to `parent`.
    ///
    /// # Errors
    ///
    /// See [`Document::append_child`].
    pub fn append_comment(&mut self, parent: NodeId, text: &str) -> Result<NodeId> {
        let node = self.create_comment(text);
        self.append_child(parent, node)?;
        Ok(node)
    }
}

// ============================================================================
// Document - Attributes
// ============================================================================

impl Document {
    /// Returns an attribute value (ASCII case-insensitive name).
    #[must_use]
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).ok().and_then(|el| el.attribute(name))
    }

    /// Returns `true` if the element carries `name`.
    #[must_use]
    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// Sets (or overwrites) an attribute.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleNode`] or [`Error::NotAnElement`].
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        self.element_mut(node)?.set_attribute(name, value);
        Ok(())
    }

    /// Removes an attribute, returning whether it was present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleNode`] or [`Error::NotAnElement`].
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<bool> {
        Ok(self.element_mut(node)?.remove_attribute(name))
    }

    /// Returns the raw `class` attribute, or `""`.
    #[must_use]
    pub fn class_name(&self, node: NodeId) -> &str {
        self.attribute(node, "class").unwrap_or_default()
    }

    /// Returns `true` if the class list contains `token` exactly.
    #[must_use]
    pub fn has_class(&self, node: NodeId, token: &str) -> bool {
        self.class_name(node)
            .split_whitespace()
            .any(|class| class == token)
    }
}

// ============================================================================
// Document - Text
// ============================================================================

impl Document {
    /// Concatenated text of all descendant text nodes (`textContent`).
    #[must_use]
    pub fn text_content(&self, node: NodeId) -> String {
        match self.nodes.get(node.index()).map(|n| &n.kind) {
            Some(NodeKind::Text(text) | NodeKind::Comment(text)) => text.clone(),
            Some(_) => self
                .descendants(node)
                .into_iter()
                .filter_map(|id| match &self.nodes[id.index()].kind {
                    NodeKind::Text(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
            None => String::new(),
        }
    }
}

// ============================================================================
// Document - Queries
// ============================================================================

impl Document {
    /// Returns `true` if `node` matches any selector in `list`.
    #[inline]
    #[must_use]
    pub fn matches(&self, node: NodeId, list: &SelectorList) -> bool {
        list.matches(self, node)
    }

    /// All attached elements matching `list`, in document order.
    #[must_use]
    pub fn query_selector_all(&self, list: &SelectorList) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&node| list.matches(self, node))
            .collect()
    }

    /// First attached element matching `list`.
    #[must_use]
    pub fn query_selector(&self, list: &SelectorList) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&node| list.matches(self, node))
    }

    /// First descendant element of `node` satisfying `predicate`, in
    /// document order. The walk stops at the first match.
    pub fn first_descendant_matching<F>(&self, node: NodeId, mut predicate: F) -> Option<NodeId>
    where
        F: FnMut(&Self, NodeId) -> bool,
    {
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self.is_element(current) && predicate(self, current) {
                return Some(current);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        None
    }
}

// ============================================================================
// Document - Form State
// ============================================================================

impl Document {
    /// Current value of a form control: dirty value, else `value` attribute.
    #[must_use]
    pub fn input_value(&self, node: NodeId) -> String {
        self.element(node)
            .ok()
            .and_then(|el| el.value.clone().or_else(|| el.attribute("value").map(String::from)))
            .unwrap_or_default()
    }

    /// Sets the current value of a form control without touching attributes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleNode`] or [`Error::NotAnElement`].
    pub fn set_value(&mut self, node: NodeId, value: &str) -> Result<()> {
        self.element_mut(node)?.value = Some(value.to_string());
        Ok(())
    }

    /// `option` elements owned by a `select`, in document order.
    #[must_use]
    pub fn options(&self, select: NodeId) -> Vec<NodeId> {
        self.descendants(select)
            .into_iter()
            .filter(|&id| self.tag_name(id) == Some("option"))
            .collect()
    }

    /// Index of the selected option.
    ///
    /// An explicit [`Document::select_option`] wins; otherwise the first
    /// option carrying `selected`, otherwise the first option.
    #[must_use]
    pub fn selected_index(&self, select: NodeId) -> Option<usize> {
        let options = self.options(select);
        if options.is_empty() {
            return None;
        }
        if let Some(index) = self.element(select).ok().and_then(|el| el.selected_index)
            && index < options.len()
        {
            return Some(index);
        }
        options
            .iter()
            .position(|&opt| self.has_attribute(opt, "selected"))
            .or(Some(0))
    }

    /// The selected `option` element.
    #[must_use]
    pub fn selected_option(&self, select: NodeId) -> Option<NodeId> {
        let index = self.selected_index(select)?;
        self.options(select).get(index).copied()
    }

    /// Selects the option at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Hierarchy`] if `index` is out of range.
    pub fn select_option(&mut self, select: NodeId, index: usize) -> Result<()> {
        let count = self.options(select).len();
        if index >= count {
            return Err(Error::hierarchy(format!(
                "option index {index} out of range for {select} ({count} options)"
            )));
        }
        self.element_mut(select)?.selected_index = Some(index);
        Ok(())
    }

    /// Option label: text with whitespace stripped and collapsed.
    #[must_use]
    pub fn option_text(&self, option: NodeId) -> String {
        self.text_content(option)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Option value: the `value` attribute, else [`Document::option_text`].
    #[must_use]
    pub fn option_value(&self, option: NodeId) -> String {
        match self.attribute(option, "value") {
            Some(value) => value.to_string(),
            None => self.option_text(option),
        }
    }

    /// Value of the selected option, if any.
    #[must_use]
    pub fn select_value(&self, select: NodeId) -> Option<String> {
        self.selected_option(select)
            .map(|option| self.option_value(option))
    }
}

// ============================================================================
// Document - Layout
// ============================================================================

impl Document {
    /// Places an element at an absolute page offset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleNode`] or [`Error::NotAnElement`].
    pub fn set_layout(&mut self, node: NodeId, top: f64, height: f64) -> Result<()> {
        self.element_mut(node)?.layout = (top, height.max(0.0));
        Ok(())
    }

    /// Viewport-relative box for `node`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleNode`] or [`Error::NotAnElement`].
    pub fn bounding_client_rect(&self, node: NodeId) -> Result<Rect> {
        let (top, height) = self.element(node)?.layout;
        Ok(Rect {
            top: top - self.scroll_y,
            bottom: top + height - self.scroll_y,
        })
    }

    /// Current vertical scroll offset.
    #[inline]
    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Scrolls to a vertical offset, clamped at zero.
    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y.max(0.0);
    }

    /// Total scrollable page height.
    #[inline]
    #[must_use]
    pub fn scroll_height(&self) -> f64 {
        self.scroll_height
    }

    /// Sets the total scrollable page height.
    pub fn set_scroll_height(&mut self, height: f64) {
        self.scroll_height = height.max(0.0);
    }
}

// ============================================================================
// Document - Host Capabilities
// ============================================================================

impl Document {
    /// Installs a heap usage probe.
    pub fn set_heap_probe<F>(&mut self, probe: F)
    where
        F: Fn() -> Option<u64> + Send + Sync + 'static,
    {
        self.heap_probe = Some(Arc::new(probe));
    }

    /// Removes the heap usage probe.
    pub fn clear_heap_probe(&mut self) {
        self.heap_probe = None;
    }

    /// Current heap usage in bytes, `None` if the host cannot tell.
    #[must_use]
    pub fn heap_used_bytes(&self) -> Option<u64> {
        self.heap_probe.as_ref().and_then(|probe| probe())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_skeleton() {
        let doc = Document::new();
        assert_eq!(doc.tag_name(doc.document_element()), Some("html"));
        assert_eq!(doc.tag_name(doc.head()), Some("head"));
        assert_eq!(doc.tag_name(doc.body()), Some("body"));
        assert_eq!(doc.parent(doc.body()), Some(doc.document_element()));
        assert_eq!(doc.parent(doc.root()), None);
    }

    #[test]
    fn test_tag_names_are_lowercased() {
        let mut doc = Document::new();
        let div = doc.append_element(doc.body(), "DIV", &[]).unwrap();
        assert_eq!(doc.tag_name(div), Some("div"));
    }

    #[test]
    fn test_attributes_case_insensitive() {
        let mut doc = Document::new();
        let a = doc
            .append_element(doc.body(), "a", &[("Aria-Label", "Home")])
            .unwrap();
        assert_eq!(doc.attribute(a, "aria-label"), Some("Home"));
        doc.set_attribute(a, "ARIA-LABEL", "Start").unwrap();
        assert_eq!(doc.attribute(a, "aria-label"), Some("Start"));
        assert!(doc.remove_attribute(a, "aria-label").unwrap());
        assert!(!doc.remove_attribute(a, "aria-label").unwrap());
    }

    #[test]
    fn test_attribute_on_text_node_fails() {
        let mut doc = Document::new();
        let text = doc.append_text(doc.body(), "hi").unwrap();
        let err = doc.set_attribute(text, "x", "y").unwrap_err();
        assert!(matches!(err, Error::NotAnElement { .. }));
        assert_eq!(doc.attribute(text, "x"), None);
    }

    #[test]
    fn test_stale_node() {
        let mut doc = Document::new();
        let err = doc.set_attribute(NodeId::new(999), "x", "y").unwrap_err();
        assert!(matches!(err, Error::StaleNode { .. }));
        assert!(!doc.contains(NodeId::new(999)));
        assert!(doc.children(NodeId::new(999)).is_empty());
    }

    #[test]
    fn test_append_child_rejects_cycles() {
        let mut doc = Document::new();
        let outer = doc.append_element(doc.body(), "div", &[]).unwrap();
        let inner = doc.append_element(outer, "div", &[]).unwrap();
        assert!(doc.append_child(inner, outer).is_err());
        assert!(doc.append_child(outer, outer).is_err());
    }

    #[test]
    fn test_append_child_moves_node() {
        let mut doc = Document::new();
        let a = doc.append_element(doc.body(), "div", &[]).unwrap();
        let b = doc.append_element(doc.body(), "div", &[]).unwrap();
        let span = doc.append_element(a, "span", &[]).unwrap();
        doc.append_child(b, span).unwrap();
        assert!(doc.children(a).is_empty());
        assert_eq!(doc.children(b), &[span]);
        assert_eq!(doc.parent(span), Some(b));
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let mut doc = Document::new();
        let p = doc.append_element(doc.body(), "p", &[]).unwrap();
        doc.append_text(p, "  Hello ").unwrap();
        let b = doc.append_element(p, "b", &[]).unwrap();
        doc.append_text(b, "world").unwrap();
        doc.append_comment(p, "ignored").unwrap();
        assert_eq!(doc.text_content(p), "  Hello world");
    }

    #[test]
    fn test_class_tokens() {
        let mut doc = Document::new();
        let div = doc
            .append_element(doc.body(), "div", &[("class", "  card  selected ")])
            .unwrap();
        assert!(doc.has_class(div, "selected"));
        assert!(!doc.has_class(div, "select"));
    }

    #[test]
    fn test_descendants_in_document_order() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.append_element(body, "div", &[]).unwrap();
        let a1 = doc.append_element(a, "span", &[]).unwrap();
        let b = doc.append_element(body, "div", &[]).unwrap();
        assert_eq!(doc.descendants(body), vec![a, a1, b]);
    }

    #[test]
    fn test_first_descendant_matching_stops_at_first_match() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.append_element(body, "div", &[]).unwrap();
        doc.append_text(a, "text").unwrap();
        let a1 = doc.append_element(a, "h2", &[]).unwrap();
        let b = doc.append_element(body, "h2", &[]).unwrap();
        for _ in 0..50 {
            doc.append_element(b, "span", &[]).unwrap();
        }

        let mut visited = Vec::new();
        let found = doc.first_descendant_matching(body, |doc, id| {
            visited.push(id);
            doc.tag_name(id) == Some("h2")
        });

        assert_eq!(found, Some(a1));
        assert_eq!(visited, vec![a, a1]);

        let mut calls = 0;
        let first = doc.first_descendant_matching(body, |_, _| {
            calls += 1;
            true
        });
        assert_eq!(first, Some(a));
        assert_eq!(calls, 1);

        assert_eq!(doc.first_descendant_matching(b, |_, _| false), None);
    }

    #[test]
    fn test_input_value_prefers_dirty_value() {
        let mut doc = Document::new();
        let input = doc
            .append_element(doc.body(), "input", &[("type", "number"), ("value", "42")])
            .unwrap();
        assert_eq!(doc.input_value(input), "42");
        doc.set_value(input, "7").unwrap();
        assert_eq!(doc.input_value(input), "7");
        assert_eq!(doc.attribute(input, "value"), Some("42"));
    }

    #[test]
    fn test_select_defaults_and_selection() {
        let mut doc = Document::new();
        let select = doc.append_element(doc.body(), "select", &[]).unwrap();
        let one = doc.append_element(select, "option", &[("value", "1")]).unwrap();
        doc.append_text(one, "One").unwrap();
        let two = doc
            .append_element(select, "option", &[("selected", "")])
            .unwrap();
        doc.append_text(two, "  Two \n items ").unwrap();

        assert_eq!(doc.selected_option(select), Some(two));
        assert_eq!(doc.select_value(select).as_deref(), Some("Two items"));

        doc.select_option(select, 0).unwrap();
        assert_eq!(doc.selected_option(select), Some(one));
        assert_eq!(doc.select_value(select).as_deref(), Some("1"));
        assert!(doc.select_option(select, 5).is_err());
    }

    #[test]
    fn test_empty_select_has_no_selection() {
        let mut doc = Document::new();
        let select = doc.append_element(doc.body(), "select", &[]).unwrap();
        assert_eq!(doc.selected_option(select), None);
        assert_eq!(doc.select_value(select), None);
    }

    #[test]
    fn test_bounding_rect_is_viewport_relative() {
        let mut doc = Document::new();
        let div = doc.append_element(doc.body(), "div", &[]).unwrap();
        doc.set_layout(div, 500.0, 100.0).unwrap();
        doc.scroll_to(200.0);
        let rect = doc.bounding_client_rect(div).unwrap();
        assert_eq!(rect.top, 300.0);
        assert_eq!(rect.bottom, 400.0);
        assert_eq!(rect.height(), 100.0);
    }

    #[test]
    fn test_heap_probe() {
        let mut doc = Document::new();
        assert_eq!(doc.heap_used_bytes(), None);
        doc.set_heap_probe(|| Some(2048));
        assert_eq!(doc.heap_used_bytes(), Some(2048));
        doc.clear_heap_probe();
        assert_eq!(doc.heap_used_bytes(), None);
    }

    #[test]
    fn test_query_selector_all_skips_detached() {
        let mut doc = Document::new();
        let attached = doc.append_element(doc.body(), "button", &[]).unwrap();
        let _detached = doc.create_element("button");
        let list = SelectorList::parse("button").unwrap();
        assert_eq!(doc.query_selector_all(&list), vec![attached]);
        assert_eq!(doc.query_selector(&list), Some(attached));
    }
}
