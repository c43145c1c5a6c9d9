//! Tagger lifecycle and event pipeline.
//!
//! The [`Tagger`] tags matching elements of a [`Document`] on
//! [`init`](Tagger::init), reports one performance record, then listens
//! for clicks and changes in the capture phase until
//! [`destroy`](Tagger::destroy).
//!
//! No public entry point returns an error. Failures are logged and
//! replaced with a fallback so instrumentation never breaks the page.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use page_tagger::{Document, MemorySink, Tagger, TaggerConfig};
//!
//! # fn example() -> page_tagger::Result<()> {
//! let mut doc = Document::new();
//! let button = doc.append_element(doc.body(), "button", &[("class", "hero")])?;
//! doc.append_text(button, "Buy Now")?;
//!
//! let sink = Arc::new(MemorySink::new());
//! let mut tagger = Tagger::with_sink(TaggerConfig::default(), sink.clone());
//! tagger.init(&mut doc);
//! doc.click(button);
//!
//! assert_eq!(doc.attribute(button, "data-context"), Some("hero"));
//! assert_eq!(sink.len(), 2);
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::analytics::{AnalyticsSink, ClickObject, MemorySink, SinkRecord, SinkSlot};
use crate::dom::event::epoch_millis;
use crate::dom::{Document, DomEvent, EventType, Listener, Phase, SelectorList};
use crate::identifiers::{ListenerId, NodeId};

use super::classifier::selected_option_text;
use super::config::TaggerConfig;
use super::element::{TaggedElement, clear_element, read_tags, tag_element};
use super::performance::PerformanceSnapshot;
use super::stats::TagStats;

// ============================================================================
// Constants
// ============================================================================

/// Maximum nodes visited per click, the target included.
pub const MAX_CLICK_DEPTH: usize = 10;

// ============================================================================
// TaggerState
// ============================================================================

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaggerState {
    /// Constructed, `init` not called yet.
    Uninitialized,
    /// Listeners installed.
    Initialized,
    /// Listeners removed. `init` may be called again.
    Destroyed,
}

// ============================================================================
// Types
// ============================================================================

/// State shared between the tagger and its listeners.
struct TaggerInner {
    config: TaggerConfig,
    selectors: SelectorList,
    tagged_selector: SelectorList,
    sink: SinkSlot,
}

// ============================================================================
// Tagger
// ============================================================================

/// Page tagger bound to one configuration.
///
/// The click and change listeners are created once per tagger, so
/// repeated [`init`](Self::init) calls register the same listener
/// identities and never stack duplicates.
///
/// The listeners only hold a weak handle to the tagger's state. Dropping
/// an initialized tagger without [`destroy`](Self::destroy) leaves them
/// registered on the document, but they no longer tag or report.
pub struct Tagger {
    inner: Arc<TaggerInner>,
    click_listener: Listener,
    change_listener: Listener,
    installed: Vec<ListenerId>,
    state: TaggerState,
    performance: Option<PerformanceSnapshot>,
}

// ============================================================================
// Tagger - Display
// ============================================================================

impl fmt::Debug for Tagger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tagger")
            .field("selectors", &self.inner.selectors.as_str())
            .field("state", &self.state)
            .field("listeners", &self.installed.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tagger - Constructors
// ============================================================================

impl Tagger {
    /// Creates a tagger that emits to a lazily created [`MemorySink`], read
    /// back through [`memory_sink`](Self::memory_sink).
    #[must_use]
    pub fn new(config: TaggerConfig) -> Self {
        Self::from_parts(config, SinkSlot::default())
    }

    /// Creates a tagger that emits to `sink`.
    #[must_use]
    pub fn with_sink(config: TaggerConfig, sink: Arc<dyn AnalyticsSink>) -> Self {
        Self::from_parts(config, SinkSlot::with_sink(sink))
    }

    fn from_parts(config: TaggerConfig, sink: SinkSlot) -> Self {
        let selectors = config.selector_list().unwrap_or_else(|e| {
            error!(error = %e, "Selector compilation failed, nothing will be tagged");
            SelectorList::default()
        });
        let tagged_selector = config.tagged_selector().unwrap_or_else(|e| {
            error!(error = %e, "Tagged-element selector compilation failed");
            SelectorList::default()
        });

        let inner = Arc::new(TaggerInner {
            config,
            selectors,
            tagged_selector,
            sink,
        });

        let click_inner: Weak<TaggerInner> = Arc::downgrade(&inner);
        let click_listener: Listener = Arc::new(move |doc: &mut Document, event: &mut DomEvent| {
            if let Some(inner) = click_inner.upgrade() {
                inner.handle_click(doc, event.target());
            }
        });

        let change_inner: Weak<TaggerInner> = Arc::downgrade(&inner);
        let change_listener: Listener = Arc::new(move |doc: &mut Document, event: &mut DomEvent| {
            if let Some(inner) = change_inner.upgrade() {
                inner.handle_change(doc, event.target());
            }
        });

        Self {
            inner,
            click_listener,
            change_listener,
            installed: Vec::new(),
            state: TaggerState::Uninitialized,
            performance: None,
        }
    }
}

// ============================================================================
// Tagger - Accessors
// ============================================================================

impl Tagger {
    /// Current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> TaggerState {
        self.state
    }

    /// The configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &TaggerConfig {
        &self.inner.config
    }

    /// The sink records go to, created on first access if none was injected.
    #[must_use]
    pub fn sink(&self) -> Arc<dyn AnalyticsSink> {
        self.inner.sink.get()
    }

    /// The default in-memory sink, `None` when a sink was injected with
    /// [`with_sink`](Self::with_sink).
    #[must_use]
    pub fn memory_sink(&self) -> Option<Arc<MemorySink>> {
        self.inner.sink.memory_sink()
    }

    /// Snapshot from the last `init`, `None` before the first one.
    #[inline]
    #[must_use]
    pub fn performance_metrics(&self) -> Option<&PerformanceSnapshot> {
        self.performance.as_ref()
    }
}

// ============================================================================
// Tagger - Lifecycle
// ============================================================================

impl Tagger {
    /// Tags every matching element, installs the listeners and emits one
    /// `tagger_performance` record.
    pub fn init(&mut self, doc: &mut Document) {
        let start = Instant::now();

        let tagged = self.inner.tag_all(doc);
        self.install_listeners(doc);

        let total_tagged = doc.query_selector_all(&self.inner.tagged_selector).len();
        let snapshot =
            PerformanceSnapshot::capture(start.elapsed(), total_tagged, doc.heap_used_bytes());

        self.inner.sink.push(SinkRecord::Performance {
            performance: snapshot.clone(),
            timestamp: epoch_millis(),
        });

        info!(
            init_time_ms = snapshot.init_time_ms,
            total_elements_tagged = snapshot.total_elements_tagged,
            total_page_memory_mb = snapshot.total_page_memory_mb,
            newly_tagged = tagged,
            "Tagger initialized"
        );

        self.performance = Some(snapshot);
        self.state = TaggerState::Initialized;
    }

    /// Removes the listeners. Safe to call repeatedly.
    pub fn destroy(&mut self, doc: &mut Document) {
        for id in self.installed.drain(..) {
            if !doc.remove_event_listener(id) && self.inner.config.debug() {
                debug!(listener = %id, "Listener already removed");
            }
        }
        self.state = TaggerState::Destroyed;

        if self.inner.config.debug() {
            debug!("Tagger destroyed");
        }
    }

    fn install_listeners(&mut self, doc: &mut Document) {
        let root = doc.root();
        let listeners = [
            (EventType::Click, &self.click_listener),
            (EventType::Change, &self.change_listener),
        ];

        for (event_type, listener) in listeners {
            let name = event_type.to_string();
            match doc.add_event_listener(root, event_type, Phase::Capture, listener) {
                Ok(id) => {
                    if !self.installed.contains(&id) {
                        self.installed.push(id);
                    }
                }
                Err(e) => error!(event = %name, error = %e, "Failed to install listener"),
            }
        }
    }
}

// ============================================================================
// Tagger - Operations
// ============================================================================

impl Tagger {
    /// Tags one element on demand, e.g. after it was inserted late.
    ///
    /// Returns the values the element carries afterwards, or `None` if it
    /// could not be tagged.
    pub fn tag(&self, doc: &mut Document, node: NodeId) -> Option<TaggedElement> {
        self.inner.tag_one(doc, node)
    }

    /// Tagged elements among those matching the selectors, in document order.
    #[must_use]
    pub fn tagged_elements(&self, doc: &Document) -> Vec<TaggedElement> {
        let names = self.inner.config.attributes();
        doc.query_selector_all(&self.inner.selectors)
            .into_iter()
            .filter_map(|node| read_tags(doc, node, names))
            .collect()
    }

    /// Counts over the elements matching the selectors.
    #[must_use]
    pub fn stats(&self, doc: &Document) -> TagStats {
        let total = doc.query_selector_all(&self.inner.selectors).len();
        TagStats::collect(total, &self.tagged_elements(doc))
    }

    /// Removes all four tag attributes from every matching element.
    pub fn clear_tags(&self, doc: &mut Document) {
        let names = self.inner.config.attributes();
        let mut cleared = 0usize;
        for node in doc.query_selector_all(&self.inner.selectors) {
            match clear_element(doc, node, names) {
                Ok(true) => cleared += 1,
                Ok(false) => {}
                Err(e) => warn!(node = %node, error = %e, "Failed to clear tags"),
            }
        }

        if self.inner.config.debug() {
            debug!(cleared, "Cleared tags");
        }
    }
}

// ============================================================================
// TaggerInner - Tagging
// ============================================================================

impl TaggerInner {
    /// Bulk tagging. One failing element does not stop the rest.
    fn tag_all(&self, doc: &mut Document) -> usize {
        let names = self.config.attributes();
        let mut tagged = 0usize;

        for node in doc.query_selector_all(&self.selectors) {
            if !doc.is_element(node) {
                continue;
            }
            let already = read_tags(doc, node, names).is_some();
            if self.tag_one(doc, node).is_some() && !already {
                tagged += 1;
            }
        }
        tagged
    }

    fn tag_one(&self, doc: &mut Document, node: NodeId) -> Option<TaggedElement> {
        match tag_element(doc, node, self.config.attributes()) {
            Ok(tagged) => {
                if self.config.debug() {
                    debug!(
                        node = %node,
                        element_type = %tagged.element_type,
                        action = %tagged.action,
                        context = %tagged.context,
                        "Tagged element"
                    );
                }
                Some(tagged)
            }
            Err(e) => {
                warn!(node = %node, error = %e, "Failed to tag element");
                None
            }
        }
    }
}

// ============================================================================
// TaggerInner - Events
// ============================================================================

impl TaggerInner {
    fn handle_click(&self, doc: &mut Document, target: NodeId) {
        if doc.matches(target, &self.selectors) {
            self.tag_one(doc, target);
        }

        let click_object = self.collect_click(doc, target);
        if !click_object.is_reportable() {
            if self.config.debug() {
                debug!(node = %target, "Click without action or context, not reported");
            }
            return;
        }

        if self.config.debug() {
            debug!(node = %target, click = ?click_object, "Reporting click");
        }
        self.sink.push(SinkRecord::Click {
            click_object,
            timestamp: epoch_millis(),
        });
    }

    /// Walks at most [`MAX_CLICK_DEPTH`] nodes up from `target`.
    ///
    /// Action and context come together from the first node exposing
    /// either; type and value are taken from every node that has them,
    /// so the highest one wins.
    fn collect_click(&self, doc: &Document, target: NodeId) -> ClickObject {
        let names = self.config.attributes();
        let read = |node: NodeId, name: &str| {
            doc.attribute(node, name)
                .filter(|value| !value.is_empty())
                .map(String::from)
        };

        let mut click_object = ClickObject::default();
        let mut found = false;
        let mut cursor = Some(target);

        for _ in 0..MAX_CLICK_DEPTH {
            let Some(node) = cursor else {
                break;
            };

            if !found {
                let action = read(node, names.action());
                let context = read(node, names.context());
                if action.is_some() || context.is_some() {
                    click_object.action = action;
                    click_object.context = context;
                    found = true;
                }
            }
            if let Some(element_type) = read(node, names.type_name()) {
                click_object.element_type = Some(element_type);
            }
            if let Some(value) = read(node, names.value()) {
                click_object.value = Some(value);
            }

            cursor = doc.parent(node);
        }

        click_object
    }

    fn handle_change(&self, doc: &mut Document, target: NodeId) {
        let names = self.config.attributes();
        let Some(tag) = doc.tag_name(target) else {
            return;
        };

        let update = match tag {
            "select" => selected_option_text(doc, target).map(|text| (names.action(), text)),
            "input" if is_number_input(doc, target) => {
                let value = doc.input_value(target).trim().to_string();
                (!value.is_empty()).then(|| (names.value(), value))
            }
            _ => None,
        };

        let Some((name, value)) = update else {
            return;
        };
        match doc.set_attribute(target, name, &value) {
            Ok(()) => {
                if self.config.debug() {
                    debug!(node = %target, attribute = name, value = %value, "Refreshed on change");
                }
            }
            Err(e) => warn!(node = %target, error = %e, "Failed to refresh on change"),
        }
    }
}

fn is_number_input(doc: &Document, node: NodeId) -> bool {
    doc.attribute(node, "type")
        .is_some_and(|t| t.trim().eq_ignore_ascii_case("number"))
}

// ============================================================================
// Tests
// ============================================================================
