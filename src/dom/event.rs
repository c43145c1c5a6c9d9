//! DOM event registration and dispatch.
//!
//! Listeners are registered per node, event type and phase. Dispatch
//! follows the DOM order:
//!
//! 1. capture listeners from the document node down to the target's parent
//! 2. capture listeners on the target, then bubble listeners on the target
//! 3. bubble listeners from the target's parent up to the document node
//!
//! [`DomEvent::stop_propagation`] ends dispatch after the current node;
//! [`DomEvent::stop_immediate_propagation`] also skips the remaining
//! listeners on the current node.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use page_tagger::dom::{EventType, Listener, Phase};
//!
//! let listener: Listener = Arc::new(|doc, event| {
//!     println!("clicked {} in {:?}", event.target(), doc);
//! });
//! let id = doc.add_event_listener(doc.root(), EventType::Click, Phase::Capture, &listener)?;
//! doc.click(button);
//! doc.remove_event_listener(id);
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};
use crate::identifiers::{ListenerId, NodeId};

use super::document::Document;

// ============================================================================
// Types
// ============================================================================

/// Event callback. Identity (pointer equality) is what registration
/// deduplicates on, so keep the `Arc` around to remove or re-add it.
pub type Listener = Arc<dyn Fn(&mut Document, &mut DomEvent) + Send + Sync>;

/// Event type names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    /// `click`
    Click,
    /// `change`
    Change,
    /// `input`
    Input,
    /// Any other event name.
    Custom(String),
}

impl EventType {
    /// Returns the DOM event name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::Change => "change",
            Self::Input => "input",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EventType {
    fn from(name: &str) -> Self {
        match name {
            "click" => Self::Click,
            "change" => Self::Change,
            "input" => Self::Input,
            other => Self::Custom(other.to_string()),
        }
    }
}

/// Listener phase selector used at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Runs on the way down (root to target).
    Capture,
    /// Runs on the way up (target to root).
    Bubble,
}

/// Phase an event is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    /// Not being dispatched.
    None,
    /// Travelling down through ancestors.
    Capturing,
    /// At the target node.
    AtTarget,
    /// Travelling up through ancestors.
    Bubbling,
}

// ============================================================================
// DomEvent
// ============================================================================

/// A dispatched event.
#[derive(Debug, Clone)]
pub struct DomEvent {
    event_type: EventType,
    target: NodeId,
    current_target: NodeId,
    phase: EventPhase,
    time_stamp: u64,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl DomEvent {
    /// Creates an undispatched event aimed at `target`.
    #[must_use]
    pub fn new(event_type: EventType, target: NodeId) -> Self {
        Self {
            event_type,
            target,
            current_target: target,
            phase: EventPhase::None,
            time_stamp: epoch_millis(),
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    /// Event type.
    #[inline]
    #[must_use]
    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    /// Node the event was dispatched at.
    #[inline]
    #[must_use]
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Node whose listeners are currently running.
    #[inline]
    #[must_use]
    pub fn current_target(&self) -> NodeId {
        self.current_target
    }

    /// Current phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    /// Creation time in milliseconds since the UNIX epoch.
    #[inline]
    #[must_use]
    pub fn time_stamp(&self) -> u64 {
        self.time_stamp
    }

    /// Stops dispatch after the current node's listeners.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stops dispatch immediately, skipping remaining listeners.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    /// Returns `true` once propagation was stopped.
    #[inline]
    #[must_use]
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Milliseconds since the UNIX epoch, `0` if the clock is before it.
pub(crate) fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

// ============================================================================
// ListenerStore
// ============================================================================

struct Registration {
    id: ListenerId,
    node: NodeId,
    event_type: EventType,
    phase: Phase,
    listener: Listener,
}

/// Registered listeners of one document, in registration order.
#[derive(Default)]
pub(crate) struct ListenerStore {
    registrations: Vec<Registration>,
    next_id: u64,
}

impl ListenerStore {
    pub(crate) fn len(&self) -> usize {
        self.registrations.len()
    }

    fn add(
        &mut self,
        node: NodeId,
        event_type: EventType,
        phase: Phase,
        listener: &Listener,
    ) -> ListenerId {
        if let Some(existing) = self.registrations.iter().find(|reg| {
            reg.node == node
                && reg.event_type == event_type
                && reg.phase == phase
                && Arc::ptr_eq(&reg.listener, listener)
        }) {
            return existing.id;
        }

        self.next_id += 1;
        let id = ListenerId::new(self.next_id);
        self.registrations.push(Registration {
            id,
            node,
            event_type,
            phase,
            listener: Arc::clone(listener),
        });
        id
    }

    fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|reg| reg.id != id);
        self.registrations.len() != before
    }

    fn contains(&self, id: ListenerId) -> bool {
        self.registrations.iter().any(|reg| reg.id == id)
    }

    fn snapshot(&self, node: NodeId, event_type: &EventType, phase: Phase) -> Vec<(ListenerId, Listener)> {
        self.registrations
            .iter()
            .filter(|reg| reg.node == node && reg.phase == phase && &reg.event_type == event_type)
            .map(|reg| (reg.id, Arc::clone(&reg.listener)))
            .collect()
    }
}

// ============================================================================
// Document - Listeners
// ============================================================================

impl Document {
    /// Registers `listener` on `node`.
    ///
    /// Registering the same listener `Arc` again for the same node, type
    /// and phase returns the existing id instead of adding a duplicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ListenerInstall`] if `node` is not part of this
    /// document or cannot be an event target.
    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        event_type: EventType,
        phase: Phase,
        listener: &Listener,
    ) -> Result<ListenerId> {
        match self.kind(node) {
            Ok(super::NodeKind::Document | super::NodeKind::Element(_)) => {}
            Ok(_) => {
                return Err(Error::listener_install(
                    event_type.as_str(),
                    format!("{node} is not an event target"),
                ));
            }
            Err(e) => return Err(Error::listener_install(event_type.as_str(), e.to_string())),
        }
        Ok(self.listeners.add(node, event_type, phase, listener))
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Returns `true` if `id` is currently registered.
    #[must_use]
    pub fn has_event_listener(&self, id: ListenerId) -> bool {
        self.listeners.contains(id)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

// ============================================================================
// Document - Dispatch
// ============================================================================

impl Document {
    /// Dispatches `event` through capture, target and bubble phases.
    ///
    /// Returns the event after dispatch so callers can inspect flags.
    pub fn dispatch_event(&mut self, mut event: DomEvent) -> DomEvent {
        let target = event.target;
        let mut path = Vec::new();
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.parent(node);
        }
        path.reverse();

        let ancestors = &path[..path.len().saturating_sub(1)];

        for &node in ancestors {
            event.phase = EventPhase::Capturing;
            event.current_target = node;
            self.invoke(node, &mut event, Phase::Capture);
            if event.propagation_stopped {
                return finish(event);
            }
        }

        event.phase = EventPhase::AtTarget;
        event.current_target = target;
        self.invoke(target, &mut event, Phase::Capture);
        if event.propagation_stopped {
            return finish(event);
        }
        self.invoke(target, &mut event, Phase::Bubble);
        if event.propagation_stopped {
            return finish(event);
        }

        for &node in ancestors.iter().rev() {
            event.phase = EventPhase::Bubbling;
            event.current_target = node;
            self.invoke(node, &mut event, Phase::Bubble);
            if event.propagation_stopped {
                break;
            }
        }

        finish(event)
    }

    /// Dispatches a `click` at `node`.
    pub fn click(&mut self, node: NodeId) -> DomEvent {
        self.dispatch_event(DomEvent::new(EventType::Click, node))
    }

    /// Dispatches a `change` at `node`.
    pub fn change(&mut self, node: NodeId) -> DomEvent {
        self.dispatch_event(DomEvent::new(EventType::Change, node))
    }

    fn invoke(&mut self, node: NodeId, event: &mut DomEvent, phase: Phase) {
        let listeners = self.listeners.snapshot(node, &event.event_type, phase);
        for (id, listener) in listeners {
            // Listeners removed by an earlier listener in this round are skipped.
            if !self.listeners.contains(id) {
                continue;
            }
            listener(self, event);
            if event.immediate_propagation_stopped {
                break;
            }
        }
    }
}

fn finish(mut event: DomEvent) -> DomEvent {
    event.phase = EventPhase::None;
    event.current_target = event.target;
    event
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use parking_lot::Mutex;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, label: &str) -> Listener {
        let log = Arc::clone(log);
        let label = label.to_string();
        Arc::new(move |_doc: &mut Document, event: &mut DomEvent| {
            log.lock().push(format!("{label}:{:?}", event.phase()));
        })
    }

    fn tree() -> (Document, NodeId, NodeId) {
        let mut doc = Document::new();
        let section = doc.append_element(doc.body(), "section", &[]).unwrap();
        let button = doc.append_element(section, "button", &[]).unwrap();
        (doc, section, button)
    }

    #[test]
    fn test_event_type_names() {
        assert_eq!(EventType::Click.as_str(), "click");
        assert_eq!(EventType::from("change"), EventType::Change);
        assert_eq!(EventType::from("focus"), EventType::Custom("focus".into()));
    }

    #[test]
    fn test_dispatch_order() {
        let (mut doc, section, button) = tree();
        let log = Arc::new(Mutex::new(Vec::new()));
        let root = doc.root();

        doc.add_event_listener(root, EventType::Click, Phase::Bubble, &recorder(&log, "doc-bubble"))
            .unwrap();
        doc.add_event_listener(section, EventType::Click, Phase::Bubble, &recorder(&log, "section-bubble"))
            .unwrap();
        doc.add_event_listener(button, EventType::Click, Phase::Bubble, &recorder(&log, "button"))
            .unwrap();
        doc.add_event_listener(root, EventType::Click, Phase::Capture, &recorder(&log, "doc-capture"))
            .unwrap();

        doc.click(button);

        assert_eq!(
            *log.lock(),
            vec![
                "doc-capture:Capturing",
                "button:AtTarget",
                "section-bubble:Bubbling",
                "doc-bubble:Bubbling",
            ]
        );
    }

    #[test]
    fn test_capture_runs_before_stop_propagation_in_bubble() {
        let (mut doc, section, button) = tree();
        let log = Arc::new(Mutex::new(Vec::new()));
        let root = doc.root();

        let stopper: Listener = Arc::new(|_doc: &mut Document, event: &mut DomEvent| {
            event.stop_propagation();
        });
        doc.add_event_listener(section, EventType::Click, Phase::Bubble, &stopper)
            .unwrap();
        doc.add_event_listener(root, EventType::Click, Phase::Capture, &recorder(&log, "capture"))
            .unwrap();
        doc.add_event_listener(root, EventType::Click, Phase::Bubble, &recorder(&log, "bubble"))
            .unwrap();

        let event = doc.click(button);

        assert!(event.propagation_stopped());
        assert_eq!(*log.lock(), vec!["capture:Capturing"]);
    }

    #[test]
    fn test_stop_immediate_propagation_skips_siblings() {
        let (mut doc, _, button) = tree();
        let log = Arc::new(Mutex::new(Vec::new()));

        let stopper: Listener = Arc::new(|_doc: &mut Document, event: &mut DomEvent| {
            event.stop_immediate_propagation();
        });
        doc.add_event_listener(button, EventType::Click, Phase::Bubble, &stopper)
            .unwrap();
        doc.add_event_listener(button, EventType::Click, Phase::Bubble, &recorder(&log, "late"))
            .unwrap();

        doc.click(button);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_duplicate_registration_is_deduplicated() {
        let (mut doc, _, _) = tree();
        let log = Arc::new(Mutex::new(Vec::new()));
        let listener = recorder(&log, "x");
        let root = doc.root();

        let first = doc
            .add_event_listener(root, EventType::Click, Phase::Capture, &listener)
            .unwrap();
        let second = doc
            .add_event_listener(root, EventType::Click, Phase::Capture, &listener)
            .unwrap();
        let bubble = doc
            .add_event_listener(root, EventType::Click, Phase::Bubble, &listener)
            .unwrap();

        assert_eq!(first, second);
        assert_ne!(first, bubble);
        assert_eq!(doc.listener_count(), 2);
    }

    #[test]
    fn test_remove_listener() {
        let (mut doc, _, button) = tree();
        let log = Arc::new(Mutex::new(Vec::new()));
        let root = doc.root();
        let id = doc
            .add_event_listener(root, EventType::Click, Phase::Capture, &recorder(&log, "x"))
            .unwrap();

        assert!(doc.remove_event_listener(id));
        assert!(!doc.remove_event_listener(id));
        doc.click(button);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_event_type_filtering() {
        let (mut doc, _, button) = tree();
        let log = Arc::new(Mutex::new(Vec::new()));
        let root = doc.root();
        doc.add_event_listener(root, EventType::Change, Phase::Capture, &recorder(&log, "change"))
            .unwrap();

        doc.click(button);
        assert!(log.lock().is_empty());
        doc.change(button);
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn test_listener_on_text_node_rejected() {
        let (mut doc, _, button) = tree();
        let text = doc.append_text(button, "Go").unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        let err = doc
            .add_event_listener(text, EventType::Click, Phase::Capture, &recorder(&log, "x"))
            .unwrap_err();
        assert!(matches!(err, Error::ListenerInstall { .. }));
    }

    #[test]
    fn test_listener_can_mutate_document() {
        let (mut doc, _, button) = tree();
        let root = doc.root();
        let marker: Listener = Arc::new(|doc: &mut Document, event: &mut DomEvent| {
            let _ = doc.set_attribute(event.target(), "data-seen", "yes");
        });
        doc.add_event_listener(root, EventType::Click, Phase::Capture, &marker)
            .unwrap();

        doc.click(button);
        assert_eq!(doc.attribute(button, "data-seen"), Some("yes"));
    }
}
