use std::rc::Rc;

use crate::document::Document;
use crate::element::NodeId;
use crate::event::Event;

/// Something that can receive event listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    Window,
    Document,
    Node(NodeId),
}

impl From<NodeId> for EventTarget {
    fn from(id: NodeId) -> Self {
        EventTarget::Node(id)
    }
}

impl EventTarget {
    pub fn node(&self) -> Option<NodeId> {
        match self {
            EventTarget::Node(id) => Some(*id),
            _ => None,
        }
    }
}

/// Receives events dispatched to the target it is registered on.
///
/// The document is handed back mutably so a listener can restyle nodes,
/// scroll them, dispatch follow-up events, or (un)register listeners while
/// the current dispatch is in flight.
pub trait EventListener {
    fn handle_event(&self, doc: &mut Document, event: &mut Event);
}

impl<F> EventListener for F
where
    F: Fn(&mut Document, &mut Event),
{
    fn handle_event(&self, doc: &mut Document, event: &mut Event) {
        self(doc, event)
    }
}

/// Handle returned by [`Document::add_event_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Registration flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Invoke during the capturing phase instead of the bubbling phase.
    pub capture: bool,
}

impl ListenerOptions {
    pub const fn capture() -> Self {
        Self { capture: true }
    }
}

/// Registration counters, used to check that attachments clean up after themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStats {
    /// Registrations ever made (duplicates of a live registration excluded).
    pub added: usize,
    /// Registrations ever removed.
    pub removed: usize,
}

impl ListenerStats {
    /// Registrations currently live.
    pub fn active(&self) -> usize {
        self.added - self.removed
    }
}

struct Registration {
    id: ListenerId,
    target: EventTarget,
    kind: String,
    capture: bool,
    listener: Rc<dyn EventListener>,
}

/// Listener storage for one document, in registration order.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    registrations: Vec<Registration>,
    stats: ListenerStats,
}

fn same_listener(a: &Rc<dyn EventListener>, b: &Rc<dyn EventListener>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

impl ListenerRegistry {
    /// Register a listener.
    ///
    /// Registering the same listener object for the same target, event type
    /// and phase again returns the existing handle instead of adding a second
    /// registration.
    pub fn add(
        &mut self,
        target: EventTarget,
        kind: &str,
        listener: Rc<dyn EventListener>,
        options: ListenerOptions,
    ) -> ListenerId {
        if let Some(existing) = self.registrations.iter().find(|r| {
            r.target == target
                && r.kind == kind
                && r.capture == options.capture
                && same_listener(&r.listener, &listener)
        }) {
            return existing.id;
        }

        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration {
            id,
            target,
            kind: kind.to_string(),
            capture: options.capture,
            listener,
        });
        self.stats.added += 1;
        id
    }

    /// Remove a registration. Returns false if it was already gone.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let Some(idx) = self.registrations.iter().position(|r| r.id == id) else {
            return false;
        };
        self.registrations.remove(idx);
        self.stats.removed += 1;
        true
    }

    pub fn is_registered(&self, id: ListenerId) -> bool {
        self.registrations.iter().any(|r| r.id == id)
    }

    /// Snapshot of the listeners for one target, type and phase.
    pub fn collect(
        &self,
        target: EventTarget,
        kind: &str,
        capture: bool,
    ) -> Vec<(ListenerId, Rc<dyn EventListener>)> {
        self.registrations
            .iter()
            .filter(|r| r.target == target && r.kind == kind && r.capture == capture)
            .map(|r| (r.id, Rc::clone(&r.listener)))
            .collect()
    }

    pub fn count(&self, target: EventTarget) -> usize {
        self.registrations
            .iter()
            .filter(|r| r.target == target)
            .count()
    }

    pub fn count_kind(&self, target: EventTarget, kind: &str) -> usize {
        self.registrations
            .iter()
            .filter(|r| r.target == target && r.kind == kind)
            .count()
    }

    pub fn stats(&self) -> ListenerStats {
        self.stats
    }
}
