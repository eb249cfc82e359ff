//! Attachment lifecycle shared by every behavior.

use std::rc::Rc;

use memdom::{Document, EventListener, EventTarget, ListenerId, ListenerOptions};

/// A behavior attached to one node.
///
/// Behaviors are created by an inherent `attach` constructor, reconfigured
/// through [`Action::update`] and torn down by [`Action::destroy`], which
/// consumes the attachment so it cannot be torn down twice.
///
/// `H` is the host the behavior talks to; for everything but visibility
/// watching that is the [`Document`] itself.
pub trait Action<H = Document> {
    /// Configuration accepted by `update`.
    type Config;

    /// Replace the configuration. Listeners are swapped as a whole, never
    /// left half-migrated.
    fn update(&mut self, host: &mut H, config: Self::Config);

    /// Remove everything the attachment registered.
    fn destroy(self, host: &mut H);
}

/// Listener handles owned by one attachment.
///
/// Every registration goes through here so teardown can remove exactly what
/// was added.
#[derive(Debug, Default)]
pub struct ListenerSet {
    ids: Vec<ListenerId>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        doc: &mut Document,
        target: impl Into<EventTarget>,
        kind: &str,
        listener: Rc<dyn EventListener>,
        options: ListenerOptions,
    ) -> ListenerId {
        let id = doc.add_event_listener(target, kind, listener, options);
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
        id
    }

    /// Remove every listener in the set. Returns how many were still registered.
    pub fn remove_all(&mut self, doc: &mut Document) -> usize {
        self.ids
            .drain(..)
            .filter(|id| doc.remove_event_listener(*id))
            .count()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
