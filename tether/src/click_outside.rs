//! Outside-click detection.

use std::rc::Rc;

use memdom::{Document, Event, EventTarget, ListenerId, ListenerOptions, NodeId};

use crate::action::Action;

pub const CLICK_OUTSIDE: &str = "click_outside";

/// Detail of a `click_outside` notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickOutsideDetail {
    /// Target of the click.
    pub clicked: EventTarget,
    /// The node the click landed outside of.
    pub reference: NodeId,
}

/// Raises `click_outside` on the node for clicks that land elsewhere.
///
/// Listens on the document in the capturing phase, so handlers that stop
/// propagation while bubbling cannot hide a click from it. Clicks whose
/// default action was already prevented are ignored.
#[derive(Debug)]
pub struct ClickOutside {
    node: NodeId,
    listener: Option<ListenerId>,
}

impl ClickOutside {
    pub fn attach(doc: &mut Document, node: NodeId) -> Self {
        if !doc.exists(node) {
            log::debug!("click outside: {node} is not in the document");
            return Self {
                node,
                listener: None,
            };
        }

        let listener = doc.add_event_listener(
            EventTarget::Document,
            "click",
            Rc::new(move |doc: &mut Document, event: &mut Event| notify_outside(doc, node, event)),
            ListenerOptions::capture(),
        );
        log::debug!("click outside: watching clicks around {node}");
        Self {
            node,
            listener: Some(listener),
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

fn notify_outside(doc: &mut Document, node: NodeId, event: &Event) {
    if !doc.exists(node) || event.default_prevented() {
        return;
    }
    let Some(clicked) = event.target() else {
        return;
    };
    let inside = match clicked {
        EventTarget::Node(id) => doc.contains(node, id),
        EventTarget::Window | EventTarget::Document => false,
    };
    if inside {
        return;
    }

    log::trace!("click outside: {clicked:?} is outside {node}");
    let mut notice = Event::custom(
        CLICK_OUTSIDE,
        ClickOutsideDetail {
            clicked,
            reference: node,
        },
    );
    doc.dispatch_event(node, &mut notice);
}

impl Action for ClickOutside {
    type Config = ();

    fn update(&mut self, _doc: &mut Document, _config: ()) {}

    fn destroy(self, doc: &mut Document) {
        if let Some(listener) = self.listener {
            doc.remove_event_listener(listener);
        }
        log::debug!("click outside: stopped watching {}", self.node);
    }
}
