//! Drag-to-scroll panning.
//!
//! Pressing on the node and moving the pointer scrolls its content the
//! opposite way, like grabbing and pulling a sheet of paper. Smooth scroll
//! easing is switched off while dragging so the content tracks the pointer,
//! and restored on release.

mod config;
mod state;

use std::cell::RefCell;
use std::rc::Rc;

pub use config::{
    Axis, AxisMask, DragCallback, DragScrollOptions, DragUpdate, EventFamily, EventNames,
    GestureCallback, ScrollAxis,
};
pub use state::{DragOrigin, GestureState};

use memdom::{Document, Event, EventListener, ListenerOptions, NodeId};

use crate::action::{Action, ListenerSet};
use config::ResolvedOptions;

const CURSOR: &str = "cursor";
const SCROLL_BEHAVIOR: &str = "scroll-behavior";

/// Listener shared by the down/move/up/leave registrations of one attachment.
struct DragScrollHandler {
    node: NodeId,
    options: ResolvedOptions,
    state: Rc<RefCell<GestureState>>,
}

impl EventListener for DragScrollHandler {
    fn handle_event(&self, doc: &mut Document, event: &mut Event) {
        let events = self.options.events;
        let kind = event.kind();
        if kind == events.down {
            self.on_down(doc, event);
        } else if kind == events.motion {
            self.on_move(doc, event);
        } else if kind == events.up || kind == events.leave {
            self.on_release(doc);
        }
    }
}

impl DragScrollHandler {
    fn on_down(&self, doc: &mut Document, event: &Event) {
        let Some(node) = doc.node(self.node) else {
            return;
        };
        let origin = DragOrigin {
            start_x: event.page_x() - node.offset_left(),
            start_y: event.page_y() - node.offset_top(),
            scroll_left: node.scroll_left,
            scroll_top: node.scroll_top,
        };

        apply_cursor(doc, self.node, self.options.cursor, true);
        *self.state.borrow_mut() = GestureState::Dragging(origin);
        log::trace!("drag scroll: {} grabbed at {:?}", self.node, origin);
        (self.options.on_drag_start)();
    }

    fn on_move(&self, doc: &mut Document, event: &mut Event) {
        let Some(origin) = self.state.borrow().origin() else {
            return;
        };
        let Some((offset_left, offset_top)) = doc
            .node(self.node)
            .map(|node| (node.offset_left(), node.offset_top()))
        else {
            return;
        };

        event.prevent_default();
        doc.set_style_property(self.node, SCROLL_BEHAVIOR, "auto");

        let axes = self.options.axes;
        if axes.x {
            let walk = (event.page_x() - offset_left) - origin.start_x;
            doc.set_scroll_left(self.node, origin.scroll_left - walk);
            if walk.abs() > 0.0 {
                let offset = doc.scroll_offset(self.node).map_or(0.0, |s| s.x);
                (self.options.on_dragging)(&DragUpdate {
                    axis: ScrollAxis::Horizontal,
                    delta: walk,
                    offset,
                });
            }
        }
        if axes.y {
            let walk = (event.page_y() - offset_top) - origin.start_y;
            doc.set_scroll_top(self.node, origin.scroll_top - walk);
            if walk.abs() > 0.0 {
                let offset = doc.scroll_offset(self.node).map_or(0.0, |s| s.y);
                (self.options.on_dragging)(&DragUpdate {
                    axis: ScrollAxis::Vertical,
                    delta: walk,
                    offset,
                });
            }
        }
    }

    fn on_release(&self, doc: &mut Document) {
        let previous = std::mem::take(&mut *self.state.borrow_mut());
        if !previous.is_dragging() {
            return;
        }

        apply_cursor(doc, self.node, self.options.cursor, false);
        doc.set_style_property(self.node, SCROLL_BEHAVIOR, "smooth");
        log::trace!("drag scroll: {} released", self.node);
        (self.options.on_drag_end)();
    }
}

/// Show the grab affordance, or clear it entirely when cursor styling is off.
fn apply_cursor(doc: &mut Document, node: NodeId, enabled: bool, active: bool) {
    if enabled {
        doc.set_style_property(node, CURSOR, if active { "grabbing" } else { "grab" });
    } else {
        doc.remove_style_property(node, CURSOR);
    }
}

/// Drag-to-scroll attachment.
pub struct DragScrollable {
    node: NodeId,
    options: DragScrollOptions,
    listeners: ListenerSet,
    state: Rc<RefCell<GestureState>>,
    cursor_applied: bool,
}

impl DragScrollable {
    pub fn attach(doc: &mut Document, node: NodeId, options: DragScrollOptions) -> Self {
        let mut this = Self {
            node,
            options,
            listeners: ListenerSet::new(),
            state: Rc::new(RefCell::new(GestureState::Idle)),
            cursor_applied: false,
        };
        this.install(doc);
        log::debug!(
            "drag scroll: attached to {node} ({} listeners)",
            this.listeners.len()
        );
        this
    }

    /// Resolve the current options and register listeners if enabled.
    fn install(&mut self, doc: &mut Document) {
        if !doc.exists(self.node) {
            log::debug!("drag scroll: {} is not in the document", self.node);
            return;
        }

        let resolved = self.options.resolve(&doc.environment());
        if !resolved.enabled {
            self.abandon_gesture(doc);
            if self.cursor_applied {
                doc.remove_style_property(self.node, CURSOR);
                self.cursor_applied = false;
            }
            return;
        }

        apply_cursor(doc, self.node, resolved.cursor, self.is_dragging());
        self.cursor_applied = resolved.cursor;

        let events = resolved.events;
        let handler: Rc<dyn EventListener> = Rc::new(DragScrollHandler {
            node: self.node,
            options: resolved,
            state: Rc::clone(&self.state),
        });
        for kind in [events.down, events.leave, events.up, events.motion] {
            self.listeners.add(
                doc,
                self.node,
                kind,
                Rc::clone(&handler),
                ListenerOptions::default(),
            );
        }
    }

    /// Drop a drag in progress without reporting its end. Smooth easing is
    /// switched back on, since the node is at rest again.
    fn abandon_gesture(&self, doc: &mut Document) {
        let previous = std::mem::take(&mut *self.state.borrow_mut());
        if previous.is_dragging() {
            doc.set_style_property(self.node, SCROLL_BEHAVIOR, "smooth");
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn options(&self) -> &DragScrollOptions {
        &self.options
    }

    pub fn gesture(&self) -> GestureState {
        *self.state.borrow()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.borrow().is_dragging()
    }

    /// Listeners currently registered by this attachment.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Action for DragScrollable {
    type Config = DragScrollOptions;

    /// Swap all listeners for ones built from `options`. A drag in progress
    /// survives the swap if the new options keep the behavior enabled.
    fn update(&mut self, doc: &mut Document, options: DragScrollOptions) {
        self.listeners.remove_all(doc);
        self.options = options;
        self.install(doc);
        log::debug!("drag scroll: updated {} -> {:?}", self.node, self.options);
    }

    fn destroy(mut self, doc: &mut Document) {
        let removed = self.listeners.remove_all(doc);
        self.abandon_gesture(doc);
        if self.cursor_applied {
            doc.remove_style_property(self.node, CURSOR);
        }
        log::debug!("drag scroll: destroyed on {}, {removed} listeners removed", self.node);
    }
}
