//! Pointer slide tracking.
//!
//! Turns a press on the node followed by window-level moves into positional
//! notifications dispatched on the node:
//!
//! - `slidestart` with [`SlideStart`]
//! - `slide` with [`Slide`] (`dx`/`dy` relative to the previous sample)
//! - `slideend` with [`SlideEnd`] (`left`/`top` are the node's layout
//!   offset at release, not the pointer position)
//!
//! Mouse and touch input are both accepted; the source of the press decides
//! which move/end events are followed on the window.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use memdom::{Document, Event, EventListener, EventTarget, ListenerId, ListenerOptions, NodeId};

use crate::action::{Action, ListenerSet};

pub const SLIDE_START: &str = "slidestart";
pub const SLIDE: &str = "slide";
pub const SLIDE_END: &str = "slideend";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideStart {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slide {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideEnd {
    pub x: f64,
    pub y: f64,
    pub left: f64,
    pub top: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlideSource {
    Mouse,
    Touch,
}

impl SlideSource {
    fn of(event: &Event) -> Self {
        if event.kind() == "touchstart" {
            SlideSource::Touch
        } else {
            SlideSource::Mouse
        }
    }

    fn move_event(&self) -> &'static str {
        match self {
            SlideSource::Mouse => "mousemove",
            SlideSource::Touch => "touchmove",
        }
    }

    fn end_event(&self) -> &'static str {
        match self {
            SlideSource::Mouse => "mouseup",
            SlideSource::Touch => "touchend",
        }
    }

    /// Client position of the event; the first changed touch for touch input.
    fn position(&self, event: &Event) -> (f64, f64) {
        match self {
            SlideSource::Mouse => (event.client_x(), event.client_y()),
            SlideSource::Touch => event
                .changed_touches()
                .first()
                .map_or((0.0, 0.0), |touch| (touch.client_x, touch.client_y)),
        }
    }
}

#[derive(Debug)]
struct ActiveSlide {
    source: SlideSource,
    x: f64,
    y: f64,
    window_listeners: [ListenerId; 2],
}

#[derive(Debug, Default)]
struct SlideState {
    active: Option<ActiveSlide>,
}

struct SlideHandler {
    node: NodeId,
    this: Weak<SlideHandler>,
    state: RefCell<SlideState>,
}

impl EventListener for SlideHandler {
    fn handle_event(&self, doc: &mut Document, event: &mut Event) {
        match event.kind() {
            "mousedown" | "touchstart" => self.on_start(doc, event),
            "mousemove" | "touchmove" => self.on_move(doc, event),
            "mouseup" | "touchend" => self.on_end(doc, event),
            _ => {}
        }
    }
}

impl SlideHandler {
    fn on_start(&self, doc: &mut Document, event: &mut Event) {
        event.stop_propagation();
        let Some(this) = self.this.upgrade() else {
            return;
        };

        // A press while already sliding restarts the gesture.
        self.release_window(doc);

        let source = SlideSource::of(event);
        let (x, y) = source.position(event);
        let listener: Rc<dyn EventListener> = this;
        let window_listeners = [
            doc.add_event_listener(
                EventTarget::Window,
                source.move_event(),
                Rc::clone(&listener),
                ListenerOptions::default(),
            ),
            doc.add_event_listener(
                EventTarget::Window,
                source.end_event(),
                listener,
                ListenerOptions::default(),
            ),
        ];
        self.state.borrow_mut().active = Some(ActiveSlide {
            source,
            x,
            y,
            window_listeners,
        });

        log::trace!("slidable: {} started at ({x}, {y})", self.node);
        let mut notice = Event::custom(SLIDE_START, SlideStart { x, y });
        doc.dispatch_event(self.node, &mut notice);
    }

    fn on_move(&self, doc: &mut Document, event: &mut Event) {
        let detail = {
            let mut state = self.state.borrow_mut();
            let Some(active) = state.active.as_mut() else {
                return;
            };
            if event.kind() != active.source.move_event() {
                return;
            }
            event.stop_propagation();

            let (x, y) = active.source.position(event);
            let detail = Slide {
                x,
                y,
                dx: x - active.x,
                dy: y - active.y,
            };
            active.x = x;
            active.y = y;
            detail
        };

        let mut notice = Event::custom(SLIDE, detail);
        doc.dispatch_event(self.node, &mut notice);
    }

    fn on_end(&self, doc: &mut Document, event: &mut Event) {
        let source = match &self.state.borrow().active {
            Some(active) if event.kind() == active.source.end_event() => active.source,
            _ => return,
        };
        event.stop_propagation();
        self.release_window(doc);

        let (left, top) = doc
            .node(self.node)
            .map_or((0.0, 0.0), |node| (node.offset_left(), node.offset_top()));
        let (x, y) = source.position(event);

        log::trace!("slidable: {} ended at ({x}, {y})", self.node);
        let mut notice = Event::custom(SLIDE_END, SlideEnd { x, y, left, top });
        doc.dispatch_event(self.node, &mut notice);
    }

    /// Drop the active gesture and its window listeners, if any.
    fn release_window(&self, doc: &mut Document) {
        let active = self.state.borrow_mut().active.take();
        if let Some(active) = active {
            for id in active.window_listeners {
                doc.remove_event_listener(id);
            }
        }
    }

    fn is_active(&self) -> bool {
        self.state.borrow().active.is_some()
    }
}

/// Slide-tracking attachment.
pub struct Slidable {
    node: NodeId,
    handler: Rc<SlideHandler>,
    listeners: ListenerSet,
}

impl Slidable {
    pub fn attach(doc: &mut Document, node: NodeId) -> Self {
        let handler = Rc::new_cyclic(|this| SlideHandler {
            node,
            this: this.clone(),
            state: RefCell::new(SlideState::default()),
        });
        let mut listeners = ListenerSet::new();

        if doc.exists(node) {
            let listener: Rc<dyn EventListener> = handler.clone();
            for kind in ["mousedown", "touchstart"] {
                listeners.add(
                    doc,
                    node,
                    kind,
                    Rc::clone(&listener),
                    ListenerOptions::default(),
                );
            }
            log::debug!("slidable: attached to {node}");
        } else {
            log::debug!("slidable: {node} is not in the document");
        }

        Self {
            node,
            handler,
            listeners,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Whether a slide gesture is in progress.
    pub fn is_sliding(&self) -> bool {
        self.handler.is_active()
    }
}

impl Action for Slidable {
    type Config = ();

    fn update(&mut self, _doc: &mut Document, _config: ()) {}

    /// Also releases the window listeners of a gesture still in progress.
    fn destroy(mut self, doc: &mut Document) {
        self.listeners.remove_all(doc);
        self.handler.release_window(doc);
        log::debug!("slidable: destroyed on {}", self.node);
    }
}
