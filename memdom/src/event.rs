use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::listener::EventTarget;

/// An event travelling through a document.
///
/// Events are created by the host (or by behaviors for custom
/// notifications) and handed to [`Document::dispatch_event`], which fills in
/// targeting, phase and page coordinates.
///
/// [`Document::dispatch_event`]: crate::Document::dispatch_event
pub struct Event {
    kind: String,
    bubbles: bool,
    cancelable: bool,
    data: EventData,
    pub(crate) target: Option<EventTarget>,
    pub(crate) current_target: Option<EventTarget>,
    pub(crate) phase: EventPhase,
    pub(crate) default_prevented: bool,
    pub(crate) propagation_stopped: bool,
    pub(crate) immediate_propagation_stopped: bool,
}

/// Dispatch phase the event is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPhase {
    #[default]
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Kind of device behind a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerType {
    #[default]
    Mouse,
    Pen,
    Touch,
}

/// Coordinates and button of a mouse-like event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MouseData {
    pub client_x: f64,
    pub client_y: f64,
    /// Filled in at dispatch from the window scroll offset.
    pub page_x: f64,
    pub page_y: f64,
    pub button: MouseButton,
}

/// One touch point of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Touch {
    pub identifier: i64,
    pub client_x: f64,
    pub client_y: f64,
    pub page_x: f64,
    pub page_y: f64,
}

impl Touch {
    pub fn new(identifier: i64, client_x: f64, client_y: f64) -> Self {
        Self {
            identifier,
            client_x,
            client_y,
            page_x: client_x,
            page_y: client_y,
        }
    }
}

/// Payload carried by an event.
#[derive(Clone, Default)]
pub enum EventData {
    #[default]
    None,
    Mouse(MouseData),
    Pointer {
        mouse: MouseData,
        pointer_id: i64,
        pointer_type: PointerType,
    },
    Touch {
        changed_touches: Vec<Touch>,
    },
    /// Structured detail of a custom event; receivers downcast it.
    Custom(Rc<dyn Any>),
}

impl fmt::Debug for EventData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventData::None => write!(f, "None"),
            EventData::Mouse(mouse) => f.debug_tuple("Mouse").field(mouse).finish(),
            EventData::Pointer {
                mouse,
                pointer_id,
                pointer_type,
            } => f
                .debug_struct("Pointer")
                .field("mouse", mouse)
                .field("pointer_id", pointer_id)
                .field("pointer_type", pointer_type)
                .finish(),
            EventData::Touch { changed_touches } => f
                .debug_struct("Touch")
                .field("changed_touches", changed_touches)
                .finish(),
            EventData::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.kind)
            .field("bubbles", &self.bubbles)
            .field("cancelable", &self.cancelable)
            .field("target", &self.target)
            .field("phase", &self.phase)
            .field("default_prevented", &self.default_prevented)
            .field("data", &self.data)
            .finish()
    }
}

/// Events of the enter/leave family never bubble and cannot be cancelled.
fn is_boundary_event(kind: &str) -> bool {
    matches!(
        kind,
        "mouseenter" | "mouseleave" | "pointerenter" | "pointerleave"
    )
}

impl Event {
    /// A plain event that does not bubble and cannot be cancelled.
    pub fn new(kind: impl Into<String>) -> Self {
        Self::build(kind, false, false, EventData::None)
    }

    fn build(kind: impl Into<String>, bubbles: bool, cancelable: bool, data: EventData) -> Self {
        Self {
            kind: kind.into(),
            bubbles,
            cancelable,
            data,
            target: None,
            current_target: None,
            phase: EventPhase::None,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    /// A mouse event (`mousedown`, `mousemove`, `click`, ...) at client coordinates.
    pub fn mouse(kind: impl Into<String>, client_x: f64, client_y: f64) -> Self {
        let kind = kind.into();
        let interactive = !is_boundary_event(&kind);
        let data = EventData::Mouse(MouseData {
            client_x,
            client_y,
            page_x: client_x,
            page_y: client_y,
            button: MouseButton::Left,
        });
        Self::build(kind, interactive, interactive, data)
    }

    /// A primary-button click at client coordinates.
    pub fn click(client_x: f64, client_y: f64) -> Self {
        Self::mouse("click", client_x, client_y)
    }

    /// A pointer event (`pointerdown`, `pointermove`, ...) from the primary mouse pointer.
    pub fn pointer(kind: impl Into<String>, client_x: f64, client_y: f64) -> Self {
        let kind = kind.into();
        let interactive = !is_boundary_event(&kind);
        let data = EventData::Pointer {
            mouse: MouseData {
                client_x,
                client_y,
                page_x: client_x,
                page_y: client_y,
                button: MouseButton::Left,
            },
            pointer_id: 1,
            pointer_type: PointerType::Mouse,
        };
        Self::build(kind, interactive, interactive, data)
    }

    /// A touch event (`touchstart`, `touchmove`, `touchend`).
    pub fn touch(kind: impl Into<String>, changed_touches: Vec<Touch>) -> Self {
        Self::build(kind, true, true, EventData::Touch { changed_touches })
    }

    /// A custom notification carrying a typed detail.
    ///
    /// Like a freshly constructed `CustomEvent`, it does not bubble unless
    /// [`Event::with_bubbles`] is applied.
    pub fn custom<T: Any>(kind: impl Into<String>, detail: T) -> Self {
        Self::build(kind, false, false, EventData::Custom(Rc::new(detail)))
    }

    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    pub fn button(mut self, button: MouseButton) -> Self {
        if let Some(mouse) = self.mouse_data_mut() {
            mouse.button = button;
        }
        self
    }

    pub fn pointer_type(mut self, kind: PointerType) -> Self {
        if let EventData::Pointer { pointer_type, .. } = &mut self.data {
            *pointer_type = kind;
        }
        self
    }

    // Accessors
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    pub fn target(&self) -> Option<EventTarget> {
        self.target
    }

    pub fn current_target(&self) -> Option<EventTarget> {
        self.current_target
    }

    pub fn phase(&self) -> EventPhase {
        self.phase
    }

    pub fn data(&self) -> &EventData {
        &self.data
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Cancel the default action. Has no effect on non-cancelable events.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop the event from reaching further targets on its path.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop the event, including remaining listeners on the current target.
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn mouse_data(&self) -> Option<&MouseData> {
        match &self.data {
            EventData::Mouse(mouse) | EventData::Pointer { mouse, .. } => Some(mouse),
            _ => None,
        }
    }

    fn mouse_data_mut(&mut self) -> Option<&mut MouseData> {
        match &mut self.data {
            EventData::Mouse(mouse) | EventData::Pointer { mouse, .. } => Some(mouse),
            _ => None,
        }
    }

    pub fn client_x(&self) -> f64 {
        self.mouse_data().map_or(0.0, |m| m.client_x)
    }

    pub fn client_y(&self) -> f64 {
        self.mouse_data().map_or(0.0, |m| m.client_y)
    }

    pub fn page_x(&self) -> f64 {
        self.mouse_data().map_or(0.0, |m| m.page_x)
    }

    pub fn page_y(&self) -> f64 {
        self.mouse_data().map_or(0.0, |m| m.page_y)
    }

    pub fn changed_touches(&self) -> &[Touch] {
        match &self.data {
            EventData::Touch { changed_touches } => changed_touches,
            _ => &[],
        }
    }

    /// Downcast the detail of a custom event.
    pub fn detail<T: Any>(&self) -> Option<&T> {
        match &self.data {
            EventData::Custom(detail) => detail.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Derive page coordinates from the window scroll offset.
    pub(crate) fn apply_window_scroll(&mut self, scroll_x: f64, scroll_y: f64) {
        match &mut self.data {
            EventData::Mouse(mouse) | EventData::Pointer { mouse, .. } => {
                mouse.page_x = mouse.client_x + scroll_x;
                mouse.page_y = mouse.client_y + scroll_y;
            }
            EventData::Touch { changed_touches } => {
                for touch in changed_touches {
                    touch.page_x = touch.client_x + scroll_x;
                    touch.page_y = touch.client_y + scroll_y;
                }
            }
            EventData::None | EventData::Custom(_) => {}
        }
    }

    pub(crate) fn reset_dispatch_flags(&mut self) {
        self.propagation_stopped = false;
        self.immediate_propagation_stopped = false;
        self.current_target = None;
        self.phase = EventPhase::None;
    }
}
