//! Drag-scroll options and their resolution against the host environment.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::sync::LazyLock;

use memdom::Environment;
use regex::Regex;

use crate::error::ConfigError;

static EVENT_FAMILY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(pointer|mouse)$").expect("valid event family pattern"));

/// Axes a drag acts upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    #[default]
    X,
    Y,
    Both,
    /// Listeners stay attached but drags move nothing.
    Neither,
}

impl Axis {
    pub fn mask(&self) -> AxisMask {
        match self {
            Axis::X => AxisMask { x: true, y: false },
            Axis::Y => AxisMask { x: false, y: true },
            Axis::Both => AxisMask { x: true, y: true },
            Axis::Neither => AxisMask { x: false, y: false },
        }
    }

    /// Parse, falling back to the default axis on unknown input.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_else(|err: ConfigError| {
            log::warn!("{err}, using '{}'", Axis::default());
            Axis::default()
        })
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Both => "both",
            Axis::Neither => "neither",
        };
        f.write_str(name)
    }
}

impl FromStr for Axis {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "both" => Ok(Axis::Both),
            "neither" | "none" => Ok(Axis::Neither),
            _ => Err(ConfigError::UnknownAxis(s.to_string())),
        }
    }
}

/// Per-axis enable flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisMask {
    pub x: bool,
    pub y: bool,
}

/// Which native event family drives the drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFamily {
    Pointer,
    Mouse,
    /// Pointer events on touch devices, mouse events elsewhere.
    #[default]
    Auto,
}

impl EventFamily {
    /// Parse, falling back to [`EventFamily::Auto`] on unknown input.
    pub fn parse_or_auto(s: &str) -> Self {
        s.parse().unwrap_or_else(|err: ConfigError| {
            log::warn!("{err}, detecting from the environment");
            EventFamily::Auto
        })
    }

    /// Pick the concrete event names for this family.
    pub fn resolve(&self, environment: &Environment) -> EventNames {
        match self {
            EventFamily::Pointer => EventNames::POINTER,
            EventFamily::Mouse => EventNames::MOUSE,
            EventFamily::Auto if environment.is_touch_device() => EventNames::POINTER,
            EventFamily::Auto => EventNames::MOUSE,
        }
    }
}

impl FromStr for EventFamily {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !EVENT_FAMILY.is_match(s) {
            return Err(ConfigError::UnknownEventFamily(s.to_string()));
        }
        if s.eq_ignore_ascii_case("pointer") {
            Ok(EventFamily::Pointer)
        } else {
            Ok(EventFamily::Mouse)
        }
    }
}

/// Native event names a drag listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventNames {
    pub down: &'static str,
    pub up: &'static str,
    pub motion: &'static str,
    pub leave: &'static str,
}

impl EventNames {
    pub const POINTER: Self = Self {
        down: "pointerdown",
        up: "pointerup",
        motion: "pointermove",
        leave: "pointerleave",
    };

    pub const MOUSE: Self = Self {
        down: "mousedown",
        up: "mouseup",
        motion: "mousemove",
        leave: "mouseleave",
    };
}

/// Single scroll axis reported in drag progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAxis {
    Horizontal,
    Vertical,
}

/// Progress of a drag along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    pub axis: ScrollAxis,
    /// Pointer travel since the drag started.
    pub delta: f64,
    /// Scroll offset after applying the move.
    pub offset: f64,
}

pub type DragCallback = Rc<dyn Fn(&DragUpdate)>;
pub type GestureCallback = Rc<dyn Fn()>;

/// Options of a [`DragScrollable`](super::DragScrollable).
#[derive(Clone)]
pub struct DragScrollOptions {
    /// When false no listeners are attached at all.
    pub enabled: bool,
    pub axis: Axis,
    pub event: EventFamily,
    /// Show `grab`/`grabbing` cursors. When false the `cursor` property is removed.
    pub cursor: bool,
    on_drag_start: Option<GestureCallback>,
    on_dragging: Option<DragCallback>,
    on_drag_end: Option<GestureCallback>,
}

impl Default for DragScrollOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            axis: Axis::default(),
            event: EventFamily::default(),
            cursor: true,
            on_drag_start: None,
            on_dragging: None,
            on_drag_end: None,
        }
    }
}

impl fmt::Debug for DragScrollOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragScrollOptions")
            .field("enabled", &self.enabled)
            .field("axis", &self.axis)
            .field("event", &self.event)
            .field("cursor", &self.cursor)
            .field("on_drag_start", &self.on_drag_start.is_some())
            .field("on_dragging", &self.on_dragging.is_some())
            .field("on_drag_end", &self.on_drag_end.is_some())
            .finish()
    }
}

impl DragScrollOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn event(mut self, event: EventFamily) -> Self {
        self.event = event;
        self
    }

    pub fn cursor(mut self, cursor: bool) -> Self {
        self.cursor = cursor;
        self
    }

    /// Called once when a drag begins.
    pub fn on_drag_start(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_drag_start = Some(Rc::new(callback));
        self
    }

    /// Called once per axis that moved during a pointer move.
    pub fn on_dragging(mut self, callback: impl Fn(&DragUpdate) + 'static) -> Self {
        self.on_dragging = Some(Rc::new(callback));
        self
    }

    /// Called once when a drag ends.
    pub fn on_drag_end(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_drag_end = Some(Rc::new(callback));
        self
    }

    pub(crate) fn resolve(&self, environment: &Environment) -> ResolvedOptions {
        let noop: GestureCallback = Rc::new(|| {});
        ResolvedOptions {
            enabled: self.enabled,
            axes: self.axis.mask(),
            events: self.event.resolve(environment),
            cursor: self.cursor,
            on_drag_start: self.on_drag_start.clone().unwrap_or_else(|| noop.clone()),
            on_dragging: self.on_dragging.clone().unwrap_or_else(|| Rc::new(|_: &DragUpdate| {})),
            on_drag_end: self.on_drag_end.clone().unwrap_or(noop),
        }
    }
}

/// Options with the event family decided and callbacks filled in.
pub(crate) struct ResolvedOptions {
    pub enabled: bool,
    pub axes: AxisMask,
    pub events: EventNames,
    pub cursor: bool,
    pub on_drag_start: GestureCallback,
    pub on_dragging: DragCallback,
    pub on_drag_end: GestureCallback,
}
