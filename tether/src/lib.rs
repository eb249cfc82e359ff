pub mod action;
pub mod click_outside;
pub mod css_vars;
pub mod drag_scroll;
pub mod error;
pub mod slidable;
pub mod visibility;

pub use action::{Action, ListenerSet};
pub use error::ConfigError;

pub mod prelude {
    pub use crate::action::Action;
    pub use crate::click_outside::{CLICK_OUTSIDE, ClickOutside, ClickOutsideDetail};
    pub use crate::css_vars::{CssVariables, CssVars, set_css_variables};
    pub use crate::drag_scroll::{
        Axis, DragScrollOptions, DragScrollable, DragUpdate, EventFamily, GestureState,
        ScrollAxis,
    };
    pub use crate::error::ConfigError;
    pub use crate::slidable::{SLIDE, SLIDE_END, SLIDE_START, Slidable, Slide, SlideEnd, SlideStart};
    pub use crate::visibility::{
        ObserverFactory, VisibilityRegistry, VisibilityWatcher, WatchOptions, threshold_steps,
    };

    pub use memdom::{Document, Element, Environment, Event, EventTarget, NodeId, Rect};
}
