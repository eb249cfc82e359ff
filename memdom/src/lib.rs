pub mod document;
pub mod element;
pub mod environment;
pub mod error;
pub mod event;
pub mod intersection;
pub mod layout;
pub mod listener;
pub mod scroll;
pub mod style;

pub use document::Document;
pub use element::{Element, Node, NodeId};
pub use environment::Environment;
pub use error::DomError;
pub use event::{Event, EventData, EventPhase, MouseButton, MouseData, PointerType, Touch};
pub use intersection::{
    IntersectionCallback, IntersectionEntry, IntersectionObserverInit, Length, ObserverId,
    RootMargin, RootMarginError,
};
pub use layout::Rect;
pub use listener::{EventListener, EventTarget, ListenerId, ListenerOptions, ListenerStats};
pub use scroll::ScrollOffset;
pub use style::InlineStyle;
