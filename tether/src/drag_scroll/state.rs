/// Where a drag started, captured on pointer down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragOrigin {
    /// Pointer position relative to the node's layout offset.
    pub start_x: f64,
    pub start_y: f64,
    /// Scroll offsets when the drag started.
    pub scroll_left: f64,
    pub scroll_top: f64,
}

/// Two-state gesture machine of a drag-scroll attachment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging(DragOrigin),
}

impl GestureState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, GestureState::Dragging(_))
    }

    pub fn origin(&self) -> Option<DragOrigin> {
        match self {
            GestureState::Dragging(origin) => Some(*origin),
            GestureState::Idle => None,
        }
    }
}
