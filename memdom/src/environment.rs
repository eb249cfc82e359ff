/// Input capabilities of the host the document runs in.
///
/// Stands in for the `ontouchstart` / `maxTouchPoints` / `(pointer: coarse)`
/// probes a browser offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Environment {
    /// The window exposes touch events.
    pub has_touch_start: bool,
    /// Number of simultaneous touch points the device reports.
    pub max_touch_points: u32,
    /// The primary pointer is coarse (a finger rather than a mouse).
    pub coarse_pointer: bool,
}

impl Environment {
    /// A mouse-driven desktop.
    pub const fn desktop() -> Self {
        Self {
            has_touch_start: false,
            max_touch_points: 0,
            coarse_pointer: false,
        }
    }

    /// A phone or tablet with a touch screen.
    pub const fn touch() -> Self {
        Self {
            has_touch_start: true,
            max_touch_points: 5,
            coarse_pointer: true,
        }
    }

    /// True only when every probe agrees the device is touch-first.
    ///
    /// Touch point counts of 256 and above are reported by some emulators
    /// and are not trusted.
    pub fn is_touch_device(&self) -> bool {
        self.has_touch_start
            && self.coarse_pointer
            && self.max_touch_points > 0
            && self.max_touch_points < 256
    }
}
