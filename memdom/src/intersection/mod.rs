//! Intersection observers.
//!
//! Observers are created on a [`Document`] with a root, a root margin and a
//! list of thresholds. [`Document::run_intersection_checks`] plays the role of
//! the browser's rendering-step check: it measures every observed target and
//! delivers one batch of entries per observer whose targets crossed a
//! threshold since the previous check.

mod margin;
mod observer;

use std::fmt;
use std::rc::Rc;

pub use margin::{Length, RootMargin, RootMarginError};
pub(crate) use observer::ObserverRegistry;

use crate::document::Document;
use crate::element::NodeId;
use crate::layout::Rect;

/// Handle to an observer created by a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(pub(crate) u64);

impl ObserverId {
    /// Build a handle for an observer managed outside a [`Document`].
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Callback receiving the entries of one delivery.
pub type IntersectionCallback = Rc<dyn Fn(&mut Document, &[IntersectionEntry])>;

/// Construction options of an observer.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionObserverInit {
    /// Element whose box is the root. `None` uses the viewport.
    pub root: Option<NodeId>,
    pub root_margin: RootMargin,
    thresholds: Vec<f64>,
}

impl Default for IntersectionObserverInit {
    fn default() -> Self {
        Self {
            root: None,
            root_margin: RootMargin::default(),
            thresholds: vec![0.0],
        }
    }
}

impl IntersectionObserverInit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(mut self, root: NodeId) -> Self {
        self.root = Some(root);
        self
    }

    pub fn root_margin(mut self, margin: RootMargin) -> Self {
        self.root_margin = margin;
        self
    }

    pub fn thresholds(mut self, thresholds: impl IntoIterator<Item = f64>) -> Self {
        self.thresholds = normalize_thresholds(thresholds);
        self
    }

    /// Sorted, de-duplicated thresholds within `0.0..=1.0`.
    pub fn threshold_list(&self) -> &[f64] {
        &self.thresholds
    }
}

/// Clamp thresholds to `0.0..=1.0`, drop NaN, sort and de-duplicate.
/// An empty list becomes `[0.0]`.
pub fn normalize_thresholds(thresholds: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut list: Vec<f64> = thresholds
        .into_iter()
        .filter(|t| !t.is_nan())
        .map(|t| {
            if !(0.0..=1.0).contains(&t) {
                log::warn!("Intersection threshold {t} outside 0..=1, clamping");
            }
            t.clamp(0.0, 1.0)
        })
        .collect();
    list.sort_by(|a, b| a.total_cmp(b));
    list.dedup();
    if list.is_empty() {
        list.push(0.0);
    }
    list
}

/// One observed change of a target's intersection with the root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub bounding_client_rect: Rect,
    pub intersection_rect: Rect,
    pub root_bounds: Rect,
    pub intersection_ratio: f64,
    pub is_intersecting: bool,
}

impl fmt::Display for IntersectionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ratio={:.3} intersecting={}",
            self.target, self.intersection_ratio, self.is_intersecting
        )
    }
}
