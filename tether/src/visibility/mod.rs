//! Viewport visibility watching.
//!
//! A [`VisibilityWatcher`] reports every intersection change of one target to
//! a callback. Watchers go through a [`VisibilityRegistry`], which keeps one
//! underlying observer per [`WatchOptions`] allocation and routes each entry
//! to the callback registered for its target.

mod factory;
mod registry;

use std::fmt;
use std::rc::Rc;

pub use factory::ObserverFactory;
pub use registry::{Observation, VisibilityRegistry};

use memdom::{Document, IntersectionEntry, IntersectionObserverInit, NodeId, RootMargin};

use crate::action::Action;

/// Receives each intersection entry of a watched target.
pub type VisibilityCallback = Rc<dyn Fn(&mut Document, &IntersectionEntry)>;

/// Observer configuration plus the callback for targets watched with it.
///
/// Share it as `Rc<WatchOptions>` (see [`WatchOptions::shared`]); watchers
/// holding the same allocation share one observer.
#[derive(Clone)]
pub struct WatchOptions {
    /// Element whose box is the root. `None` watches against the viewport.
    pub root: Option<NodeId>,
    pub root_margin: RootMargin,
    pub thresholds: Vec<f64>,
    pub(crate) callback: VisibilityCallback,
}

impl WatchOptions {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&mut Document, &IntersectionEntry) + 'static,
    {
        Self {
            root: None,
            root_margin: RootMargin::default(),
            thresholds: vec![0.0],
            callback: Rc::new(callback),
        }
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
        self.thresholds = thresholds.into_iter().collect();
        self
    }

    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    pub(crate) fn init(&self) -> IntersectionObserverInit {
        let init = IntersectionObserverInit::new()
            .root_margin(self.root_margin)
            .thresholds(self.thresholds.iter().copied());
        match self.root {
            Some(root) => init.root(root),
            None => init,
        }
    }
}

impl fmt::Debug for WatchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchOptions")
            .field("root", &self.root)
            .field("root_margin", &self.root_margin)
            .field("thresholds", &self.thresholds)
            .finish_non_exhaustive()
    }
}

/// `n + 1` evenly spaced thresholds from `0.0` to `1.0`.
///
/// `threshold_steps(4)` is `[0.0, 0.25, 0.5, 0.75, 1.0]`; `0` gives `[0.0]`.
pub fn threshold_steps(n: usize) -> Vec<f64> {
    if n == 0 {
        return vec![0.0];
    }
    (0..=n).map(|i| i as f64 / n as f64).collect()
}

/// Visibility-watching attachment for one target.
#[derive(Debug)]
pub struct VisibilityWatcher {
    registry: VisibilityRegistry,
    target: NodeId,
    options: Rc<WatchOptions>,
    observation: Option<Observation>,
}

impl VisibilityWatcher {
    pub fn attach<F: ObserverFactory>(
        platform: &mut F,
        registry: &VisibilityRegistry,
        target: NodeId,
        options: Rc<WatchOptions>,
    ) -> Self {
        let observation = registry.observe(platform, target, &options);
        Self {
            registry: registry.clone(),
            target,
            options,
            observation: Some(observation),
        }
    }

    pub fn target(&self) -> NodeId {
        self.target
    }
}

impl<F: ObserverFactory> Action<F> for VisibilityWatcher {
    type Config = Rc<WatchOptions>;

    /// Move the target to the observer for `options`. The old observation is
    /// dropped first, so an observer left without targets is disconnected
    /// before a new one is created. Passing the options already in use keeps
    /// the current observer.
    fn update(&mut self, platform: &mut F, options: Rc<WatchOptions>) {
        if Rc::ptr_eq(&self.options, &options) {
            return;
        }
        if let Some(observation) = self.observation.take() {
            self.registry.unobserve(platform, observation);
        }
        self.observation = Some(self.registry.observe(platform, self.target, &options));
        self.options = options;
    }

    fn destroy(mut self, platform: &mut F) {
        if let Some(observation) = self.observation.take() {
            self.registry.unobserve(platform, observation);
        }
    }
}
