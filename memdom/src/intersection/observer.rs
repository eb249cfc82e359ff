use std::rc::Rc;

use super::{IntersectionCallback, IntersectionEntry, IntersectionObserverInit, ObserverId};
use crate::element::NodeId;
use crate::layout::Rect;

struct Observation {
    target: NodeId,
    /// -1 until the first check, so the first check always reports.
    previous_threshold_index: i64,
    previous_is_intersecting: bool,
}

struct Observer {
    id: ObserverId,
    init: IntersectionObserverInit,
    callback: IntersectionCallback,
    observations: Vec<Observation>,
}

/// Observers of one document.
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    next_id: u64,
    observers: Vec<Observer>,
}

impl ObserverRegistry {
    pub fn create(
        &mut self,
        init: IntersectionObserverInit,
        callback: IntersectionCallback,
    ) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push(Observer {
            id,
            init,
            callback,
            observations: Vec::new(),
        });
        id
    }

    fn get_mut(&mut self, id: ObserverId) -> Option<&mut Observer> {
        self.observers.iter_mut().find(|o| o.id == id)
    }

    /// Start observing a target. Returns false if the observer is unknown or
    /// already observes the target.
    pub fn observe(&mut self, id: ObserverId, target: NodeId) -> bool {
        let Some(observer) = self.get_mut(id) else {
            return false;
        };
        if observer.observations.iter().any(|o| o.target == target) {
            return false;
        }
        observer.observations.push(Observation {
            target,
            previous_threshold_index: -1,
            previous_is_intersecting: false,
        });
        true
    }

    pub fn unobserve(&mut self, id: ObserverId, target: NodeId) -> bool {
        let Some(observer) = self.get_mut(id) else {
            return false;
        };
        let before = observer.observations.len();
        observer.observations.retain(|o| o.target != target);
        observer.observations.len() != before
    }

    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| o.id != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn observed_targets(&self, id: ObserverId) -> Vec<NodeId> {
        self.observers
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.observations.iter().map(|obs| obs.target).collect())
            .unwrap_or_default()
    }

    /// Measure every observation and collect the deliveries due.
    ///
    /// `client_rect` resolves a node to its box in viewport coordinates;
    /// unresolvable targets (and observers with an unresolvable root) are
    /// skipped until they resolve again.
    pub fn check<F>(
        &mut self,
        client_rect: F,
        viewport: Rect,
    ) -> Vec<(IntersectionCallback, Vec<IntersectionEntry>)>
    where
        F: Fn(NodeId) -> Option<Rect>,
    {
        let mut deliveries = Vec::new();

        for observer in &mut self.observers {
            let root_rect = match observer.init.root {
                None => viewport,
                Some(root) => match client_rect(root) {
                    Some(rect) => rect,
                    None => continue,
                },
            };
            let root_bounds = observer.init.root_margin.apply(root_rect);
            let thresholds = observer.init.threshold_list();

            let mut entries = Vec::new();
            for observation in &mut observer.observations {
                let Some(target_rect) = client_rect(observation.target) else {
                    continue;
                };

                let (intersection_rect, is_intersecting) =
                    match target_rect.intersection(&root_bounds) {
                        Some(rect) => (rect, true),
                        None => (Rect::default(), false),
                    };

                let intersection_ratio = if !is_intersecting {
                    0.0
                } else if target_rect.area() > 0.0 {
                    (intersection_rect.area() / target_rect.area()).min(1.0)
                } else {
                    1.0
                };

                let threshold_index = if is_intersecting {
                    thresholds.iter().filter(|t| **t <= intersection_ratio).count() as i64
                } else {
                    0
                };

                if threshold_index == observation.previous_threshold_index
                    && is_intersecting == observation.previous_is_intersecting
                {
                    continue;
                }
                observation.previous_threshold_index = threshold_index;
                observation.previous_is_intersecting = is_intersecting;

                entries.push(IntersectionEntry {
                    target: observation.target,
                    bounding_client_rect: target_rect,
                    intersection_rect,
                    root_bounds,
                    intersection_ratio,
                    is_intersecting,
                });
            }

            if !entries.is_empty() {
                deliveries.push((Rc::clone(&observer.callback), entries));
            }
        }

        deliveries
    }
}
