use memdom::{Document, IntersectionCallback, IntersectionObserverInit, NodeId, ObserverId};

/// Creates and drives intersection observers.
///
/// [`Document`] is the real implementation; tests substitute recording
/// factories to check the order of observer calls.
pub trait ObserverFactory {
    fn create_observer(
        &mut self,
        init: IntersectionObserverInit,
        callback: IntersectionCallback,
    ) -> ObserverId;

    fn observe(&mut self, observer: ObserverId, target: NodeId);

    fn unobserve(&mut self, observer: ObserverId, target: NodeId);

    fn disconnect(&mut self, observer: ObserverId);
}

impl ObserverFactory for Document {
    fn create_observer(
        &mut self,
        init: IntersectionObserverInit,
        callback: IntersectionCallback,
    ) -> ObserverId {
        self.create_intersection_observer(init, callback)
    }

    fn observe(&mut self, observer: ObserverId, target: NodeId) {
        Document::observe(self, observer, target);
    }

    fn unobserve(&mut self, observer: ObserverId, target: NodeId) {
        Document::unobserve(self, observer, target);
    }

    fn disconnect(&mut self, observer: ObserverId) {
        Document::disconnect(self, observer);
    }
}
