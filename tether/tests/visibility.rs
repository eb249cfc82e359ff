use std::cell::RefCell;
use std::rc::Rc;

use memdom::{
    Document, Element, IntersectionCallback, IntersectionEntry, IntersectionObserverInit, NodeId,
    ObserverId, Rect, RootMargin,
};
use tether::Action;
use tether::visibility::{
    ObserverFactory, VisibilityRegistry, VisibilityWatcher, WatchOptions, threshold_steps,
};

/// Factory recording every call, for checking observer sharing and call order.
#[derive(Default)]
struct RecordingFactory {
    next: u64,
    calls: Vec<String>,
    inits: Vec<IntersectionObserverInit>,
}

impl ObserverFactory for RecordingFactory {
    fn create_observer(
        &mut self,
        init: IntersectionObserverInit,
        _callback: IntersectionCallback,
    ) -> ObserverId {
        let id = ObserverId::from_raw(self.next);
        self.next += 1;
        self.calls.push(format!("create {}", id.raw()));
        self.inits.push(init);
        id
    }

    fn observe(&mut self, observer: ObserverId, target: NodeId) {
        self.calls.push(format!("observe {} {}", observer.raw(), target.raw()));
    }

    fn unobserve(&mut self, observer: ObserverId, target: NodeId) {
        self.calls.push(format!("unobserve {} {}", observer.raw(), target.raw()));
    }

    fn disconnect(&mut self, observer: ObserverId) {
        self.calls.push(format!("disconnect {}", observer.raw()));
    }
}

fn silent() -> WatchOptions {
    WatchOptions::new(|_doc: &mut Document, _entry: &IntersectionEntry| {})
}

/// Three targets in a document, ids 1..=3.
fn targets(doc: &mut Document) -> [NodeId; 3] {
    let root = doc.root();
    [0.0, 700.0, 2000.0].map(|y| {
        doc.append(root, Element::div().rect(Rect::new(0.0, y, 100.0, 100.0)))
            .unwrap()
    })
}

// ============================================================================
// Observer Sharing
// ============================================================================

#[test]
fn test_same_options_share_one_observer() {
    let mut doc = Document::new();
    let [a, b, _] = targets(&mut doc);
    let mut factory = RecordingFactory::default();
    let registry = VisibilityRegistry::new();
    let options = silent().shared();

    let first = VisibilityWatcher::attach(&mut factory, &registry, a, Rc::clone(&options));
    let second = VisibilityWatcher::attach(&mut factory, &registry, b, Rc::clone(&options));

    assert_eq!(registry.observer_count(), 1);
    assert_eq!(registry.target_count(&options), 2);
    assert_eq!(
        factory.calls,
        vec!["create 0", "observe 0 1", "observe 0 2"]
    );

    first.destroy(&mut factory);
    assert_eq!(registry.observer_count(), 1);
    second.destroy(&mut factory);
    assert_eq!(registry.observer_count(), 0);
    assert_eq!(registry.observer_for(&options), None);
    assert_eq!(
        &factory.calls[3..],
        &["unobserve 0 1", "unobserve 0 2", "disconnect 0"]
    );
}

#[test]
fn test_equal_but_distinct_options_get_separate_observers() {
    let mut doc = Document::new();
    let [a, b, _] = targets(&mut doc);
    let mut factory = RecordingFactory::default();
    let registry = VisibilityRegistry::new();

    VisibilityWatcher::attach(&mut factory, &registry, a, silent().shared());
    VisibilityWatcher::attach(&mut factory, &registry, b, silent().shared());

    assert_eq!(registry.observer_count(), 2);
    assert_eq!(
        factory.calls,
        vec!["create 0", "observe 0 1", "create 1", "observe 1 2"]
    );
}

#[test]
fn test_observer_created_from_options() {
    let mut doc = Document::new();
    let [a, _, _] = targets(&mut doc);
    let mut factory = RecordingFactory::default();
    let registry = VisibilityRegistry::new();
    let margin: RootMargin = "10px 20%".parse().unwrap();
    let root = doc.root();

    VisibilityWatcher::attach(
        &mut factory,
        &registry,
        a,
        silent()
            .root(root)
            .root_margin(margin)
            .thresholds([1.0, 0.5])
            .shared(),
    );

    let init = &factory.inits[0];
    assert_eq!(init.root, Some(root));
    assert_eq!(init.root_margin, margin);
    assert_eq!(init.threshold_list(), &[0.5, 1.0]);
}

#[test]
fn test_update_unobserves_before_observing() {
    let mut doc = Document::new();
    let [a, _, _] = targets(&mut doc);
    let mut factory = RecordingFactory::default();
    let registry = VisibilityRegistry::new();
    let old = silent().shared();
    let new = silent().thresholds(threshold_steps(4)).shared();

    let mut watcher = VisibilityWatcher::attach(&mut factory, &registry, a, Rc::clone(&old));
    watcher.update(&mut factory, Rc::clone(&new));

    assert_eq!(
        factory.calls,
        vec![
            "create 0",
            "observe 0 1",
            "unobserve 0 1",
            "disconnect 0",
            "create 1",
            "observe 1 1",
        ]
    );
    assert_eq!(registry.observer_for(&old), None);
    assert_eq!(registry.observer_for(&new), Some(ObserverId::from_raw(1)));
    assert_eq!(watcher.target(), a);
}

#[test]
fn test_update_with_same_options_keeps_observer() {
    let mut doc = Document::new();
    let [a, _, _] = targets(&mut doc);
    let mut factory = RecordingFactory::default();
    let registry = VisibilityRegistry::new();
    let options = silent().shared();

    let mut watcher = VisibilityWatcher::attach(&mut factory, &registry, a, Rc::clone(&options));
    watcher.update(&mut factory, Rc::clone(&options));

    assert_eq!(factory.calls, vec!["create 0", "observe 0 1"]);
    assert_eq!(registry.observer_for(&options), Some(ObserverId::from_raw(0)));

    watcher.destroy(&mut factory);
    assert_eq!(registry.observer_count(), 0);
}

#[test]
fn test_shared_target_outlives_one_watcher() {
    let mut doc = Document::new();
    let [_, b, _] = targets(&mut doc);
    let mut factory = RecordingFactory::default();
    let registry = VisibilityRegistry::new();
    let options = silent().shared();

    let first = VisibilityWatcher::attach(&mut factory, &registry, b, Rc::clone(&options));
    let second = VisibilityWatcher::attach(&mut factory, &registry, b, Rc::clone(&options));
    assert_eq!(factory.calls, vec!["create 0", "observe 0 2"]);
    assert_eq!(registry.target_count(&options), 1);

    first.destroy(&mut factory);
    assert_eq!(factory.calls.len(), 2);
    assert_eq!(registry.target_count(&options), 1);
    assert_eq!(registry.observer_for(&options), Some(ObserverId::from_raw(0)));

    second.destroy(&mut factory);
    assert_eq!(&factory.calls[2..], &["unobserve 0 2", "disconnect 0"]);
    assert_eq!(registry.observer_count(), 0);
}

// ============================================================================
// Delivery
// ============================================================================

#[test]
fn test_entries_routed_to_watchers() {
    let mut doc = Document::new();
    doc.set_viewport_size(800.0, 600.0);
    let [a, b, c] = targets(&mut doc);
    let registry = VisibilityRegistry::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let s = Rc::clone(&seen);
    let options = WatchOptions::new(move |_doc: &mut Document, entry: &IntersectionEntry| {
        s.borrow_mut().push((entry.target, entry.is_intersecting));
    })
    .shared();
    let watchers: Vec<VisibilityWatcher> = [a, b, c]
        .into_iter()
        .map(|target| VisibilityWatcher::attach(&mut doc, &registry, target, Rc::clone(&options)))
        .collect();
    assert_eq!(doc.observer_count(), 1);

    doc.run_intersection_checks();
    assert_eq!(*seen.borrow(), vec![(a, true), (b, false), (c, false)]);

    seen.borrow_mut().clear();
    doc.scroll_window_to(0.0, 300.0);
    doc.run_intersection_checks();
    assert_eq!(*seen.borrow(), vec![(a, false), (b, true)]);

    for watcher in watchers {
        watcher.destroy(&mut doc);
    }
    assert_eq!(doc.observer_count(), 0);
    assert_eq!(registry.observer_count(), 0);
}

#[test]
fn test_destroyed_watcher_stops_receiving() {
    let mut doc = Document::new();
    doc.set_viewport_size(800.0, 600.0);
    let [a, b, _] = targets(&mut doc);
    let registry = VisibilityRegistry::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let s = Rc::clone(&seen);
    let options = WatchOptions::new(move |_doc: &mut Document, entry: &IntersectionEntry| {
        s.borrow_mut().push(entry.target);
    })
    .shared();
    let first = VisibilityWatcher::attach(&mut doc, &registry, a, Rc::clone(&options));
    let _second = VisibilityWatcher::attach(&mut doc, &registry, b, Rc::clone(&options));

    first.destroy(&mut doc);
    doc.run_intersection_checks();
    assert_eq!(*seen.borrow(), vec![b]);
}

#[test]
fn test_shared_target_keeps_receiving_after_one_watcher_goes() {
    let mut doc = Document::new();
    doc.set_viewport_size(800.0, 600.0);
    let [a, _, _] = targets(&mut doc);
    let registry = VisibilityRegistry::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let s = Rc::clone(&seen);
    let options = WatchOptions::new(move |_doc: &mut Document, entry: &IntersectionEntry| {
        s.borrow_mut().push(entry.is_intersecting);
    })
    .shared();
    let first = VisibilityWatcher::attach(&mut doc, &registry, a, Rc::clone(&options));
    let _second = VisibilityWatcher::attach(&mut doc, &registry, a, Rc::clone(&options));

    first.destroy(&mut doc);
    doc.run_intersection_checks();
    assert_eq!(*seen.borrow(), vec![true]);
}

#[test]
fn test_callback_may_mutate_document() {
    let mut doc = Document::new();
    let [a, _, _] = targets(&mut doc);
    let registry = VisibilityRegistry::new();
    let options = WatchOptions::new(|doc: &mut Document, entry: &IntersectionEntry| {
        let state = if entry.is_intersecting { "shown" } else { "hidden" };
        doc.set_style_property(entry.target, "--visibility", state);
    })
    .shared();

    VisibilityWatcher::attach(&mut doc, &registry, a, options);
    doc.run_intersection_checks();
    assert_eq!(doc.style_property(a, "--visibility"), Some("shown"));
}

// ============================================================================
// Threshold Steps
// ============================================================================

#[test]
fn test_threshold_steps() {
    assert_eq!(threshold_steps(0), vec![0.0]);
    assert_eq!(threshold_steps(1), vec![0.0, 1.0]);
    assert_eq!(threshold_steps(4), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    assert_eq!(threshold_steps(100).len(), 101);
}
