use std::cell::RefCell;
use std::rc::Rc;

use memdom::{
    Document, Element, IntersectionCallback, IntersectionEntry, IntersectionObserverInit, Length,
    NodeId, Rect, RootMargin, RootMarginError,
};

type Deliveries = Rc<RefCell<Vec<Vec<IntersectionEntry>>>>;

fn recording() -> (Deliveries, IntersectionCallback) {
    let deliveries: Deliveries = Rc::new(RefCell::new(Vec::new()));
    let d = Rc::clone(&deliveries);
    let callback: IntersectionCallback =
        Rc::new(move |_doc: &mut Document, entries: &[IntersectionEntry]| {
            d.borrow_mut().push(entries.to_vec());
        });
    (deliveries, callback)
}

/// 800x600 viewport with a 100x100 box starting 1000px down the page.
fn page() -> (Document, NodeId) {
    let mut doc = Document::new();
    doc.set_viewport_size(800.0, 600.0);
    let root = doc.root();
    let target = doc
        .append(root, Element::div().bounds(0.0, 1000.0, 100.0, 100.0))
        .unwrap();
    (doc, target)
}

// ============================================================================
// Threshold Crossings
// ============================================================================

#[test]
fn test_first_check_always_reports() {
    let (mut doc, target) = page();
    let (deliveries, callback) = recording();
    let observer = doc.create_intersection_observer(IntersectionObserverInit::new(), callback);
    assert!(doc.observe(observer, target));

    assert_eq!(doc.run_intersection_checks(), 1);
    let entry = deliveries.borrow()[0][0];
    assert!(!entry.is_intersecting);
    assert_eq!(entry.intersection_ratio, 0.0);
    assert_eq!(entry.target, target);

    // Nothing changed.
    assert_eq!(doc.run_intersection_checks(), 0);
}

#[test]
fn test_reports_only_threshold_crossings() {
    let (mut doc, target) = page();
    let (deliveries, callback) = recording();
    let init = IntersectionObserverInit::new().thresholds([0.0, 0.5, 1.0]);
    let observer = doc.create_intersection_observer(init, callback);
    doc.observe(observer, target);
    doc.run_intersection_checks();

    // 25% visible: crosses 0.0.
    doc.scroll_window_to(0.0, 425.0);
    assert_eq!(doc.run_intersection_checks(), 1);
    // 40% visible: still between 0.0 and 0.5.
    doc.scroll_window_to(0.0, 440.0);
    assert_eq!(doc.run_intersection_checks(), 0);
    // Fully visible: crosses 0.5 and 1.0 at once, one entry.
    doc.scroll_window_to(0.0, 500.0);
    assert_eq!(doc.run_intersection_checks(), 1);

    let deliveries = deliveries.borrow();
    assert_eq!(deliveries.len(), 3);
    assert!((deliveries[1][0].intersection_ratio - 0.25).abs() < 1e-9);
    assert_eq!(deliveries[2][0].intersection_ratio, 1.0);
}

#[test]
fn test_leaving_the_viewport_reports_zero() {
    let (mut doc, target) = page();
    let (deliveries, callback) = recording();
    let observer = doc.create_intersection_observer(IntersectionObserverInit::new(), callback);
    doc.observe(observer, target);

    doc.scroll_window_to(0.0, 500.0);
    doc.run_intersection_checks();
    doc.scroll_window_to(0.0, 0.0);
    doc.run_intersection_checks();

    let deliveries = deliveries.borrow();
    assert_eq!(deliveries.len(), 2);
    assert!(deliveries[0][0].is_intersecting);
    assert!(!deliveries[1][0].is_intersecting);
    assert_eq!(deliveries[1][0].intersection_ratio, 0.0);
}

#[test]
fn test_edge_adjacent_counts_as_intersecting() {
    let (mut doc, target) = page();
    let (deliveries, callback) = recording();
    let observer = doc.create_intersection_observer(IntersectionObserverInit::new(), callback);
    doc.observe(observer, target);

    // Viewport bottom edge (600) meets the target top edge.
    doc.scroll_window_to(0.0, 400.0);
    doc.run_intersection_checks();

    let entry = deliveries.borrow()[0][0];
    assert!(entry.is_intersecting);
    assert_eq!(entry.intersection_ratio, 0.0);
}

#[test]
fn test_entries_batched_per_observer() {
    let (mut doc, first) = page();
    let root = doc.root();
    let second = doc
        .append(root, Element::div().bounds(200.0, 0.0, 50.0, 50.0))
        .unwrap();
    let (deliveries, callback) = recording();
    let observer = doc.create_intersection_observer(IntersectionObserverInit::new(), callback);
    doc.observe(observer, first);
    doc.observe(observer, second);

    assert_eq!(doc.run_intersection_checks(), 2);
    let deliveries = deliveries.borrow();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].len(), 2);
    assert!(!deliveries[0][0].is_intersecting);
    assert!(deliveries[0][1].is_intersecting);
}

#[test]
fn test_root_margin_extends_viewport() {
    let (mut doc, target) = page();
    let (deliveries, callback) = recording();
    let init = IntersectionObserverInit::new().root_margin("0px 0px 450px 0px".parse().unwrap());
    let observer = doc.create_intersection_observer(init, callback);
    doc.observe(observer, target);

    doc.run_intersection_checks();
    let entry = deliveries.borrow()[0][0];
    assert!(entry.is_intersecting);
    assert_eq!(entry.root_bounds, Rect::new(0.0, 0.0, 800.0, 1050.0));
    assert!((entry.intersection_ratio - 0.5).abs() < 1e-9);
}

#[test]
fn test_element_root() {
    let mut doc = Document::new();
    let root = doc.root();
    let panel = doc
        .append(root, Element::div().bounds(0.0, 0.0, 100.0, 100.0))
        .unwrap();
    let inside = doc
        .append(panel, Element::div().bounds(10.0, 10.0, 20.0, 20.0))
        .unwrap();
    let outside = doc
        .append(panel, Element::div().bounds(300.0, 10.0, 20.0, 20.0))
        .unwrap();

    let (deliveries, callback) = recording();
    let observer =
        doc.create_intersection_observer(IntersectionObserverInit::new().root(panel), callback);
    doc.observe(observer, inside);
    doc.observe(observer, outside);
    doc.run_intersection_checks();

    let deliveries = deliveries.borrow();
    assert!(deliveries[0][0].is_intersecting);
    assert!(!deliveries[0][1].is_intersecting);
}

#[test]
fn test_unobserve_and_disconnect() {
    let (mut doc, target) = page();
    let (deliveries, callback) = recording();
    let observer = doc.create_intersection_observer(IntersectionObserverInit::new(), callback);

    assert!(doc.observe(observer, target));
    assert!(!doc.observe(observer, target));
    assert_eq!(doc.observed_targets(observer), vec![target]);

    assert!(doc.unobserve(observer, target));
    assert_eq!(doc.run_intersection_checks(), 0);

    assert!(doc.disconnect(observer));
    assert!(!doc.disconnect(observer));
    assert_eq!(doc.observer_count(), 0);
    assert!(deliveries.borrow().is_empty());
}

#[test]
fn test_removed_target_is_skipped() {
    let (mut doc, target) = page();
    let (_deliveries, callback) = recording();
    let observer = doc.create_intersection_observer(IntersectionObserverInit::new(), callback);
    doc.observe(observer, target);
    doc.remove_node(target).unwrap();

    assert_eq!(doc.run_intersection_checks(), 0);
}

#[test]
fn test_thresholds_normalized() {
    let init = IntersectionObserverInit::new().thresholds([1.0, 0.5, 1.5, -0.2, 0.5]);
    assert_eq!(init.threshold_list(), &[0.0, 0.5, 1.0]);

    let empty = IntersectionObserverInit::new().thresholds(Vec::new());
    assert_eq!(empty.threshold_list(), &[0.0]);
}

// ============================================================================
// Root Margin Parsing
// ============================================================================

#[test]
fn test_root_margin_shorthand() {
    let one: RootMargin = "10px".parse().unwrap();
    assert_eq!(one, RootMargin::all(Length::Px(10.0)));

    let two: RootMargin = "10px 5%".parse().unwrap();
    assert_eq!(two.top, Length::Px(10.0));
    assert_eq!(two.right, Length::Percent(5.0));
    assert_eq!(two.bottom, Length::Px(10.0));
    assert_eq!(two.left, Length::Percent(5.0));

    let three: RootMargin = "1px 2px 3px".parse().unwrap();
    assert_eq!(
        three,
        RootMargin::new(Length::Px(1.0), Length::Px(2.0), Length::Px(3.0), Length::Px(2.0))
    );

    let empty: RootMargin = "".parse().unwrap();
    assert_eq!(empty, RootMargin::default());
}

#[test]
fn test_root_margin_rejects_bad_input() {
    assert_eq!(
        "10em".parse::<RootMargin>(),
        Err(RootMarginError::InvalidToken("10em".to_string()))
    );
    assert_eq!(
        "5".parse::<RootMargin>(),
        Err(RootMarginError::InvalidToken("5".to_string()))
    );
    assert_eq!(
        "1px 2px 3px 4px 5px".parse::<RootMargin>(),
        Err(RootMarginError::WrongArity(5))
    );
    assert_eq!("0".parse::<Length>(), Ok(Length::Px(0.0)));
}

#[test]
fn test_root_margin_percent_resolution() {
    let margin: RootMargin = "10% 0px -50px 25%".parse().unwrap();
    let bounds = margin.apply(Rect::new(0.0, 0.0, 200.0, 100.0));
    assert_eq!(bounds, Rect::new(-50.0, -10.0, 250.0, 60.0));
    assert_eq!(margin.to_string(), "10% 0px -50px 25%");
}
