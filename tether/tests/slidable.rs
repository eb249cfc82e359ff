use std::cell::RefCell;
use std::rc::Rc;

use memdom::{Document, Element, Event, EventTarget, NodeId, Rect, Touch};
use tether::Action;
use tether::slidable::{SLIDE, SLIDE_END, SLIDE_START, Slidable, Slide, SlideEnd, SlideStart};

#[derive(Debug, Clone, PartialEq)]
enum Notice {
    Start(SlideStart),
    Move(Slide),
    End(SlideEnd),
}

type Notices = Rc<RefCell<Vec<Notice>>>;

/// A 40x40 handle at (100, 60) inside a panel, with slide notices recorded.
fn handle() -> (Document, NodeId, NodeId, Notices) {
    let mut doc = Document::new();
    let root = doc.root();
    let panel = doc
        .append(
            root,
            Element::div()
                .rect(Rect::new(0.0, 0.0, 400.0, 400.0))
                .child(Element::div().id("handle").rect(Rect::new(100.0, 60.0, 40.0, 40.0))),
        )
        .unwrap();
    let node = doc.get_element_by_id("handle").unwrap();

    let notices: Notices = Rc::new(RefCell::new(Vec::new()));
    let n = Rc::clone(&notices);
    doc.on(node, SLIDE_START, move |_doc: &mut Document, event: &mut Event| {
        if let Some(detail) = event.detail::<SlideStart>() {
            n.borrow_mut().push(Notice::Start(*detail));
        }
    });
    let n = Rc::clone(&notices);
    doc.on(node, SLIDE, move |_doc: &mut Document, event: &mut Event| {
        if let Some(detail) = event.detail::<Slide>() {
            n.borrow_mut().push(Notice::Move(*detail));
        }
    });
    let n = Rc::clone(&notices);
    doc.on(node, SLIDE_END, move |_doc: &mut Document, event: &mut Event| {
        if let Some(detail) = event.detail::<SlideEnd>() {
            n.borrow_mut().push(Notice::End(*detail));
        }
    });

    (doc, panel, node, notices)
}

fn window_mouse(doc: &mut Document, kind: &str, x: f64, y: f64) {
    doc.dispatch_event(EventTarget::Window, &mut Event::mouse(kind, x, y));
}

fn touch(doc: &mut Document, target: impl Into<EventTarget>, kind: &str, x: f64, y: f64) {
    doc.dispatch_event(target, &mut Event::touch(kind, vec![Touch::new(0, x, y)]));
}

// ============================================================================
// Mouse Gestures
// ============================================================================

#[test]
fn test_mouse_slide_sequence() {
    let (mut doc, _panel, node, notices) = handle();
    Slidable::attach(&mut doc, node);

    doc.dispatch_event(node, &mut Event::mouse("mousedown", 110.0, 70.0));
    window_mouse(&mut doc, "mousemove", 115.0, 72.0);
    window_mouse(&mut doc, "mousemove", 112.0, 80.0);
    window_mouse(&mut doc, "mouseup", 112.0, 80.0);

    assert_eq!(
        *notices.borrow(),
        vec![
            Notice::Start(SlideStart { x: 110.0, y: 70.0 }),
            Notice::Move(Slide {
                x: 115.0,
                y: 72.0,
                dx: 5.0,
                dy: 2.0
            }),
            Notice::Move(Slide {
                x: 112.0,
                y: 80.0,
                dx: -3.0,
                dy: 8.0
            }),
            Notice::End(SlideEnd {
                x: 112.0,
                y: 80.0,
                left: 100.0,
                top: 60.0
            }),
        ]
    );
}

#[test]
fn test_press_release_without_moves() {
    let (mut doc, _panel, node, notices) = handle();
    Slidable::attach(&mut doc, node);

    doc.dispatch_event(node, &mut Event::mouse("mousedown", 110.0, 70.0));
    window_mouse(&mut doc, "mouseup", 110.0, 70.0);

    assert_eq!(
        *notices.borrow(),
        vec![
            Notice::Start(SlideStart { x: 110.0, y: 70.0 }),
            Notice::End(SlideEnd {
                x: 110.0,
                y: 70.0,
                left: 100.0,
                top: 60.0
            }),
        ]
    );
}

#[test]
fn test_moves_bubbling_from_other_nodes_are_followed() {
    let (mut doc, panel, node, notices) = handle();
    Slidable::attach(&mut doc, node);

    doc.dispatch_event(node, &mut Event::mouse("mousedown", 110.0, 70.0));
    doc.dispatch_event(panel, &mut Event::mouse("mousemove", 300.0, 70.0));

    assert_eq!(notices.borrow().len(), 2);
    assert!(matches!(
        notices.borrow()[1],
        Notice::Move(Slide { dx, .. }) if dx == 190.0
    ));
}

#[test]
fn test_press_does_not_reach_ancestors() {
    let (mut doc, panel, node, _notices) = handle();
    let reached = Rc::new(RefCell::new(false));
    let r = Rc::clone(&reached);
    doc.on(panel, "mousedown", move |_doc: &mut Document, _event: &mut Event| {
        *r.borrow_mut() = true;
    });
    Slidable::attach(&mut doc, node);

    doc.dispatch_event(node, &mut Event::mouse("mousedown", 110.0, 70.0));
    assert!(!*reached.borrow());
}

#[test]
fn test_window_listeners_only_during_gesture() {
    let (mut doc, _panel, node, notices) = handle();
    let slidable = Slidable::attach(&mut doc, node);
    assert_eq!(doc.listener_count(EventTarget::Window), 0);

    window_mouse(&mut doc, "mousemove", 10.0, 10.0);
    assert!(notices.borrow().is_empty());

    doc.dispatch_event(node, &mut Event::mouse("mousedown", 110.0, 70.0));
    assert!(slidable.is_sliding());
    assert_eq!(doc.listener_count_for(EventTarget::Window, "mousemove"), 1);
    assert_eq!(doc.listener_count_for(EventTarget::Window, "mouseup"), 1);

    window_mouse(&mut doc, "mouseup", 110.0, 70.0);
    assert!(!slidable.is_sliding());
    assert_eq!(doc.listener_count(EventTarget::Window), 0);
}

#[test]
fn test_restart_replaces_window_listeners() {
    let (mut doc, _panel, node, notices) = handle();
    Slidable::attach(&mut doc, node);

    doc.dispatch_event(node, &mut Event::mouse("mousedown", 110.0, 70.0));
    doc.dispatch_event(node, &mut Event::mouse("mousedown", 120.0, 75.0));
    assert_eq!(doc.listener_count(EventTarget::Window), 2);

    window_mouse(&mut doc, "mousemove", 125.0, 75.0);
    let notices = notices.borrow();
    assert_eq!(notices.len(), 3);
    assert_eq!(
        notices[2],
        Notice::Move(Slide {
            x: 125.0,
            y: 75.0,
            dx: 5.0,
            dy: 0.0
        })
    );
}

// ============================================================================
// Touch Gestures
// ============================================================================

#[test]
fn test_touch_slide_sequence() {
    let (mut doc, _panel, node, notices) = handle();
    Slidable::attach(&mut doc, node);

    touch(&mut doc, node, "touchstart", 105.0, 65.0);
    assert_eq!(doc.listener_count_for(EventTarget::Window, "touchmove"), 1);
    assert_eq!(doc.listener_count_for(EventTarget::Window, "mousemove"), 0);

    // Mouse moves do not drive a touch gesture.
    window_mouse(&mut doc, "mousemove", 0.0, 0.0);
    touch(&mut doc, EventTarget::Window, "touchmove", 100.0, 90.0);
    touch(&mut doc, EventTarget::Window, "touchend", 100.0, 90.0);

    assert_eq!(
        *notices.borrow(),
        vec![
            Notice::Start(SlideStart { x: 105.0, y: 65.0 }),
            Notice::Move(Slide {
                x: 100.0,
                y: 90.0,
                dx: -5.0,
                dy: 25.0
            }),
            Notice::End(SlideEnd {
                x: 100.0,
                y: 90.0,
                left: 100.0,
                top: 60.0
            }),
        ]
    );
}

#[test]
fn test_touch_without_points_reports_origin() {
    let (mut doc, _panel, node, notices) = handle();
    Slidable::attach(&mut doc, node);

    doc.dispatch_event(node, &mut Event::touch("touchstart", Vec::new()));
    assert_eq!(
        notices.borrow()[0],
        Notice::Start(SlideStart { x: 0.0, y: 0.0 })
    );
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn test_destroy_removes_every_listener() {
    let (mut doc, _panel, node, _notices) = handle();
    let before = doc.listener_stats().active();
    let slidable = Slidable::attach(&mut doc, node);
    assert_eq!(doc.listener_count_for(node, "mousedown"), 1);
    assert_eq!(doc.listener_count_for(node, "touchstart"), 1);

    slidable.destroy(&mut doc);
    assert_eq!(doc.listener_stats().active(), before);
}

#[test]
fn test_destroy_mid_gesture_releases_window() {
    let (mut doc, _panel, node, notices) = handle();
    let before = doc.listener_stats().active();
    let slidable = Slidable::attach(&mut doc, node);

    touch(&mut doc, node, "touchstart", 105.0, 65.0);
    slidable.destroy(&mut doc);

    assert_eq!(doc.listener_stats().active(), before);
    touch(&mut doc, EventTarget::Window, "touchmove", 100.0, 90.0);
    assert_eq!(notices.borrow().len(), 1);
}
