use std::cell::Cell;
use std::fs::File;
use std::rc::Rc;

use memdom::IntersectionEntry;
use simplelog::{Config, LevelFilter, WriteLogger};
use tether::prelude::*;

/// Scripted walk through every behavior against an in-memory page.
/// Output goes to stdout, library logging to `gallery.log`.
fn main() -> std::io::Result<()> {
    let log_file = File::create("gallery.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let mut doc = Document::new();
    doc.set_viewport_size(800.0, 600.0);
    let root = doc.root();

    let strip = doc
        .append(
            root,
            Element::div()
                .id("strip")
                .rect(Rect::new(0.0, 0.0, 400.0, 200.0))
                .content_size(1600.0, 200.0),
        )
        .expect("root exists");
    let handle = doc
        .append(
            root,
            Element::div()
                .id("handle")
                .rect(Rect::new(500.0, 50.0, 40.0, 40.0)),
        )
        .expect("root exists");
    let footer = doc
        .append(
            root,
            Element::div()
                .id("footer")
                .rect(Rect::new(0.0, 1200.0, 800.0, 100.0)),
        )
        .expect("root exists");

    css_vars(&mut doc, strip);
    drag_scroll(&mut doc, strip);
    slide(&mut doc, handle);
    click_outside(&mut doc, handle);
    visibility(&mut doc, footer);

    println!("listeners left: {}", doc.listener_stats().active());
    Ok(())
}

fn css_vars(doc: &mut Document, strip: NodeId) {
    let vars = CssVariables::new()
        .set("columns", 4)
        .set("accent", "tomato")
        .unset("gap");
    let mut attachment = CssVars::attach(doc, strip, vars);
    attachment.update(doc, CssVariables::new().set("columns", 6));
    println!(
        "css vars: {}",
        doc.style(strip).map(|s| s.css_text()).unwrap_or_default()
    );
    attachment.destroy(doc);
}

fn drag_scroll(doc: &mut Document, strip: NodeId) {
    let options = DragScrollOptions::new()
        .axis(Axis::parse_or_default("x"))
        .event(EventFamily::Mouse)
        .on_dragging(|update: &DragUpdate| {
            println!(
                "drag scroll: {:?} moved {} -> offset {}",
                update.axis, update.delta, update.offset
            );
        })
        .on_drag_end(|| println!("drag scroll: released"));
    let drag = DragScrollable::attach(doc, strip, options);

    doc.dispatch_event(strip, &mut Event::mouse("mousedown", 300.0, 100.0));
    doc.dispatch_event(strip, &mut Event::mouse("mousemove", 200.0, 100.0));
    doc.dispatch_event(strip, &mut Event::mouse("mousemove", 50.0, 100.0));
    doc.dispatch_event(strip, &mut Event::mouse("mouseup", 50.0, 100.0));
    drag.destroy(doc);
}

fn slide(doc: &mut Document, handle: NodeId) {
    doc.on(handle, SLIDE, |_doc: &mut Document, event: &mut Event| {
        if let Some(slide) = event.detail::<Slide>() {
            println!("slide: by ({}, {})", slide.dx, slide.dy);
        }
    });
    doc.on(handle, SLIDE_END, |_doc: &mut Document, event: &mut Event| {
        if let Some(end) = event.detail::<SlideEnd>() {
            println!("slide: ended at ({}, {})", end.x, end.y);
        }
    });

    let slidable = Slidable::attach(doc, handle);
    doc.dispatch_event(handle, &mut Event::mouse("mousedown", 510.0, 60.0));
    doc.dispatch_event(EventTarget::Window, &mut Event::mouse("mousemove", 530.0, 65.0));
    doc.dispatch_event(EventTarget::Window, &mut Event::mouse("mouseup", 540.0, 70.0));
    slidable.destroy(doc);
}

fn click_outside(doc: &mut Document, handle: NodeId) {
    doc.on(handle, CLICK_OUTSIDE, |_doc: &mut Document, event: &mut Event| {
        if let Some(detail) = event.detail::<ClickOutsideDetail>() {
            println!("click outside: {:?}", detail.clicked);
        }
    });

    let watcher = ClickOutside::attach(doc, handle);
    let root = doc.root();
    doc.dispatch_event(root, &mut Event::click(10.0, 10.0));
    doc.dispatch_event(handle, &mut Event::click(510.0, 60.0));
    watcher.destroy(doc);
}

fn visibility(doc: &mut Document, footer: NodeId) {
    let seen = Rc::new(Cell::new(0));
    let counter = Rc::clone(&seen);
    let options = WatchOptions::new(move |_doc: &mut Document, entry: &IntersectionEntry| {
        counter.set(counter.get() + 1);
        println!("visibility: {entry}");
    })
    .thresholds(threshold_steps(2))
    .shared();

    let registry = VisibilityRegistry::new();
    let watcher = VisibilityWatcher::attach(doc, &registry, footer, options);

    doc.run_intersection_checks();
    doc.scroll_window_to(0.0, 650.0);
    doc.run_intersection_checks();
    doc.scroll_window_to(0.0, 700.0);
    doc.run_intersection_checks();

    println!("visibility: {} entries", seen.get());
    watcher.destroy(doc);
}
