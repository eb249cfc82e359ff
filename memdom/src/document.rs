use std::collections::HashMap;
use std::rc::Rc;

use crate::element::{Element, Node, NodeId};
use crate::environment::Environment;
use crate::error::DomError;
use crate::event::{Event, EventPhase};
use crate::intersection::{
    IntersectionCallback, IntersectionEntry, IntersectionObserverInit, ObserverId,
    ObserverRegistry,
};
use crate::layout::Rect;
use crate::listener::{
    EventListener, EventTarget, ListenerId, ListenerOptions, ListenerRegistry, ListenerStats,
};
use crate::scroll::{clamp_scroll, ScrollOffset};
use crate::style::InlineStyle;

/// An in-memory document: a node tree plus the window it lives in.
///
/// All mutation goes through `&mut Document`, including from inside event
/// listeners and observer callbacks, which receive the document back.
pub struct Document {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_node: u64,
    listeners: ListenerRegistry,
    observers: ObserverRegistry,
    environment: Environment,
    viewport: Rect,
    window_scroll: ScrollOffset,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// A desktop document with a 1024x768 viewport.
    pub fn new() -> Self {
        Self::with_environment(Environment::desktop())
    }

    pub fn with_environment(environment: Environment) -> Self {
        let viewport = Rect::from_size(1024.0, 768.0);
        let root = NodeId(0);
        let body = Node::from_element(&Element::new("body").rect(viewport), None);

        let mut nodes = HashMap::new();
        nodes.insert(root, body);

        Self {
            nodes,
            root,
            next_node: 1,
            listeners: ListenerRegistry::default(),
            observers: ObserverRegistry::default(),
            environment,
            viewport,
            window_scroll: ScrollOffset::default(),
        }
    }

    // -------------------------------------------------------------------------
    // Window
    // -------------------------------------------------------------------------

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Resize the viewport. The root node keeps tracking its size.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.viewport = Rect::from_size(width, height);
        if let Some(body) = self.nodes.get_mut(&self.root) {
            body.rect = self.viewport;
        }
    }

    pub fn window_scroll(&self) -> ScrollOffset {
        self.window_scroll
    }

    pub fn scroll_window_to(&mut self, x: f64, y: f64) {
        self.window_scroll = ScrollOffset::new(x.max(0.0), y.max(0.0));
    }

    // -------------------------------------------------------------------------
    // Tree
    // -------------------------------------------------------------------------

    /// The `body` node every other node descends from.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Materialize an element (and its children) under `parent`.
    pub fn append(&mut self, parent: NodeId, element: Element) -> Result<NodeId, DomError> {
        if !self.nodes.contains_key(&parent) {
            return Err(DomError::NodeNotFound(parent));
        }
        Ok(self.insert_element(parent, &element))
    }

    fn insert_element(&mut self, parent: NodeId, element: &Element) -> NodeId {
        let id = NodeId(self.next_node);
        self.next_node += 1;
        self.nodes.insert(id, Node::from_element(element, Some(parent)));
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(id);
        }
        for child in &element.children {
            self.insert_element(id, child);
        }
        id
    }

    /// Move an existing node to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.nodes.contains_key(&parent) {
            return Err(DomError::NodeNotFound(parent));
        }
        if !self.nodes.contains_key(&child) {
            return Err(DomError::NodeNotFound(child));
        }
        if self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(parent_node) = self.nodes.get_mut(&parent) {
            parent_node.children.push(child);
        }
        Ok(())
    }

    fn detach(&mut self, id: NodeId) {
        let Some(old_parent) = self.nodes.get(&id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(&old_parent) {
            parent_node.children.retain(|c| *c != id);
        }
    }

    /// Remove a node and its subtree.
    ///
    /// Listeners registered on removed nodes stay registered (their owners
    /// still hold the handles) but can no longer be reached by dispatch.
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), DomError> {
        if id == self.root {
            return Err(DomError::RemoveRoot);
        }
        if !self.nodes.contains_key(&id) {
            return Err(DomError::NodeNotFound(id));
        }

        self.detach(id);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
            }
        }
        log::trace!("Removed {id} and its subtree");
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Whether the node is part of this document.
    pub fn exists(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id)?.parent
    }

    /// Inclusive descendant check: a node contains itself.
    pub fn contains(&self, ancestor: NodeId, other: NodeId) -> bool {
        let mut current = Some(other);
        while let Some(id) = current {
            if id == ancestor {
                return self.nodes.contains_key(&id);
            }
            current = self.parent(id);
        }
        false
    }

    /// Ancestors of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            result.push(ancestor);
            current = self.parent(ancestor);
        }
        result
    }

    /// Find a node by its `id` attribute.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_by_id(self.root, id)
    }

    fn find_by_id(&self, from: NodeId, id: &str) -> Option<NodeId> {
        let node = self.nodes.get(&from)?;
        if node.id.as_deref() == Some(id) {
            return Some(from);
        }
        node.children
            .iter()
            .find_map(|child| self.find_by_id(*child, id))
    }

    // -------------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------------

    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.rect = rect;
            node.scroll_left = clamp_scroll(node.scroll_left, node.max_scroll_left());
            node.scroll_top = clamp_scroll(node.scroll_top, node.max_scroll_top());
        }
    }

    pub fn set_content_size(&mut self, id: NodeId, width: f64, height: f64) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.scroll_width = width;
            node.scroll_height = height;
            node.scroll_left = clamp_scroll(node.scroll_left, node.max_scroll_left());
            node.scroll_top = clamp_scroll(node.scroll_top, node.max_scroll_top());
        }
    }

    /// The node's box relative to the viewport.
    pub fn bounding_client_rect(&self, id: NodeId) -> Option<Rect> {
        let node = self.nodes.get(&id)?;
        Some(
            node.rect
                .translate(-self.window_scroll.x, -self.window_scroll.y),
        )
    }

    // -------------------------------------------------------------------------
    // Scrolling
    // -------------------------------------------------------------------------

    pub fn scroll_offset(&self, id: NodeId) -> Option<ScrollOffset> {
        let node = self.nodes.get(&id)?;
        Some(ScrollOffset::new(node.scroll_left, node.scroll_top))
    }

    /// Set the horizontal scroll offset, clamped to the scrollable range.
    pub fn set_scroll_left(&mut self, id: NodeId, value: f64) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.scroll_left = clamp_scroll(value, node.max_scroll_left());
        }
    }

    /// Set the vertical scroll offset, clamped to the scrollable range.
    pub fn set_scroll_top(&mut self, id: NodeId, value: f64) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.scroll_top = clamp_scroll(value, node.max_scroll_top());
        }
    }

    // -------------------------------------------------------------------------
    // Inline style
    // -------------------------------------------------------------------------

    pub fn style(&self, id: NodeId) -> Option<&InlineStyle> {
        self.nodes.get(&id).map(|n| &n.style)
    }

    pub fn style_property(&self, id: NodeId, property: &str) -> Option<&str> {
        self.nodes.get(&id)?.style.get(property)
    }

    pub fn set_style_property(
        &mut self,
        id: NodeId,
        property: impl Into<String>,
        value: impl Into<String>,
    ) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.style.set(property, value);
        }
    }

    pub fn remove_style_property(&mut self, id: NodeId, property: &str) -> Option<String> {
        self.nodes.get_mut(&id)?.style.remove(property)
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    /// Register a listener for `kind` events on `target`.
    pub fn add_event_listener(
        &mut self,
        target: impl Into<EventTarget>,
        kind: &str,
        listener: Rc<dyn EventListener>,
        options: ListenerOptions,
    ) -> ListenerId {
        let target = target.into();
        let id = self.listeners.add(target, kind, listener, options);
        log::trace!("Listener {id:?} on {target:?} for '{kind}' (capture: {})", options.capture);
        id
    }

    /// Register a bubbling-phase closure listener.
    pub fn on<F>(&mut self, target: impl Into<EventTarget>, kind: &str, listener: F) -> ListenerId
    where
        F: Fn(&mut Document, &mut Event) + 'static,
    {
        self.add_event_listener(target, kind, Rc::new(listener), ListenerOptions::default())
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners.is_registered(id)
    }

    pub fn listener_count(&self, target: impl Into<EventTarget>) -> usize {
        self.listeners.count(target.into())
    }

    pub fn listener_count_for(&self, target: impl Into<EventTarget>, kind: &str) -> usize {
        self.listeners.count_kind(target.into(), kind)
    }

    pub fn listener_stats(&self) -> ListenerStats {
        self.listeners.stats()
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Dispatch an event through capture, target and bubble phases.
    ///
    /// Returns false if a listener cancelled the event. Dispatching to a node
    /// that is not in the document is a no-op that returns true.
    pub fn dispatch_event(&mut self, target: impl Into<EventTarget>, event: &mut Event) -> bool {
        let target = target.into();
        let path = match target {
            EventTarget::Window => Vec::new(),
            EventTarget::Document => vec![EventTarget::Window],
            EventTarget::Node(id) => {
                if !self.nodes.contains_key(&id) {
                    log::debug!("Dropping '{}' dispatched to missing {id}", event.kind());
                    return true;
                }
                let mut path = vec![EventTarget::Window, EventTarget::Document];
                path.extend(
                    self.ancestors(id)
                        .into_iter()
                        .rev()
                        .map(EventTarget::Node),
                );
                path
            }
        };

        event.reset_dispatch_flags();
        event.target = Some(target);
        event.apply_window_scroll(self.window_scroll.x, self.window_scroll.y);

        event.phase = EventPhase::Capturing;
        for current in &path {
            if event.propagation_stopped {
                break;
            }
            self.invoke(*current, event, true);
        }

        if !event.propagation_stopped {
            event.phase = EventPhase::AtTarget;
            self.invoke(target, event, true);
            if !event.propagation_stopped {
                self.invoke(target, event, false);
            }
        }

        if event.bubbles() {
            event.phase = EventPhase::Bubbling;
            for current in path.iter().rev() {
                if event.propagation_stopped {
                    break;
                }
                self.invoke(*current, event, false);
            }
        }

        event.phase = EventPhase::None;
        event.current_target = None;
        !event.default_prevented
    }

    fn invoke(&mut self, target: EventTarget, event: &mut Event, capture: bool) {
        let snapshot = self.listeners.collect(target, event.kind(), capture);
        for (id, listener) in snapshot {
            if event.immediate_propagation_stopped {
                break;
            }
            // Removed by an earlier listener of this dispatch.
            if !self.listeners.is_registered(id) {
                continue;
            }
            event.current_target = Some(target);
            listener.handle_event(self, event);
        }
    }

    // -------------------------------------------------------------------------
    // Intersection observers
    // -------------------------------------------------------------------------

    pub fn create_intersection_observer(
        &mut self,
        init: IntersectionObserverInit,
        callback: IntersectionCallback,
    ) -> ObserverId {
        let id = self.observers.create(init, callback);
        log::debug!("Created intersection observer {id:?}");
        id
    }

    pub fn observe(&mut self, observer: ObserverId, target: NodeId) -> bool {
        self.observers.observe(observer, target)
    }

    pub fn unobserve(&mut self, observer: ObserverId, target: NodeId) -> bool {
        self.observers.unobserve(observer, target)
    }

    pub fn disconnect(&mut self, observer: ObserverId) -> bool {
        let removed = self.observers.disconnect(observer);
        if removed {
            log::debug!("Disconnected intersection observer {observer:?}");
        }
        removed
    }

    /// Live observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn observed_targets(&self, observer: ObserverId) -> Vec<NodeId> {
        self.observers.observed_targets(observer)
    }

    /// Measure all observed targets and deliver pending entries.
    ///
    /// Returns the number of entries delivered.
    pub fn run_intersection_checks(&mut self) -> usize {
        let nodes = &self.nodes;
        let scroll = self.window_scroll;
        let client_rect = |id: NodeId| {
            nodes
                .get(&id)
                .map(|node| node.rect.translate(-scroll.x, -scroll.y))
        };
        let deliveries: Vec<(IntersectionCallback, Vec<IntersectionEntry>)> =
            self.observers.check(client_rect, self.viewport);

        let mut delivered = 0;
        for (callback, entries) in deliveries {
            delivered += entries.len();
            callback(self, &entries);
        }
        delivered
    }
}
