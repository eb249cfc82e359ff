use super::NodeId;
use crate::layout::Rect;
use crate::style::InlineStyle;

/// Description of an element to insert into a document.
///
/// Built with chained setters and materialized by
/// [`Document::append`](crate::Document::append), which assigns a [`NodeId`]
/// to it and every descendant.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub rect: Rect,
    /// Scrollable content size. Defaults to the rect size (no overflow).
    pub content_size: Option<(f64, f64)>,
    pub style: InlineStyle,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    // Layout
    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn bounds(self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect(Rect::new(x, y, width, height))
    }

    pub fn content_size(mut self, width: f64, height: f64) -> Self {
        self.content_size = Some((width, height));
        self
    }

    // Visual
    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.set(property, value);
        self
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }
}

/// A node living in a document.
#[derive(Debug, Clone)]
pub struct Node {
    pub tag: String,
    pub id: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub rect: Rect,
    pub scroll_width: f64,
    pub scroll_height: f64,
    pub scroll_left: f64,
    pub scroll_top: f64,
    pub style: InlineStyle,
}

impl Node {
    pub(crate) fn from_element(element: &Element, parent: Option<NodeId>) -> Self {
        let (scroll_width, scroll_height) = element
            .content_size
            .unwrap_or((element.rect.width, element.rect.height));
        Self {
            tag: element.tag.clone(),
            id: element.id.clone(),
            parent,
            children: Vec::new(),
            rect: element.rect,
            scroll_width,
            scroll_height,
            scroll_left: 0.0,
            scroll_top: 0.0,
            style: element.style.clone(),
        }
    }

    /// Layout offset from the left of the page.
    pub fn offset_left(&self) -> f64 {
        self.rect.x
    }

    /// Layout offset from the top of the page.
    pub fn offset_top(&self) -> f64 {
        self.rect.y
    }

    pub fn client_width(&self) -> f64 {
        self.rect.width
    }

    pub fn client_height(&self) -> f64 {
        self.rect.height
    }

    /// Largest horizontal scroll offset the content allows.
    pub fn max_scroll_left(&self) -> f64 {
        (self.scroll_width - self.client_width()).max(0.0)
    }

    /// Largest vertical scroll offset the content allows.
    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height()).max(0.0)
    }
}
