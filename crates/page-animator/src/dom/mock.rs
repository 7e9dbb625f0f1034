//! In-memory document for tests.
//!
//! Layout is not computed: every node carries the box, scroll width and
//! offset width the test gives it.

use super::{Dom, NodeRef, Rect};
use crate::result::{AnimatorError, AnimatorResult};
use crate::viewport::Viewport;
use std::collections::{BTreeMap, HashMap};

/// A node in the mock document
#[derive(Debug, Clone, PartialEq)]
pub struct MockNode {
    /// Tag name, lowercase
    pub tag: String,
    /// Element ID
    pub id: String,
    /// CSS classes
    pub classes: Vec<String>,
    /// Attributes
    pub attributes: HashMap<String, String>,
    /// Inline styles
    pub styles: BTreeMap<String, String>,
    /// Text content
    pub text: String,
    /// Untransformed layout box
    pub layout: Rect,
    /// Scrollable content width (defaults to the layout width)
    pub scroll_width: Option<f64>,
    /// Form control values keyed by control name
    pub fields: BTreeMap<String, String>,
    /// Whether the node is in the document
    pub attached: bool,
}

impl Default for MockNode {
    fn default() -> Self {
        Self::new("div")
    }
}

impl MockNode {
    /// Create a detached node with the given tag
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: String::new(),
            classes: Vec::new(),
            attributes: HashMap::new(),
            styles: BTreeMap::new(),
            text: String::new(),
            layout: Rect::default(),
            scroll_width: None,
            fields: BTreeMap::new(),
            attached: false,
        }
    }

    /// Set the ID
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Add a class
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        if !self.classes.iter().any(|c| c == class) {
            self.classes.push(class.to_string());
        }
        self
    }

    /// Set the layout box
    #[must_use]
    pub fn with_layout(mut self, layout: Rect) -> Self {
        self.layout = layout;
        self
    }

    /// Set the scroll width
    #[must_use]
    pub fn with_scroll_width(mut self, width: f64) -> Self {
        self.scroll_width = Some(width);
        self
    }

    /// Add a named form control with a value
    #[must_use]
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields.insert(name.to_string(), value.to_string());
        self
    }

    /// Whether the node has a class
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Whether the node matches a simple selector: `tag`, `.class`, `#id`
    /// or a compound of those such as `div.toast.toast--error`.
    #[must_use]
    pub fn matches(&self, selector: &str) -> bool {
        let selector = selector.trim();
        if selector.is_empty() {
            return false;
        }

        let mut parts = Vec::new();
        let mut start = 0;
        for (i, ch) in selector.char_indices().skip(1) {
            if ch == '.' || ch == '#' {
                parts.push(&selector[start..i]);
                start = i;
            }
        }
        parts.push(&selector[start..]);

        parts.iter().all(|part| {
            if let Some(class) = part.strip_prefix('.') {
                self.has_class(class)
            } else if let Some(id) = part.strip_prefix('#') {
                self.id == id
            } else {
                self.tag.eq_ignore_ascii_case(part)
            }
        })
    }
}

/// Mock document
#[derive(Debug, Clone)]
pub struct MockDom {
    nodes: Vec<Option<MockNode>>,
    free: Vec<usize>,
    viewport: Viewport,
    scroll_y: f64,
    reduced_motion: bool,
}

impl Default for MockDom {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl MockDom {
    /// Document containing only `<body>`
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        let mut body = MockNode::new("body");
        body.attached = true;
        body.layout = Rect::new(0.0, 0.0, viewport.width, viewport.height);
        Self {
            nodes: vec![Some(body)],
            free: Vec::new(),
            viewport,
            scroll_y: 0.0,
            reduced_motion: false,
        }
    }

    /// Attach a node to the document and return its reference
    pub fn insert(&mut self, mut node: MockNode) -> NodeRef {
        node.attached = true;
        self.store(node)
    }

    fn store(&mut self, node: MockNode) -> NodeRef {
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.nodes.get_mut(index) {
                *slot = Some(node);
                return NodeRef::new(index);
            }
        }
        self.nodes.push(Some(node));
        NodeRef::new(self.nodes.len() - 1)
    }

    fn node_mut(&mut self, node: NodeRef) -> Option<&mut MockNode> {
        self.nodes.get_mut(node.index()).and_then(Option::as_mut)
    }

    /// Number of nodes the document holds, attached or not.
    /// Removed nodes no longer count.
    #[must_use]
    pub fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Set the height of `<body>` (the scrollable document length)
    pub fn set_document_height(&mut self, height: f64) {
        if let Some(body) = self.node_mut(NodeRef::new(0)) {
            body.layout.height = height;
        }
    }

    /// Replace the viewport metrics
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(body) = self.node_mut(NodeRef::new(0)) {
            body.layout.width = viewport.width;
        }
    }

    /// Scroll the page
    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y.max(0.0);
    }

    /// Toggle the reduced motion preference
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    /// Change a node's layout box
    pub fn set_layout(&mut self, node: NodeRef, layout: Rect) {
        if let Some(n) = self.node_mut(node) {
            n.layout = layout;
        }
    }

    /// Change a node's scroll width
    pub fn set_scroll_width(&mut self, node: NodeRef, width: f64) {
        if let Some(n) = self.node_mut(node) {
            n.scroll_width = Some(width);
        }
    }

    /// Type into a form control
    pub fn set_field(&mut self, form: NodeRef, field: &str, value: &str) {
        if let Some(n) = self.node_mut(form) {
            n.fields.insert(field.to_string(), value.to_string());
        }
    }

    /// Node by reference
    #[must_use]
    pub fn node(&self, node: NodeRef) -> Option<&MockNode> {
        self.nodes.get(node.index()).and_then(Option::as_ref)
    }

    /// Inline style value
    #[must_use]
    pub fn style(&self, node: NodeRef, property: &str) -> Option<&str> {
        self.node(node)
            .and_then(|n| n.styles.get(property))
            .map(String::as_str)
    }

    /// Inline opacity parsed as a number
    #[must_use]
    pub fn opacity(&self, node: NodeRef) -> Option<f64> {
        self.style(node, "opacity").and_then(|v| v.parse().ok())
    }

    /// Attached nodes matching a selector, without caching
    #[must_use]
    pub fn find_all(&self, selector: &str) -> Vec<NodeRef> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (i, n)))
            .filter(|(_, n)| n.attached && n.matches(selector))
            .map(|(i, _)| NodeRef::new(i))
            .collect()
    }
}

impl Dom for MockDom {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn query(&mut self, selector: &str) -> Option<NodeRef> {
        self.find_all(selector).into_iter().next()
    }

    fn query_all(&mut self, selector: &str) -> Vec<NodeRef> {
        self.find_all(selector)
    }

    fn body(&mut self) -> Option<NodeRef> {
        Some(NodeRef::new(0))
    }

    fn layout_box(&self, node: NodeRef) -> Rect {
        self.node(node).map(|n| n.layout).unwrap_or_default()
    }

    fn scroll_width(&self, node: NodeRef) -> f64 {
        self.node(node)
            .map(|n| n.scroll_width.unwrap_or(n.layout.width))
            .unwrap_or(0.0)
    }

    fn offset_width(&self, node: NodeRef) -> f64 {
        self.node(node).map(|n| n.layout.width).unwrap_or(0.0)
    }

    fn add_class(&mut self, node: NodeRef, class: &str) {
        if let Some(n) = self.node_mut(node) {
            if !n.has_class(class) {
                n.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: NodeRef, class: &str) {
        if let Some(n) = self.node_mut(node) {
            n.classes.retain(|c| c != class);
        }
    }

    fn has_class(&self, node: NodeRef, class: &str) -> bool {
        self.node(node).is_some_and(|n| n.has_class(class))
    }

    fn set_style(&mut self, node: NodeRef, property: &str, value: &str) {
        if let Some(n) = self.node_mut(node) {
            if value.is_empty() {
                n.styles.remove(property);
            } else {
                n.styles.insert(property.to_string(), value.to_string());
            }
        }
    }

    fn set_attribute(&mut self, node: NodeRef, name: &str, value: &str) {
        if let Some(n) = self.node_mut(node) {
            if name == "class" {
                n.classes = value.split_whitespace().map(str::to_string).collect();
            } else if name == "id" {
                n.id = value.to_string();
            } else {
                n.attributes.insert(name.to_string(), value.to_string());
            }
        }
    }

    fn set_text(&mut self, node: NodeRef, text: &str) {
        if let Some(n) = self.node_mut(node) {
            n.text = text.to_string();
        }
    }

    fn create_element(&mut self, tag: &str) -> AnimatorResult<NodeRef> {
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(AnimatorError::Dom {
                operation: "createElement",
                message: format!("invalid tag name '{tag}'"),
            });
        }
        Ok(self.store(MockNode::new(tag)))
    }

    fn append_to_body(&mut self, node: NodeRef) -> AnimatorResult<()> {
        match self.node_mut(node) {
            Some(n) => {
                n.attached = true;
                Ok(())
            }
            None => Err(AnimatorError::Dom {
                operation: "appendChild",
                message: format!("unknown node {}", node.index()),
            }),
        }
    }

    fn remove(&mut self, node: NodeRef) {
        // `<body>` stays
        if node.index() == 0 {
            return;
        }
        let removed = self.nodes.get_mut(node.index()).and_then(Option::take);
        if removed.is_some() {
            self.free.push(node.index());
        }
    }

    fn is_attached(&self, node: NodeRef) -> bool {
        self.node(node).is_some_and(|n| n.attached)
    }

    fn form_value(&self, form: NodeRef, field: &str) -> Option<String> {
        self.node(form).and_then(|n| n.fields.get(field)).cloned()
    }

    fn reset_form(&mut self, form: NodeRef) {
        // controls in the page markup have no default values
        if let Some(n) = self.node_mut(form) {
            n.fields.values_mut().for_each(String::clear);
        }
    }
}
