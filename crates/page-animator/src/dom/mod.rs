//! DOM access.
//!
//! Page logic only talks to the document through [`Dom`]. The browser
//! implementation wraps web-sys; [`MockDom`] is an in-memory document with
//! explicit layout used by the test suite.

mod mock;

#[cfg(feature = "wasm")]
mod browser;

#[cfg(feature = "wasm")]
pub use browser::BrowserDom;
pub use mock::{MockDom, MockNode};

use crate::result::AnimatorResult;
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};

/// Opaque reference to an element owned by a [`Dom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeRef(usize);

impl NodeRef {
    /// Wrap a raw index
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Raw index
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Layout box in document coordinates, ignoring transforms
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Distance from the document's left edge
    pub left: f64,
    /// Distance from the document's top edge
    pub top: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Create a rect
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Bottom edge
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Right edge
    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Severity of a toast notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    /// Positive confirmation
    Success,
    /// Something needs the user's attention
    Error,
}

impl ToastKind {
    /// Modifier used in the `toast--{kind}` class
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// The operations page logic needs from a document.
///
/// Writes that the host rejects are logged by the implementation and
/// otherwise ignored; only element creation reports failure.
pub trait Dom {
    /// Window and document-element metrics
    fn viewport(&self) -> Viewport;

    /// Vertical page scroll offset
    fn scroll_y(&self) -> f64;

    /// Whether the user asked for reduced motion
    fn prefers_reduced_motion(&self) -> bool;

    /// First element matching `selector`
    fn query(&mut self, selector: &str) -> Option<NodeRef>;

    /// All elements matching `selector`, in document order
    fn query_all(&mut self, selector: &str) -> Vec<NodeRef>;

    /// The `<body>` element
    fn body(&mut self) -> Option<NodeRef>;

    /// Untransformed layout box
    fn layout_box(&self, node: NodeRef) -> Rect;

    /// Full scrollable width of the content
    fn scroll_width(&self, node: NodeRef) -> f64;

    /// Rendered width
    fn offset_width(&self, node: NodeRef) -> f64;

    /// Add a class
    fn add_class(&mut self, node: NodeRef, class: &str);

    /// Remove a class
    fn remove_class(&mut self, node: NodeRef, class: &str);

    /// Whether the class is present
    fn has_class(&self, node: NodeRef, class: &str) -> bool;

    /// Set an inline style property; an empty value removes it
    fn set_style(&mut self, node: NodeRef, property: &str, value: &str);

    /// Set an attribute
    fn set_attribute(&mut self, node: NodeRef, name: &str, value: &str);

    /// Replace the text content
    fn set_text(&mut self, node: NodeRef, text: &str);

    /// Create a detached element
    fn create_element(&mut self, tag: &str) -> AnimatorResult<NodeRef>;

    /// Append a node as the last child of `<body>`
    fn append_to_body(&mut self, node: NodeRef) -> AnimatorResult<()>;

    /// Detach a node from the document and let go of it. The reference is
    /// dead afterwards and may be handed out again for a new node.
    fn remove(&mut self, node: NodeRef);

    /// Whether the node is attached to the document
    fn is_attached(&self, node: NodeRef) -> bool;

    /// Value of the form control named `field` inside `form`
    fn form_value(&self, form: NodeRef, field: &str) -> Option<String>;

    /// Reset every control of `form` to its default
    fn reset_form(&mut self, form: NodeRef);
}
