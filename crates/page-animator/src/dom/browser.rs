//! web-sys implementation of [`Dom`].

use super::{Dom, NodeRef, Rect};
use crate::result::{AnimatorError, AnimatorResult};
use crate::viewport::Viewport;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement, Window};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// The live document.
///
/// Elements handed out as [`NodeRef`]s are kept in an arena; looking up an
/// element that is already in it returns the existing reference. Removing a
/// node frees its slot for the next element.
#[derive(Debug)]
pub struct BrowserDom {
    window: Window,
    document: Document,
    nodes: Vec<Option<Element>>,
    free: Vec<usize>,
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

fn dom_error(operation: &'static str) -> impl Fn(JsValue) -> AnimatorError {
    move |value| AnimatorError::Dom {
        operation,
        message: describe(&value),
    }
}

impl BrowserDom {
    /// Bind to the current window's document
    pub fn new() -> AnimatorResult<Self> {
        let window = web_sys::window().ok_or(AnimatorError::MissingGlobal { name: "window" })?;
        let document = window
            .document()
            .ok_or(AnimatorError::MissingGlobal { name: "document" })?;
        Ok(Self {
            window,
            document,
            nodes: Vec::new(),
            free: Vec::new(),
        })
    }

    /// The window
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// The document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Element behind a reference
    pub fn element(&self, node: NodeRef) -> Option<&Element> {
        self.nodes.get(node.index()).and_then(Option::as_ref)
    }

    /// Number of elements currently held
    pub fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    fn intern(&mut self, element: Element) -> NodeRef {
        let existing = self.nodes.iter().position(|known| {
            known
                .as_ref()
                .is_some_and(|known| known.is_same_node(Some(element.as_ref())))
        });
        if let Some(index) = existing {
            return NodeRef::new(index);
        }
        self.store(element)
    }

    fn store(&mut self, element: Element) -> NodeRef {
        if let Some(index) = self.free.pop() {
            if let Some(slot) = self.nodes.get_mut(index) {
                *slot = Some(element);
                return NodeRef::new(index);
            }
        }
        self.nodes.push(Some(element));
        NodeRef::new(self.nodes.len() - 1)
    }

    fn html(&self, node: NodeRef) -> Option<&HtmlElement> {
        self.element(node).and_then(|e| e.dyn_ref::<HtmlElement>())
    }
}

fn warn_on_err(operation: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        tracing::warn!(operation, error = %describe(&e), "DOM write failed");
    }
}

impl Dom for BrowserDom {
    fn viewport(&self) -> Viewport {
        let dimension = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
        };
        let width = dimension(self.window.inner_width());
        let height = dimension(self.window.inner_height());
        let client_width = self
            .document
            .document_element()
            .map_or(width, |root| f64::from(root.client_width()));
        Viewport::new(width, height).with_client_width(client_width)
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn prefers_reduced_motion(&self) -> bool {
        matches!(
            self.window.match_media(REDUCED_MOTION_QUERY),
            Ok(Some(query)) if query.matches()
        )
    }

    fn query(&mut self, selector: &str) -> Option<NodeRef> {
        match self.document.query_selector(selector) {
            Ok(found) => found.map(|e| self.intern(e)),
            Err(e) => {
                tracing::warn!(selector, error = %describe(&e), "invalid selector");
                None
            }
        }
    }

    fn query_all(&mut self, selector: &str) -> Vec<NodeRef> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(selector, error = %describe(&e), "invalid selector");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.intern(element))
            .collect()
    }

    fn body(&mut self) -> Option<NodeRef> {
        let body = self.document.body()?;
        Some(self.intern(body.into()))
    }

    fn layout_box(&self, node: NodeRef) -> Rect {
        let Some(html) = self.html(node) else {
            return Rect::default();
        };
        // offsetTop/offsetLeft ignore transforms, which the animations write
        let (mut left, mut top) = (0.0, 0.0);
        let mut current = Some(html.clone());
        while let Some(el) = current {
            left += f64::from(el.offset_left());
            top += f64::from(el.offset_top());
            current = el
                .offset_parent()
                .and_then(|parent| parent.dyn_into::<HtmlElement>().ok());
        }
        Rect::new(
            left,
            top,
            f64::from(html.offset_width()),
            f64::from(html.offset_height()),
        )
    }

    fn scroll_width(&self, node: NodeRef) -> f64 {
        self.element(node).map_or(0.0, |e| f64::from(e.scroll_width()))
    }

    fn offset_width(&self, node: NodeRef) -> f64 {
        self.html(node).map_or(0.0, |e| f64::from(e.offset_width()))
    }

    fn add_class(&mut self, node: NodeRef, class: &str) {
        if let Some(e) = self.element(node) {
            warn_on_err("add_class", e.class_list().add_1(class));
        }
    }

    fn remove_class(&mut self, node: NodeRef, class: &str) {
        if let Some(e) = self.element(node) {
            warn_on_err("remove_class", e.class_list().remove_1(class));
        }
    }

    fn has_class(&self, node: NodeRef, class: &str) -> bool {
        self.element(node)
            .is_some_and(|e| e.class_list().contains(class))
    }

    fn set_style(&mut self, node: NodeRef, property: &str, value: &str) {
        let Some(html) = self.html(node) else {
            return;
        };
        let style = html.style();
        if value.is_empty() {
            warn_on_err("remove_style", style.remove_property(property).map(|_| ()));
        } else {
            warn_on_err("set_style", style.set_property(property, value));
        }
    }

    fn set_attribute(&mut self, node: NodeRef, name: &str, value: &str) {
        if let Some(e) = self.element(node) {
            warn_on_err("set_attribute", e.set_attribute(name, value));
        }
    }

    fn set_text(&mut self, node: NodeRef, text: &str) {
        if let Some(e) = self.element(node) {
            e.set_text_content(Some(text));
        }
    }

    fn create_element(&mut self, tag: &str) -> AnimatorResult<NodeRef> {
        let element = self
            .document
            .create_element(tag)
            .map_err(dom_error("create_element"))?;
        Ok(self.store(element))
    }

    fn append_to_body(&mut self, node: NodeRef) -> AnimatorResult<()> {
        let body = self
            .document
            .body()
            .ok_or(AnimatorError::MissingGlobal { name: "body" })?;
        let element = self.element(node).ok_or_else(|| AnimatorError::Dom {
            operation: "append_to_body",
            message: format!("unknown node {}", node.index()),
        })?;
        body.append_child(element)
            .map_err(dom_error("append_to_body"))?;
        Ok(())
    }

    fn remove(&mut self, node: NodeRef) {
        if let Some(e) = self.nodes.get_mut(node.index()).and_then(Option::take) {
            e.remove();
            self.free.push(node.index());
        }
    }

    fn is_attached(&self, node: NodeRef) -> bool {
        self.element(node).is_some_and(|e| e.is_connected())
    }

    fn form_value(&self, form: NodeRef, field: &str) -> Option<String> {
        let control = self
            .element(form)?
            .query_selector(&format!("[name=\"{field}\"]"))
            .ok()??;
        if let Some(input) = control.dyn_ref::<HtmlInputElement>() {
            return Some(input.value());
        }
        control
            .dyn_ref::<HtmlTextAreaElement>()
            .map(HtmlTextAreaElement::value)
    }

    fn reset_form(&mut self, form: NodeRef) {
        if let Some(form) = self
            .element(form)
            .and_then(|e| e.dyn_ref::<HtmlFormElement>())
        {
            form.reset();
        }
    }
}
