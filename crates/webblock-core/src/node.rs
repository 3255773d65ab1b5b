//! Retained node trees and the attach point they are rendered into.

use std::fmt::Write as _;

/// Escape HTML special characters in a string.
pub fn html_escape_string(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// A node in a rendered tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An element with attributes and children.
    Element(ElementNode),
    /// Text content, escaped on serialization.
    Text(String),
    /// Raw markup inserted verbatim.
    Markup(String),
}

/// An element node.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl ElementNode {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets an attribute, keeping its position when it already exists.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(n, _)| n == name)?;
        Some(self.attributes.remove(index).1)
    }
}

impl Node {
    pub fn element(tag: impl Into<String>) -> Self {
        Node::Element(ElementNode {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn markup(markup: impl Into<String>) -> Self {
        Node::Markup(markup.into())
    }

    /// Adds an attribute. No-op on non-element nodes.
    #[must_use]
    pub fn attr(mut self, name: &str, value: impl AsRef<str>) -> Self {
        if let Node::Element(el) = &mut self {
            el.set_attribute(name, value.as_ref());
        }
        self
    }

    /// Appends a child. No-op on non-element nodes.
    #[must_use]
    pub fn child(mut self, child: Node) -> Self {
        if let Node::Element(el) = &mut self {
            el.children.push(child);
        }
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        if let Node::Element(el) = &mut self {
            el.children.extend(children);
        }
        self
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn is_style(&self) -> bool {
        matches!(self, Node::Element(el) if el.tag == "style")
    }

    /// Serializes the node to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&html_escape_string(text)),
            Node::Markup(markup) => out.push_str(markup),
            Node::Element(el) => {
                let _ = write!(out, "<{}", el.tag);
                for (name, value) in &el.attributes {
                    let _ = write!(out, " {}=\"{}\"", name, html_escape_string(value));
                }
                out.push('>');
                for child in &el.children {
                    // Style bodies are raw text.
                    match child {
                        Node::Text(text) if el.tag == "style" => out.push_str(text),
                        _ => child.write_html(out),
                    }
                }
                let _ = write!(out, "</{}>", el.tag);
            }
        }
    }
}

/// What a render function produces: markup text or a ready-made tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Markup(String),
    Node(Node),
}

impl Rendered {
    /// Markup becomes a single raw node.
    pub fn into_node(self) -> Node {
        match self {
            Rendered::Markup(markup) => Node::Markup(markup),
            Rendered::Node(node) => node,
        }
    }
}

impl From<String> for Rendered {
    fn from(markup: String) -> Self {
        Rendered::Markup(markup)
    }
}

impl From<&str> for Rendered {
    fn from(markup: &str) -> Self {
        Rendered::Markup(markup.to_string())
    }
}

impl From<Node> for Rendered {
    fn from(node: Node) -> Self {
        Rendered::Node(node)
    }
}

/// The stylesheet slot of a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Style {
    /// Inline CSS, injected as one `<style>` node.
    Inline(String),
    /// Stylesheet URLs, each injected as an `@import` rule in its own node.
    Imports(Vec<String>),
}

impl Style {
    /// The `<style>` nodes this style injects.
    pub fn nodes(&self) -> Vec<Node> {
        let style = |css: String| Node::element("style").child(Node::Text(css));
        match self {
            Style::Inline(css) => vec![style(css.clone())],
            Style::Imports(urls) => urls
                .iter()
                .map(|url| style(format!("@import \"{url}\"")))
                .collect(),
        }
    }
}

impl From<&str> for Style {
    fn from(css: &str) -> Self {
        Style::Inline(css.to_string())
    }
}

/// Stable handle to a top-level node of a [`ShadowRoot`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SlotId(u64);

/// The isolated attach point an instance renders into.
#[derive(Debug, Default)]
pub struct ShadowRoot {
    children: Vec<(SlotId, Node)>,
    next_slot: u64,
}

impl ShadowRoot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a top-level node and returns its handle.
    pub fn append(&mut self, node: Node) -> SlotId {
        let id = SlotId(self.next_slot);
        self.next_slot += 1;
        self.children.push((id, node));
        id
    }

    pub fn get(&self, slot: SlotId) -> Option<&Node> {
        self.children
            .iter()
            .find(|(id, _)| *id == slot)
            .map(|(_, node)| node)
    }

    pub fn get_mut(&mut self, slot: SlotId) -> Option<&mut Node> {
        self.children
            .iter_mut()
            .find(|(id, _)| *id == slot)
            .map(|(_, node)| node)
    }

    pub fn remove(&mut self, slot: SlotId) -> Option<Node> {
        let index = self.children.iter().position(|(id, _)| *id == slot)?;
        Some(self.children.remove(index).1)
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    /// Replaces all content with `markup`.
    pub fn set_inner_markup(&mut self, markup: &str) {
        self.clear();
        if !markup.is_empty() {
            self.append(Node::markup(markup));
        }
    }

    /// Strips every existing style node and appends fresh ones for `style`.
    ///
    /// Markup nodes are opaque: a `<style>` written inside render markup is
    /// not a node here and is left in place.
    pub fn inject_style(&mut self, style: Option<&Style>) {
        self.children.retain(|(_, node)| !node.is_style());
        if let Some(style) = style {
            for node in style.nodes() {
                self.append(node);
            }
        }
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().map(|(_, node)| node)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn to_html(&self) -> String {
        self.children().map(Node::to_html).collect()
    }
}
