//! The HTML tree the math renderer operates on.

use std::fmt;

use smallvec::SmallVec;

use crate::arena_tree::{Arena, NodeId};
use crate::classify::MathType;

/// The core enum of the HTML tree: every node carries one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeValue {
    /// The root of a fragment. Never serialized itself.
    Root,

    /// An element, with tag name, attributes and per-node data.
    Element(NodeElement),

    /// Character data. Stored decoded; escaped on output.
    Text(String),

    /// A comment, stored and written verbatim.
    Comment(String),
}

/// An HTML element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeElement {
    /// The lowercase tag name, e.g. `span`.
    pub tag: String,

    /// Attributes in source order. Values are stored decoded.
    pub attributes: Vec<(String, String)>,

    /// Data attached by the pipeline; never serialized.
    pub data: NodeData,
}

/// Typed side channel attached to every element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeData {
    /// The syntax of the math this element holds, when already known.
    /// Absent means the renderer classifies the text itself.
    pub math_type: Option<MathType>,
}

/// Elements that never have content and are written without an end tag.
pub(crate) const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Whether `tag` is a void element.
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

impl NodeElement {
    /// Create an element with no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        NodeElement {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// The value of attribute `name`. Valueless attributes read as `""`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set attribute `name`, replacing an existing value in place.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            Some(attribute) => attribute.1 = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    /// Remove attribute `name`, returning its value if it was present.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let i = self
            .attributes
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        Some(self.attributes.remove(i).1)
    }

    /// The whitespace-separated entries of the `class` attribute.
    pub fn classes(&self) -> SmallVec<[&str; 4]> {
        self.attribute("class")
            .map(|c| c.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }

    /// Whether the class list contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().contains(&class)
    }

    /// Add `class` to the class list unless it is already there.
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let value = match self.attribute("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        self.set_attribute("class", value);
    }
}

/// An HTML fragment: an arena plus the id of its [`NodeValue::Root`].
#[derive(Clone)]
pub struct HtmlTree {
    arena: Arena<NodeValue>,
    root: NodeId,
}

impl Default for HtmlTree {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlTree {
    /// Create a tree holding only a root.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.alloc(NodeValue::Root);
        HtmlTree { arena, root }
    }

    /// The id of the root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The underlying arena, for structural navigation.
    pub fn arena(&self) -> &Arena<NodeValue> {
        &self.arena
    }

    /// The underlying arena, for structural edits.
    pub fn arena_mut(&mut self) -> &mut Arena<NodeValue> {
        &mut self.arena
    }

    /// The value stored at `id`.
    pub fn get(&self, id: NodeId) -> &NodeValue {
        &self.arena[id].data
    }

    /// The value stored at `id`, mutably.
    pub fn get_mut(&mut self, id: NodeId) -> &mut NodeValue {
        &mut self.arena[id].data
    }

    /// The element stored at `id`, if it is one.
    pub fn element(&self, id: NodeId) -> Option<&NodeElement> {
        match self.get(id) {
            NodeValue::Element(e) => Some(e),
            _ => None,
        }
    }

    /// The element stored at `id`, mutably, if it is one.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut NodeElement> {
        match self.get_mut(id) {
            NodeValue::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Allocate a detached node.
    pub fn create(&mut self, value: NodeValue) -> NodeId {
        self.arena.alloc(value)
    }

    /// Allocate a node and append it to `parent`.
    pub fn append_new(&mut self, parent: NodeId, value: NodeValue) -> NodeId {
        let id = self.arena.alloc(value);
        self.arena.append(parent, id);
        id
    }

    /// Whether `id` can be reached from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.arena.ancestors(id).last() == Some(self.root)
    }

    /// Concatenation of all descendant text, in document order, verbatim.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        for node in self.arena.descendants(id) {
            if let NodeValue::Text(t) = self.get(node) {
                text.push_str(t);
            }
        }
        text
    }

    /// Deep-copy the subtree rooted at `source_id` of `source` into this
    /// tree. The copy is returned detached. Copying a root copies its
    /// children under a fresh root value.
    pub fn graft(&mut self, source: &HtmlTree, source_id: NodeId) -> NodeId {
        let copy = self.create(source.get(source_id).clone());
        let mut pending = vec![(source_id, copy)];
        while let Some((from, to)) = pending.pop() {
            for child in source.arena.children(from) {
                let new_child = self.append_new(to, source.get(child).clone());
                pending.push((child, new_child));
            }
        }
        copy
    }

    /// Serialize the tree to an HTML string.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        // Writing into a String does not fail.
        let _ = crate::html::format_html(self, &mut out);
        out
    }
}

impl fmt::Debug for HtmlTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("HtmlTree")
            .field("html", &self.to_html())
            .finish()
    }
}
