//! In-memory rendered document: an arena of element and text nodes.
//!
//! Nodes are addressed by [`NodeId`]. The document keeps an `id` attribute
//! index that is refreshed on every write of that attribute, so lookups by
//! identifier stay valid after the scanner tags elements.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::types::BoundingBox;

pub mod markdown;
pub mod scanner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    pub rect: BoundingBox,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub kind: NodeKind,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    ids: HashMap<String, NodeId>,
}

impl Document {
    pub fn new(root_tag: &str) -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            kind: NodeKind::Element(ElementData {
                tag: root_tag.to_string(),
                attributes: BTreeMap::new(),
                style: BTreeMap::new(),
                rect: BoundingBox::default(),
            }),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            ids: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        self.push(
            parent,
            NodeKind::Element(ElementData {
                tag: tag.to_string(),
                attributes: BTreeMap::new(),
                style: BTreeMap::new(),
                rect: BoundingBox::default(),
            }),
        )
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push(parent, NodeKind::Text(text.to_string()))
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(id);
        }
        id
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id)?.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(id.0)?.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.kind {
            NodeKind::Text(text) => Some(text.as_str()),
            NodeKind::Element(_) => None,
        }
    }

    /// Appends to an existing text node. Returns false for elements.
    pub fn push_text(&mut self, id: NodeId, more: &str) -> bool {
        match self.nodes.get_mut(id.0).map(|n| &mut n.kind) {
            Some(NodeKind::Text(text)) => {
                text.push_str(more);
                true
            }
            _ => false,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attributes.get(name).map(String::as_str)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> bool {
        let previous = match self.element_mut(id) {
            Some(data) => data.attributes.insert(name.to_string(), value.to_string()),
            None => return false,
        };
        if name == "id" {
            if let Some(old) = previous {
                if self.ids.get(&old) == Some(&id) {
                    self.ids.remove(&old);
                }
            }
            self.ids.insert(value.to_string(), id);
        }
        true
    }

    /// Keep `id` resolving to `node` without touching its attributes. Used
    /// when an element's `id` attribute is rewritten but its old identifier
    /// must stay addressable.
    pub fn alias_id(&mut self, id: &str, node: NodeId) {
        if self.element(node).is_some() {
            self.ids.insert(id.to_string(), node);
        }
    }

    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    pub fn style_property(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.style.get(name).map(String::as_str)
    }

    pub fn set_style_property(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(data) = self.element_mut(id) {
            data.style.insert(name.to_string(), value.to_string());
        }
    }

    pub fn remove_style_property(&mut self, id: NodeId, name: &str) {
        if let Some(data) = self.element_mut(id) {
            data.style.remove(name);
        }
    }

    pub fn rect(&self, id: NodeId) -> Option<BoundingBox> {
        self.element(id).map(|e| e.rect)
    }

    pub fn set_rect(&mut self, id: NodeId, rect: BoundingBox) {
        if let Some(data) = self.element_mut(id) {
            data.rect = rect;
        }
    }

    /// Concatenated text of every descendant text node, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(text) = self.text(node) {
                out.push_str(text);
            }
        }
        out
    }

    /// Pre-order traversal of `id` and everything below it.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let stack = if self.node(id).is_some() {
            vec![id]
        } else {
            Vec::new()
        };
        Descendants { doc: self, stack }
    }
}

pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new("body");
        let root = doc.root();
        let div = doc.append_element(root, "div");
        doc.set_attribute(div, "id", "content");
        let p = doc.append_element(div, "p");
        doc.append_text(p, "Hello ");
        let strong = doc.append_element(p, "strong");
        doc.append_text(strong, "big");
        doc.append_text(p, " world");
        (doc, div, p, strong)
    }

    #[test]
    fn descendants_are_in_document_order() {
        let (doc, div, p, strong) = sample();
        let order: Vec<NodeId> = doc.descendants(div).collect();
        assert_eq!(order[0], div);
        assert_eq!(order[1], p);
        assert_eq!(doc.text(order[2]), Some("Hello "));
        assert_eq!(order[3], strong);
        assert_eq!(doc.text(order[4]), Some("big"));
        assert_eq!(doc.text(order[5]), Some(" world"));
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let (doc, div, _, _) = sample();
        assert_eq!(doc.text_content(div), "Hello big world");
    }

    #[test]
    fn id_index_follows_attribute_writes() {
        let (mut doc, div, p, _) = sample();
        assert_eq!(doc.element_by_id("content"), Some(div));

        doc.set_attribute(p, "id", "text-node-0");
        assert_eq!(doc.element_by_id("text-node-0"), Some(p));

        doc.set_attribute(p, "id", "text-node-7");
        assert_eq!(doc.element_by_id("text-node-0"), None);
        assert_eq!(doc.element_by_id("text-node-7"), Some(p));
    }

    #[test]
    fn alias_survives_id_rewrite() {
        let (mut doc, div, _, _) = sample();
        doc.set_attribute(div, "id", "text-node-0");
        assert_eq!(doc.element_by_id("content"), None);
        doc.alias_id("content", div);
        assert_eq!(doc.element_by_id("content"), Some(div));
        assert_eq!(doc.element_by_id("text-node-0"), Some(div));
        assert_eq!(doc.attribute(div, "id"), Some("text-node-0"));
    }

    #[test]
    fn text_nodes_reject_element_operations() {
        let (mut doc, _, p, _) = sample();
        let text = doc.children(p)[0];
        assert!(!doc.set_attribute(text, "id", "nope"));
        assert_eq!(doc.element_by_id("nope"), None);
        doc.set_style_property(text, "background", "red");
        assert_eq!(doc.style_property(text, "background"), None);
    }

    #[test]
    fn style_properties_set_and_remove() {
        let (mut doc, _, p, _) = sample();
        doc.set_style_property(p, "padding", "2px");
        assert_eq!(doc.style_property(p, "padding"), Some("2px"));
        doc.remove_style_property(p, "padding");
        assert_eq!(doc.style_property(p, "padding"), None);
    }
}
