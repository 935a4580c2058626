//! # Content Tree
//!
//! Arena-backed tree of elements and text nodes.
//!
//! ## Design
//!
//! - Nodes live in a slot vector and are addressed by [`NodeId`]
//! - Slots are never reused, so an id that outlives its node stays dead
//!   instead of aliasing a newer node (`contains` is the liveness check)
//! - Every node has at most one parent; parents own the ordering of their
//!   children
//! - Fragments are parentless containers used to carry detached content
//!   between operations; inserting a fragment splices its children
//!
//! All walks are iterative so deeply nested input cannot exhaust the stack.

use crate::tag::Tag;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Stable identifier of a node inside a [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Element payload: tag plus ordered attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: Tag,
    pub attributes: IndexMap<String, String>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attributes: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(Element),
    Text(String),
    /// Detached container for extracted or parsed content
    Fragment,
}

#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Editable content tree
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Option<Node>>,
    root: NodeId,
}

impl Tree {
    /// Create a tree whose root is an empty element of `tag`
    pub fn new(tag: Tag) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.alloc(NodeKind::Element(Element::new(tag)));
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node {
            kind,
            parent: None,
            children: Vec::new(),
        }));
        id
    }

    pub fn create_element(&mut self, tag: Tag) -> NodeId {
        self.alloc(NodeKind::Element(Element::new(tag)))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text(text.into()))
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.alloc(NodeKind::Fragment)
    }

    // ----- Reading -----

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(|slot| slot.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    /// Whether the node still exists (it may be detached)
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|n| &n.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.kind(id) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.get_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&Tag> {
        self.element(id).map(|el| &el.tag)
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Text(_)))
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Element(_)))
    }

    pub fn is_fragment(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Fragment))
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)
            .and_then(|el| el.attributes.get(name))
            .map(String::as_str)
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// DOM-style node length: characters for text, child count otherwise
    pub fn node_length(&self, id: NodeId) -> usize {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => text.chars().count(),
            Some(_) => self.children(id).len(),
            None => 0,
        }
    }

    /// Proper ancestors, nearest first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// True when `ancestor` is `id` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Nearest inclusive ancestor satisfying `predicate`
    pub fn closest(&self, id: NodeId, mut predicate: impl FnMut(&Tree, NodeId) -> bool) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&candidate| predicate(self, candidate))
    }

    /// Descendants in document order (excluding `id`)
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        out
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.text(id) {
            return text.to_string();
        }
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(text) = self.text(node) {
                out.push_str(text);
            }
        }
        out
    }

    /// Child indices from `ancestor` down to `id`
    pub fn path_from(&self, ancestor: NodeId, id: NodeId) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        let mut current = id;
        while current != ancestor {
            path.push(self.index_in_parent(current)?);
            current = self.parent(current)?;
        }
        path.reverse();
        Some(path)
    }

    // ----- Mutation -----

    /// Detach a node from its parent, keeping it alive
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(node) = self.get_mut(parent) {
            node.children.retain(|&c| c != id);
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = None;
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.children(parent).len();
        self.insert_child(parent, index, child);
    }

    /// Insert `child` at `index` (clamped) under `parent`, detaching it first
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) || self.would_cycle(parent, child) {
            return;
        }
        self.detach(child);
        if let Some(node) = self.get_mut(parent) {
            let index = index.min(node.children.len());
            node.children.insert(index, child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
    }

    fn would_cycle(&self, parent: NodeId, child: NodeId) -> bool {
        child == parent || (!self.children(child).is_empty() && self.is_inclusive_ancestor(child, parent))
    }

    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) {
        if let (Some(parent), Some(index)) = (self.parent(reference), self.index_in_parent(reference)) {
            self.insert_child(parent, index, node);
        }
    }

    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        if let (Some(parent), Some(index)) = (self.parent(reference), self.index_in_parent(reference)) {
            self.insert_child(parent, index + 1, node);
        }
    }

    /// Insert nodes in order starting at `index`; fragments are spliced and
    /// freed. Returns the nodes that ended up in `parent`.
    pub fn insert_nodes(&mut self, parent: NodeId, index: usize, nodes: &[NodeId]) -> Vec<NodeId> {
        let mut inserted = Vec::new();
        let mut at = index.min(self.children(parent).len());
        for &node in nodes {
            if self.is_fragment(node) {
                let children = self.children(node).to_vec();
                for child in children {
                    self.insert_child(parent, at, child);
                    inserted.push(child);
                    at += 1;
                }
                self.remove(node);
            } else {
                self.insert_child(parent, at, node);
                inserted.push(node);
                at += 1;
            }
        }
        inserted
    }

    /// Detach a node and free it together with its subtree
    pub fn remove(&mut self, id: NodeId) {
        self.detach(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(next.0).and_then(Option::take) {
                stack.extend(node.children);
            }
        }
    }

    /// Replace an element with its children. Returns the lifted children.
    pub fn unwrap(&mut self, id: NodeId) -> Vec<NodeId> {
        let (Some(parent), Some(index)) = (self.parent(id), self.index_in_parent(id)) else {
            return Vec::new();
        };
        let children = self.children(id).to_vec();
        for (offset, &child) in children.iter().enumerate() {
            self.insert_child(parent, index + 1 + offset, child);
        }
        self.remove(id);
        children
    }

    /// Put `replacements` where `old` was, then free `old`
    pub fn replace_with(&mut self, old: NodeId, replacements: &[NodeId]) -> Vec<NodeId> {
        let (Some(parent), Some(index)) = (self.parent(old), self.index_in_parent(old)) else {
            return Vec::new();
        };
        self.detach(old);
        let inserted = self.insert_nodes(parent, index, replacements);
        self.remove(old);
        inserted
    }

    /// Move every child of `from` to the end of `to`
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        for child in self.children(from).to_vec() {
            self.append_child(to, child);
        }
    }

    pub fn set_text(&mut self, id: NodeId, value: impl Into<String>) {
        if let Some(Node {
            kind: NodeKind::Text(text),
            ..
        }) = self.get_mut(id)
        {
            *text = value.into();
        }
    }

    pub fn set_attribute(&mut self, id: NodeId, name: impl Into<String>, value: impl Into<String>) {
        if let Some(el) = self.element_mut(id) {
            el.attributes.insert(name.into(), value.into());
        }
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.element_mut(id)
            .and_then(|el| el.attributes.shift_remove(name))
    }

    pub fn clear_attributes(&mut self, id: NodeId) {
        if let Some(el) = self.element_mut(id) {
            el.attributes.clear();
        }
    }

    /// Split a text node at a character offset. The original keeps the head;
    /// the returned node holds the tail and sits right after it.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Option<NodeId> {
        let text = self.text(id)?;
        let at = byte_offset(text, offset);
        let tail = text[at..].to_string();
        let head = text[..at].to_string();
        self.set_text(id, head);
        let tail_node = self.create_text(tail);
        if self.parent(id).is_some() {
            self.insert_after(id, tail_node);
        }
        Some(tail_node)
    }

    /// Copy of a node without its children
    pub fn shallow_clone(&mut self, id: NodeId) -> Option<NodeId> {
        let kind = self.kind(id)?.clone();
        Some(self.alloc(kind))
    }

    /// Detached copy of a whole subtree
    pub fn deep_clone(&mut self, id: NodeId) -> Option<NodeId> {
        self.clone_with_map(id).map(|(copy, _)| copy)
    }

    /// Detached copy of a subtree plus the original-to-copy id mapping
    pub fn clone_with_map(&mut self, id: NodeId) -> Option<(NodeId, HashMap<NodeId, NodeId>)> {
        let copy = self.shallow_clone(id)?;
        let mut map = HashMap::new();
        map.insert(id, copy);
        let mut stack = vec![(id, copy)];
        while let Some((source, target)) = stack.pop() {
            for child in self.children(source).to_vec() {
                if let Some(child_copy) = self.shallow_clone(child) {
                    self.append_child(target, child_copy);
                    map.insert(child, child_copy);
                    stack.push((child, child_copy));
                }
            }
        }
        Some((copy, map))
    }
}

/// Iterator over proper ancestors
pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Byte index of a character offset, clamped to the string length
pub fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}
