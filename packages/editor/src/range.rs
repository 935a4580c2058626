//! # Range Primitives
//!
//! Boundary-point ranges over a [`Tree`] and the structural operations the
//! selection layer is built from: extract, clone, delete, insert and
//! surround.
//!
//! ## Design
//!
//! - A [`Position`] is `(node, offset)`; the offset counts characters in a
//!   text node and children in an element
//! - Extraction splits the tree at both boundaries up to the common
//!   ancestor and then detaches the whole children in between, so partially
//!   selected elements are duplicated the same way a browser range would
//! - Split halves that would be empty are never created
//! - Nothing here reads the ambient selection; callers pass normalized
//!   ranges in and receive the post-edit position back

use richedit_markup::{NodeId, Tree};
use std::cmp::Ordering;
use std::collections::HashSet;

/// A boundary point inside the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub node: NodeId,
    pub offset: usize,
}

impl Position {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }

    /// The point just before `node` in its parent
    pub fn before(tree: &Tree, node: NodeId) -> Option<Self> {
        Some(Self::new(tree.parent(node)?, tree.index_in_parent(node)?))
    }

    /// The point just after `node` in its parent
    pub fn after(tree: &Tree, node: NodeId) -> Option<Self> {
        Some(Self::new(tree.parent(node)?, tree.index_in_parent(node)? + 1))
    }

    /// Sort key: child-index path to the node followed by the offset.
    /// Lexicographic comparison of keys is document order.
    fn key(&self, tree: &Tree, root: NodeId) -> Option<Vec<usize>> {
        let mut key = tree.path_from(root, self.node)?;
        key.push(self.offset);
        Some(key)
    }
}

/// Ordered pair of positions; collapsed when both are equal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: Position,
    pub end: Position,
}

impl SelectionRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn collapsed(at: Position) -> Self {
        Self { start: at, end: at }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Range spanning all children of `node`
    pub fn node_contents(tree: &Tree, node: NodeId) -> Self {
        Self::new(Position::new(node, 0), Position::new(node, tree.node_length(node)))
    }
}

/// Document order of two positions under `root`
pub fn compare(tree: &Tree, root: NodeId, a: &Position, b: &Position) -> Option<Ordering> {
    if a.node == b.node {
        return Some(a.offset.cmp(&b.offset));
    }
    Some(a.key(tree, root)?.cmp(&b.key(tree, root)?))
}

/// Validate a range against `root`: both endpoints must be live nodes
/// inside `root`, offsets are clamped and a backwards range is reordered.
pub fn normalize(tree: &Tree, root: NodeId, range: &SelectionRange) -> Option<SelectionRange> {
    let clamp = |position: &Position| -> Option<Position> {
        if !tree.contains(position.node) || !tree.is_inclusive_ancestor(root, position.node) {
            return None;
        }
        Some(Position::new(
            position.node,
            position.offset.min(tree.node_length(position.node)),
        ))
    };

    let start = clamp(&range.start)?;
    let end = clamp(&range.end)?;
    match compare(tree, root, &start, &end)? {
        Ordering::Greater => Some(SelectionRange::new(end, start)),
        _ => Some(SelectionRange::new(start, end)),
    }
}

/// Deepest node that is an inclusive ancestor of both `a` and `b`
pub fn common_ancestor(tree: &Tree, a: NodeId, b: NodeId) -> Option<NodeId> {
    let chain: HashSet<NodeId> = std::iter::once(a).chain(tree.ancestors(a)).collect();
    std::iter::once(b)
        .chain(tree.ancestors(b))
        .find(|candidate| chain.contains(candidate))
}

/// Element that directly holds a position: the parent of a text node, the
/// node itself otherwise
pub fn container_element(tree: &Tree, position: &Position) -> Option<NodeId> {
    if tree.is_text(position.node) {
        tree.parent(position.node)
    } else {
        Some(position.node)
    }
}

/// Split the tree at `position` up to `ancestor` and return the index among
/// `ancestor`'s children where the split point now lies.
pub fn split_to(tree: &mut Tree, ancestor: NodeId, position: Position) -> Option<usize> {
    let (mut container, mut index) = if tree.is_text(position.node) && position.node != ancestor {
        let text = position.node;
        let parent = tree.parent(text)?;
        let at = tree.index_in_parent(text)?;
        let length = tree.node_length(text);
        if position.offset == 0 {
            (parent, at)
        } else if position.offset >= length {
            (parent, at + 1)
        } else {
            tree.split_text(text, position.offset)?;
            (parent, at + 1)
        }
    } else {
        (position.node, position.offset)
    };

    while container != ancestor {
        let parent = tree.parent(container)?;
        let at = tree.index_in_parent(container)?;
        let length = tree.children(container).len();

        if index == 0 {
            index = at;
        } else if index >= length {
            index = at + 1;
        } else {
            let tail = tree.shallow_clone(container)?;
            for child in tree.children(container)[index..].to_vec() {
                tree.append_child(tail, child);
            }
            tree.insert_after(container, tail);
            index = at + 1;
        }
        container = parent;
    }

    Some(index)
}

/// Move the range's content into a new fragment.
///
/// Returns the fragment and the collapsed position where the content was.
pub fn extract_contents(tree: &mut Tree, range: &SelectionRange) -> Option<(NodeId, Position)> {
    let SelectionRange { start, end } = *range;
    let fragment = tree.create_fragment();

    if range.is_collapsed() {
        return Some((fragment, start));
    }

    if start.node == end.node {
        if let Some(text) = tree.text(start.node) {
            let chars: Vec<char> = text.chars().collect();
            let from = start.offset.min(chars.len());
            let to = end.offset.min(chars.len()).max(from);
            let middle: String = chars[from..to].iter().collect();
            let rest: String = chars[..from].iter().chain(&chars[to..]).collect();
            tree.set_text(start.node, rest);
            let piece = tree.create_text(middle);
            tree.append_child(fragment, piece);
        } else {
            let children = tree.children(start.node);
            let to = end.offset.min(children.len());
            let taken = children[start.offset.min(to)..to].to_vec();
            for child in taken {
                tree.append_child(fragment, child);
            }
        }
        return Some((fragment, start));
    }

    let ancestor = common_ancestor(tree, start.node, end.node)?;

    // The end side goes first so the start side's ids stay untouched.
    let end_index = split_to(tree, ancestor, end)?;
    let end_after = tree.children(ancestor).get(end_index).copied();
    let start_index = split_to(tree, ancestor, start)?;
    let end_index = match end_after {
        Some(node) => tree.index_in_parent(node)?,
        None => tree.children(ancestor).len(),
    };

    let contained = tree.children(ancestor)[start_index..end_index.max(start_index)].to_vec();
    for node in contained {
        tree.append_child(fragment, node);
    }

    Some((fragment, Position::new(ancestor, start_index)))
}

/// Detached copy of the range's content; the tree keeps its structure
pub fn clone_contents(tree: &mut Tree, range: &SelectionRange) -> Option<NodeId> {
    let ancestor = common_ancestor(tree, range.start.node, range.end.node)?;
    let (copy, map) = tree.clone_with_map(ancestor)?;

    let mapped = SelectionRange::new(
        Position::new(*map.get(&range.start.node)?, range.start.offset),
        Position::new(*map.get(&range.end.node)?, range.end.offset),
    );
    let extracted = extract_contents(tree, &mapped);
    tree.remove(copy);
    extracted.map(|(fragment, _)| fragment)
}

/// Remove the range's content, returning the collapsed position left behind
pub fn delete_contents(tree: &mut Tree, range: &SelectionRange) -> Option<Position> {
    let (fragment, at) = extract_contents(tree, range)?;
    tree.remove(fragment);
    Some(at)
}

/// Insert `node` (a fragment is spliced) at `position`. Text nodes are split
/// when the position falls inside them. Returns the inserted top-level nodes.
pub fn insert_node(tree: &mut Tree, position: Position, node: NodeId) -> Vec<NodeId> {
    if tree.is_text(position.node) {
        let Some(parent) = tree.parent(position.node) else {
            return Vec::new();
        };
        let Some(at) = tree.index_in_parent(position.node) else {
            return Vec::new();
        };
        let index = if position.offset == 0 {
            at
        } else {
            if position.offset < tree.node_length(position.node) {
                tree.split_text(position.node, position.offset);
            }
            at + 1
        };
        tree.insert_nodes(parent, index, &[node])
    } else {
        tree.insert_nodes(position.node, position.offset, &[node])
    }
}

/// Move the range's content into `wrapper` and put `wrapper` in its place.
///
/// Fails when the range partially covers an element (its endpoints sit in
/// different containers), leaving the tree untouched.
pub fn surround_contents(tree: &mut Tree, range: &SelectionRange, wrapper: NodeId) -> Option<NodeId> {
    let start_container = container_element(tree, &range.start)?;
    let end_container = container_element(tree, &range.end)?;
    if start_container != end_container || !tree.is_element(wrapper) {
        return None;
    }

    for child in tree.children(wrapper).to_vec() {
        tree.remove(child);
    }
    let (fragment, at) = extract_contents(tree, range)?;
    tree.insert_nodes(wrapper, 0, &[fragment]);
    insert_node(tree, at, wrapper);
    Some(wrapper)
}

/// Text covered by the range
pub fn range_text(tree: &mut Tree, range: &SelectionRange) -> String {
    match clone_contents(tree, range) {
        Some(fragment) => {
            let text = tree.text_content(fragment);
            tree.remove(fragment);
            text
        }
        None => String::new(),
    }
}
