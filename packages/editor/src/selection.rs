//! # Selection
//!
//! The ambient selection of one editing session, anchored into the tree.
//!
//! A [`Selection`] borrows the tree, the editable region and the session's
//! range slot for the duration of one operation. Every primitive re-derives
//! the range before use and leaves a well-defined range behind, usually
//! collapsed right after whatever it inserted.

use crate::range::{self, Position, SelectionRange};
use richedit_markup::{parse_fragment, NodeId, Tree};

/// What a [`Selection::replace`] transform hands back
#[derive(Debug, Clone)]
pub enum Replacement {
    /// Fragment whose children are spliced in
    Fragment(NodeId),
    Node(NodeId),
    Text(String),
}

pub struct Selection<'a> {
    tree: &'a mut Tree,
    region: NodeId,
    range: &'a mut Option<SelectionRange>,
}

impl<'a> Selection<'a> {
    pub fn new(tree: &'a mut Tree, region: NodeId, range: &'a mut Option<SelectionRange>) -> Self {
        Self { tree, region, range }
    }

    pub fn tree(&self) -> &Tree {
        &*self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut *self.tree
    }

    pub fn region(&self) -> NodeId {
        self.region
    }

    /// The active range, or `None` when nothing is selected or the stored
    /// range points at nodes that are gone or outside the region
    pub fn current_range(&self) -> Option<SelectionRange> {
        let stored = (*self.range)?;
        range::normalize(&*self.tree, self.region, &stored)
    }

    /// An absent selection counts as collapsed
    pub fn is_collapsed(&self) -> bool {
        self.current_range().map_or(true, |r| r.is_collapsed())
    }

    pub fn anchor(&self) -> Option<Position> {
        self.current_range().map(|r| r.start)
    }

    /// Element holding the anchor, unless that element is the region itself
    pub fn nearest_relevant_ancestor(&self) -> Option<NodeId> {
        let anchor = self.anchor()?;
        let element = range::container_element(&*self.tree, &anchor)?;
        if element == self.region || !self.tree.is_inclusive_ancestor(self.region, element) {
            None
        } else {
            Some(element)
        }
    }

    pub fn set_range(&mut self, range: SelectionRange) {
        *self.range = Some(range);
    }

    pub fn collapse(&mut self, at: Position) {
        *self.range = Some(SelectionRange::collapsed(at));
    }

    pub fn clear(&mut self) {
        *self.range = None;
    }

    /// Collapse right after `node`, or clear when it is detached
    pub fn collapse_after(&mut self, node: NodeId) {
        match Position::after(&*self.tree, node) {
            Some(at) => self.collapse(at),
            None => self.clear(),
        }
    }

    fn collapse_after_all(&mut self, inserted: &[NodeId], fallback: Position) {
        match inserted.last() {
            Some(&last) => self.collapse_after(last),
            None => self.collapse(fallback),
        }
    }

    /// Text of the selected content
    pub fn text(&mut self) -> String {
        match self.current_range() {
            Some(current) => range::range_text(self.tree, &current),
            None => String::new(),
        }
    }

    /// Detached copy of the selected content
    pub fn clone_contents(&mut self) -> Option<NodeId> {
        let current = self.current_range()?;
        range::clone_contents(self.tree, &current)
    }

    /// Move the selected content out into a fragment. The selection is
    /// collapsed where the content was.
    pub fn extract(&mut self) -> Option<NodeId> {
        let current = self.current_range()?;
        let (fragment, at) = range::extract_contents(self.tree, &current)?;
        self.collapse(at);
        Some(fragment)
    }

    /// Delete the selected content and collapse in its place
    pub fn delete(&mut self) -> Option<Position> {
        let current = self.current_range()?;
        let at = range::delete_contents(self.tree, &current)?;
        self.collapse(at);
        Some(at)
    }

    /// Wrap the selected content in a new `tag` element, collapsing after it
    pub fn wrap(&mut self, tag: richedit_markup::Tag) -> Option<NodeId> {
        let current = self.current_range()?;
        if current.is_collapsed() {
            return None;
        }
        let (fragment, at) = range::extract_contents(self.tree, &current)?;
        let wrapper = self.tree.create_element(tag);
        self.tree.insert_nodes(wrapper, 0, &[fragment]);
        range::insert_node(self.tree, at, wrapper);
        self.collapse_after(wrapper);
        Some(wrapper)
    }

    /// Replace the selection with parsed markup, collapsing after it
    pub fn insert(&mut self, markup: &str) -> Option<Vec<NodeId>> {
        let fragment = parse_fragment(self.tree, markup);
        let inserted = self.insert_node(fragment);
        if inserted.is_none() {
            self.tree.remove(fragment);
        }
        inserted
    }

    /// Replace the selection with a pre-built node or fragment
    pub fn insert_node(&mut self, node: NodeId) -> Option<Vec<NodeId>> {
        let current = self.current_range()?;
        let at = range::delete_contents(self.tree, &current)?;
        let inserted = range::insert_node(self.tree, at, node);
        self.collapse_after_all(&inserted, at);
        Some(inserted)
    }

    /// Insert at the start of the selection without deleting anything
    pub fn insert_at_start(&mut self, node: NodeId) -> Option<Vec<NodeId>> {
        let current = self.current_range()?;
        let inserted = range::insert_node(self.tree, current.start, node);
        self.collapse_after_all(&inserted, current.start);
        Some(inserted)
    }

    /// Wrap the exact selected range in `wrapper` and select its contents.
    ///
    /// Returns `None` when the range crosses a partial element boundary, so
    /// the caller can fall back to extract and insert.
    pub fn surround(&mut self, wrapper: NodeId) -> Option<NodeId> {
        let current = self.current_range().filter(|r| !r.is_collapsed())?;
        match range::surround_contents(self.tree, &current, wrapper) {
            Some(node) => {
                let contents = SelectionRange::node_contents(&*self.tree, node);
                self.set_range(contents);
                Some(node)
            }
            None => {
                tracing::warn!("[Selection] selection cannot be surrounded atomically");
                None
            }
        }
    }

    /// Extract the selection, hand it to `transform` and insert the result
    /// in its place, collapsing after it
    pub fn replace<F>(&mut self, transform: F) -> Option<Vec<NodeId>>
    where
        F: FnOnce(&mut Tree, NodeId) -> Replacement,
    {
        let current = self.current_range()?;
        let (fragment, at) = range::extract_contents(self.tree, &current)?;
        let node = match transform(&mut *self.tree, fragment) {
            Replacement::Fragment(node) | Replacement::Node(node) => node,
            Replacement::Text(text) => self.tree.create_text(text),
        };
        let inserted = range::insert_node(self.tree, at, node);
        if self.tree.contains(fragment) && self.tree.parent(fragment).is_none() && fragment != node {
            self.tree.remove(fragment);
        }
        self.collapse_after_all(&inserted, at);
        Some(inserted)
    }
}

/// Resolve a character offset over the text of `root` to a text position.
///
/// At a boundary between two text nodes `prefer_following` picks the start
/// of the next node instead of the end of the previous one. A root without
/// text resolves to `(root, 0)` for offset zero.
pub fn locate_text_offset(
    tree: &Tree,
    root: NodeId,
    offset: usize,
    prefer_following: bool,
) -> Option<Position> {
    let texts: Vec<NodeId> = tree
        .descendants(root)
        .into_iter()
        .filter(|&id| tree.is_text(id))
        .collect();

    let mut consumed = 0;
    let mut fallback = None;
    for &text in &texts {
        let length = tree.node_length(text);
        let end = consumed + length;
        if offset < end || (offset == end && !prefer_following) {
            if offset >= consumed {
                return Some(Position::new(text, offset - consumed));
            }
        }
        if offset == end {
            fallback = Some(Position::new(text, length));
        }
        consumed = end;
    }

    match fallback {
        Some(position) => Some(position),
        None if offset == 0 => Some(Position::new(root, 0)),
        None => None,
    }
}
