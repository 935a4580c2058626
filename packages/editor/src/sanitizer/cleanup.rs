//! Selection-scoped cleanup.
//!
//! The scope is picked by comparing whitespace-normalized text:
//!
//! 1. selection text equals the whole region → every child of the region
//! 2. otherwise, if the anchor's element holds less than the whole region
//!    → that element
//! 3. otherwise → the selected content itself
//!
//! The scope is moved into a scratch fragment, cleaned there and put back
//! where it came from.

use super::passes::CleanupPipeline;
use crate::range::Position;
use crate::selection::Selection;
use richedit_markup::{serialize_inner, NodeId, Tree};

/// Collapse whitespace runs to single spaces and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clean the current selection's scope. Returns the cleaned markup, or
/// `None` when there is no selection.
pub fn run(selection: &mut Selection<'_>, pipeline: &CleanupPipeline) -> Option<String> {
    let current = selection.current_range()?;
    let region = selection.region();

    let region_text = normalize_whitespace(&selection.tree().text_content(region));
    let selected_text = normalize_whitespace(&selection.text());

    if selected_text == region_text {
        tracing::debug!("[Cleanup] cleaning the whole region");
        let tree = selection.tree_mut();
        let scratch = tree.create_fragment();
        tree.move_children(region, scratch);
        let markup = clean(tree, scratch, pipeline);
        let inserted = tree.insert_nodes(region, 0, &[scratch]);
        collapse_after(selection, &inserted, Position::new(region, 0));
        return Some(markup);
    }

    if let Some(ancestor) = selection.nearest_relevant_ancestor() {
        if normalize_whitespace(&selection.tree().text_content(ancestor)) != region_text {
            tracing::debug!("[Cleanup] cleaning the anchor's element");
            let tree = selection.tree_mut();
            let parent = tree.parent(ancestor)?;
            let index = tree.index_in_parent(ancestor)?;
            let scratch = tree.create_fragment();
            tree.append_child(scratch, ancestor);
            let markup = clean(tree, scratch, pipeline);
            let inserted = tree.insert_nodes(parent, index, &[scratch]);
            collapse_after(selection, &inserted, Position::new(parent, index));
            return Some(markup);
        }
    }

    tracing::debug!("[Cleanup] cleaning the selected content");
    let scratch = selection.extract()?;
    let at = selection.anchor().unwrap_or(current.start);
    let tree = selection.tree_mut();
    let markup = clean(tree, scratch, pipeline);
    let inserted = crate::range::insert_node(tree, at, scratch);
    collapse_after(selection, &inserted, at);
    Some(markup)
}

fn clean(tree: &mut Tree, scratch: NodeId, pipeline: &CleanupPipeline) -> String {
    pipeline.run(tree, scratch);
    serialize_inner(tree, scratch)
}

fn collapse_after(selection: &mut Selection<'_>, inserted: &[NodeId], fallback: Position) {
    match inserted.last() {
        Some(&last) => selection.collapse_after(last),
        None => selection.collapse(fallback),
    }
}
