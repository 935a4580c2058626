//! List toggling.
//!
//! Inside a list of the requested kind the list is dissolved into
//! paragraphs; inside a list of the other kind it is converted; anywhere
//! else the selection becomes a new list.

use super::{discard_units, partition_units, BlockUnit};
use crate::range::Position;
use crate::selection::Selection;
use crate::EditSession;
use richedit_markup::{NodeId, Tag, Tree};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListStyle {
    #[default]
    Disc,
    LowerAlpha,
    Decimal,
}

impl ListStyle {
    /// Class list put on a new or converted list
    pub fn classes(self) -> &'static str {
        match self {
            ListStyle::Disc => "list-disc list-inside",
            ListStyle::LowerAlpha => "list-lower-alpha list-inside",
            ListStyle::Decimal => "list-decimal list-inside",
        }
    }
}

impl EditSession {
    pub fn toggle_list(&mut self, tag: Tag, style: ListStyle) {
        if !tag.is_list() {
            tracing::debug!("[List] <{}> is not a list tag", tag);
            return;
        }

        let mut selection = self.selection();
        let region = selection.region();
        let start = selection.nearest_relevant_ancestor().unwrap_or(region);
        let enclosing = selection
            .tree()
            .closest(start, |tree, id| id == region || tree.tag(id).is_some_and(Tag::is_list))
            .filter(|&list| list != region);

        let changed = match enclosing {
            Some(list) if selection.tree().tag(list) == Some(&tag) => dissolve(&mut selection, list),
            Some(list) => convert(&mut selection, list, tag, style),
            None => create(&mut selection, start, tag, style),
        };

        if changed {
            self.notify();
        }
    }
}

/// Every item becomes a paragraph holding the item's children
fn dissolve(selection: &mut Selection<'_>, list: NodeId) -> bool {
    let tree = selection.tree_mut();
    let mut paragraphs = Vec::new();
    for item in tree.children(list).to_vec() {
        if tree.text(item).is_some_and(|text| text.trim().is_empty()) {
            continue;
        }
        let paragraph = tree.create_element(Tag::P);
        if tree.tag(item) == Some(&Tag::Li) {
            tree.move_children(item, paragraph);
        } else {
            tree.append_child(paragraph, item);
        }
        paragraphs.push(paragraph);
    }

    tracing::debug!("[List] dissolving list into {} paragraph(s)", paragraphs.len());
    let inserted = tree.replace_with(list, &paragraphs);
    keep_or_collapse_after(selection, inserted.last().copied());
    true
}

fn convert(selection: &mut Selection<'_>, list: NodeId, tag: Tag, style: ListStyle) -> bool {
    let tree = selection.tree_mut();
    let converted = new_list(tree, tag, style);
    tree.move_children(list, converted);
    tree.replace_with(list, &[converted]);
    keep_or_collapse_after(selection, Some(converted));
    true
}

fn create(selection: &mut Selection<'_>, start: NodeId, tag: Tag, style: ListStyle) -> bool {
    if selection.current_range().is_none() {
        return false;
    }
    let region = selection.region();

    let units = match selection.clone_contents() {
        Some(copy) => {
            let tree = selection.tree_mut();
            let units = partition_units(tree, copy, |tag| matches!(tag, Tag::P | Tag::Div));
            Some((copy, units))
        }
        None => None,
    };

    let single_line = match &units {
        Some((_, units)) => units.is_empty() || matches!(units.as_slice(), [BlockUnit::Inline(_)]),
        None => true,
    };

    if single_line {
        let tree = selection.tree_mut();
        if let Some((copy, units)) = units {
            discard_units(tree, units);
            tree.remove(copy);
        }

        let block = tree
            .closest(start, |tree, id| {
                id == region || matches!(tree.tag(id), Some(Tag::P | Tag::Li | Tag::Div))
            })
            .unwrap_or(region);
        let list = new_list(tree, tag, style);
        let item = tree.create_element(Tag::Li);
        tree.append_child(list, item);
        tree.move_children(block, item);

        if block == region {
            tree.append_child(region, list);
        } else {
            tree.replace_with(block, &[list]);
        }
        tracing::debug!("[List] turned the current line into a list");
        keep_or_collapse_after(selection, Some(list));
        return true;
    }

    let Some((copy, units)) = units else {
        return false;
    };
    let tree = selection.tree_mut();
    let list = new_list(tree, tag, style);
    let count = units.len();
    for unit in units {
        let item = tree.create_element(Tag::Li);
        unit.move_into(tree, item);
        tree.append_child(list, item);
    }
    tree.remove(copy);

    tracing::debug!("[List] building a list of {} item(s)", count);
    selection.insert_node(list).is_some()
}

fn new_list(tree: &mut Tree, tag: Tag, style: ListStyle) -> NodeId {
    let list = tree.create_element(tag);
    tree.set_attribute(list, "class", style.classes());
    list
}

/// Leave the selection alone when it survived the restructuring
fn keep_or_collapse_after(selection: &mut Selection<'_>, node: Option<NodeId>) {
    if selection.current_range().is_some() {
        return;
    }
    match node {
        Some(node) => selection.collapse_after(node),
        None => selection.collapse(Position::new(selection.region(), 0)),
    }
}
