//! Indentation.
//!
//! Ordinary blocks move by `indent_step_px` of left margin, never below
//! zero. Editable containers (the region itself, or a block that is
//! `contenteditable`) get leading non-breaking spaces instead, since a
//! margin there would shift the whole editing surface.

use crate::range::{Position, SelectionRange};
use crate::{style, EditSession};
use richedit_markup::{NodeId, Tag, Tree};

impl EditSession {
    pub fn change_indent(&mut self, increase: bool) {
        let step = i64::from(self.config.indent_step_px);
        let nested_indent = self.config.nested_indent.clone();

        let mut selection = self.selection();
        let Some(anchor) = selection.anchor() else {
            return;
        };
        let region = selection.region();
        let tree = selection.tree_mut();

        let block = tree
            .closest(anchor.node, |tree, id| {
                id == region || tree.tag(id).is_some_and(Tag::is_indentable_block)
            })
            .unwrap_or(region);

        let mut caret = anchor;
        let editable = block == region
            || tree
                .attribute(block, "contenteditable")
                .is_some_and(|value| value != "false");

        if editable {
            if increase {
                let spaces = tree.create_text(nested_indent.as_str());
                tree.insert_child(block, 0, spaces);
                if caret.node == block {
                    caret.offset += 1;
                }
            } else if !strip_leading_indent(tree, block, &nested_indent, &mut caret) {
                tracing::debug!("[Indent] nothing to outdent");
                return;
            }
        } else {
            let current = match style::get_style(tree, block, "margin-left") {
                None => 0,
                Some(value) => match style::pixels(&value) {
                    Some(px) => px,
                    None => {
                        tracing::debug!("[Indent] leaving non-pixel margin {:?} alone", value);
                        return;
                    }
                },
            };
            let next = if increase {
                current.saturating_add(step)
            } else {
                current.saturating_sub(step)
            }
            .max(0);
            style::set_style(tree, block, "margin-left", &format!("{}px", next));
        }

        if tree.contains(caret.node) && tree.is_inclusive_ancestor(region, caret.node) {
            caret.offset = caret.offset.min(tree.node_length(caret.node));
            selection.set_range(SelectionRange::collapsed(caret));
        } else {
            selection.clear();
        }
        self.notify();
    }
}

/// Remove one indent unit from the front of the block's first text child
fn strip_leading_indent(tree: &mut Tree, block: NodeId, indent: &str, caret: &mut Position) -> bool {
    let Some(first) = tree.children(block).iter().copied().find(|&id| tree.is_text(id)) else {
        return false;
    };
    let Some(rest) = tree.text(first).and_then(|text| text.strip_prefix(indent)).map(str::to_string) else {
        return false;
    };

    tree.set_text(first, rest);
    if caret.node == first {
        caret.offset = caret.offset.saturating_sub(indent.chars().count());
    }
    true
}
