//! Block-level rewrapping and alignment.

use super::{discard_units, partition_units};
use crate::range::{self, Position, SelectionRange};
use crate::{style, EditSession};
use richedit_markup::{NodeId, Tag};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }
}

impl EditSession {
    /// Turn the block around the selection into a `tag` block, or split a
    /// multi-line selection into one `tag` block per line
    pub fn wrap_block(&mut self, tag: Tag) {
        if self.rewrap_enclosing_block(&tag) || self.wrap_lines(&tag) {
            self.notify();
            return;
        }

        if self.selection().wrap(tag).is_some() {
            self.notify();
        }
    }

    pub fn paragraph(&mut self) {
        self.wrap_block(Tag::P);
    }

    /// Levels outside 1..=6 fall back to a top-level heading
    pub fn heading(&mut self, level: u8) {
        self.wrap_block(Tag::heading(level).unwrap_or(Tag::H1));
    }

    /// Set `text-align` on the block holding the selection anchor
    pub fn align(&mut self, alignment: Alignment) {
        let mut selection = self.selection();
        let region = selection.region();
        let Some(container) = selection.nearest_relevant_ancestor() else {
            return;
        };
        let tree = selection.tree_mut();
        let Some(block) = tree
            .closest(container, |tree, id| {
                id != region && tree.tag(id).is_some_and(Tag::is_indentable_block)
            })
            .filter(|&block| tree.is_inclusive_ancestor(region, block))
        else {
            tracing::debug!("[Block] no block to align");
            return;
        };

        style::set_style(tree, block, "text-align", alignment.as_str());
        self.notify();
    }

    /// Replace the closest rewrappable block with a `tag` element carrying
    /// the same attributes (minus `id`) and children
    fn rewrap_enclosing_block(&mut self, tag: &Tag) -> bool {
        let mut selection = self.selection();
        let region = selection.region();
        let start = selection.nearest_relevant_ancestor().unwrap_or(region);
        let Some(block) = find_rewrappable(selection.tree(), region, start) else {
            return false;
        };
        let spans_block_only = selection.current_range().is_some_and(|current| {
            let tree = selection.tree();
            range::common_ancestor(tree, current.start.node, current.end.node)
                .is_some_and(|ancestor| tree.is_inclusive_ancestor(block, ancestor))
        });
        if !spans_block_only {
            return false;
        }

        let tree = selection.tree_mut();
        let replacement = tree.create_element(tag.clone());
        let attributes: Vec<(String, String)> = tree
            .element(block)
            .map(|element| {
                element
                    .attributes
                    .iter()
                    .filter(|(name, _)| name.as_str() != "id")
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();
        for (name, value) in attributes {
            tree.set_attribute(replacement, name, value);
        }
        tree.move_children(block, replacement);

        let stored = selection.current_range();
        selection.tree_mut().replace_with(block, &[replacement]);

        if let Some(current) = stored {
            let remap = |position: Position| {
                if position.node == block {
                    Position::new(replacement, position.offset)
                } else {
                    position
                }
            };
            selection.set_range(SelectionRange::new(remap(current.start), remap(current.end)));
        }

        tracing::debug!("[Block] rewrapped block as <{}>", tag);
        true
    }

    /// Split a selection spanning several lines or blocks into one new
    /// block per line. Returns `false` when the selection is one line.
    fn wrap_lines(&mut self, tag: &Tag) -> bool {
        let mut selection = self.selection();
        if selection.is_collapsed() {
            return false;
        }
        let Some(copy) = selection.clone_contents() else {
            return false;
        };

        let tree = selection.tree_mut();
        let units = partition_units(tree, copy, Tag::is_rewrappable_block);
        if units.len() < 2 {
            discard_units(tree, units);
            tree.remove(copy);
            return false;
        }

        let blocks = tree.create_fragment();
        let count = units.len();
        for unit in units {
            let wrapper = tree.create_element(tag.clone());
            unit.move_into(tree, wrapper);
            tree.append_child(blocks, wrapper);
        }
        tree.remove(copy);

        tracing::debug!("[Block] splitting selection into {} <{}> blocks", count, tag);
        selection.insert_node(blocks).is_some()
    }
}

fn find_rewrappable(tree: &richedit_markup::Tree, region: NodeId, start: NodeId) -> Option<NodeId> {
    tree.closest(start, |tree, id| id == region || tree.tag(id).is_some_and(Tag::is_rewrappable_block))
        .filter(|&block| block != region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    fn session(markup: &str) -> EditSession {
        EditSession::new(Document::from_markup(markup))
    }

    #[test]
    fn test_heading_keeps_attributes_except_id() {
        let mut session = session(r#"<p id="a" class="c">x</p>"#);
        session.select_text(0, 1).unwrap();
        session.heading(2);
        assert_eq!(session.markup(), r#"<h2 class="c">x</h2>"#);
        assert_eq!(session.selected_text(), "x");
    }

    #[test]
    fn test_invalid_heading_level_is_h1() {
        let mut session = session("<p>x</p>");
        session.select_text(0, 1).unwrap();
        session.heading(9);
        assert_eq!(session.markup(), "<h1>x</h1>");
    }

    #[test]
    fn test_multi_line_selection_becomes_blocks() {
        let mut session = session("one<br>two<br><b>three</b>");
        session.select_all();
        session.paragraph();
        assert_eq!(session.markup(), "<p>one</p><p>two</p><p><b>three</b></p>");
    }

    #[test]
    fn test_selection_across_paragraphs_rewraps_each() {
        let mut session = session(r#"<p class="lead">one</p><p>two</p><p>three</p>"#);
        session.select_all();
        session.heading(1);
        assert_eq!(session.markup(), "<h1>one</h1><h1>two</h1><h1>three</h1>");
        assert_eq!(session.document.version, 1);
    }

    #[test]
    fn test_partial_selection_across_paragraphs() {
        let mut session = session("<p>one</p><p>two</p>");
        session.select_text(1, 5).unwrap();
        session.wrap_block(Tag::Blockquote);
        assert_eq!(
            session.markup(),
            "<p>o</p><blockquote>ne</blockquote><blockquote>tw</blockquote><p>o</p>"
        );
    }

    #[test]
    fn test_single_line_falls_back_to_wrap() {
        let mut session = session("loose text");
        session.select_text(0, 5).unwrap();
        session.wrap_block(Tag::H3);
        assert_eq!(session.markup(), "<h3>loose</h3> text");
    }

    #[test]
    fn test_align_block() {
        let mut session = session("<p>x</p>");
        session.select_text(0, 0).unwrap();
        session.align(Alignment::Center);
        assert_eq!(session.markup(), r#"<p style="text-align: center;">x</p>"#);

        let mut loose = self::session("x");
        loose.select_text(0, 0).unwrap();
        loose.align(Alignment::Right);
        assert_eq!(loose.markup(), "x");
        assert_eq!(loose.document.version, 0);
    }
}
