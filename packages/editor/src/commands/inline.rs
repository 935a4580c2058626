//! Inline formatting: toggling wrappers and styled spans.

use crate::formatting::InlineFormat;
use crate::range::{self, Position};
use crate::selection::{Replacement, Selection};
use crate::{style, EditSession};
use richedit_markup::{NodeId, Tag, Tree};

impl EditSession {
    /// Wrap the selection in `tag`, or lift it out of an enclosing `tag`
    pub fn toggle_inline_format(&mut self, tag: Tag) {
        let wrapper = tag.clone();
        self.toggle_matching(move |candidate| *candidate == tag, wrapper);
    }

    /// Like [`toggle_inline_format`](Self::toggle_inline_format), treating
    /// equivalent tags (`<b>`/`<strong>`, ...) as the same format
    pub fn toggle_format(&mut self, format: InlineFormat) {
        self.toggle_matching(move |candidate| format.matches(candidate), format.tag());
    }

    pub fn font_size(&mut self, px: u32) {
        self.wrap_styled("font-size", &format!("{}px", px));
    }

    pub fn text_color(&mut self, color: &str) {
        self.wrap_styled("color", color);
    }

    pub fn background_color(&mut self, color: &str) {
        self.wrap_styled("background-color", color);
    }

    fn toggle_matching(&mut self, matches: impl Fn(&Tag) -> bool, tag: Tag) {
        let mut selection = self.selection();
        let Some(current) = selection.current_range() else {
            return;
        };
        if current.is_collapsed() {
            return;
        }

        let enclosing = enclosing_match(&selection, &current.start, &current.end, &matches);
        let changed = if enclosing.is_some() || selected_is_single_match(&mut selection, &matches) {
            lift_out(&mut selection, enclosing, &matches)
        } else {
            selection.wrap(tag).is_some()
        };

        if changed {
            self.notify();
        }
    }

    fn wrap_styled(&mut self, property: &str, value: &str) {
        let mut selection = self.selection();
        if selection.is_collapsed() {
            return;
        }

        let span = selection.tree_mut().create_element(Tag::Span);
        style::set_style(selection.tree_mut(), span, property, value);

        let wrapped = match selection.surround(span) {
            Some(_) => true,
            None => selection
                .replace(|tree, fragment| {
                    tree.insert_nodes(span, 0, &[fragment]);
                    Replacement::Node(span)
                })
                .is_some(),
        };

        if wrapped {
            self.notify();
        }
    }
}

/// Nearest element around both ends of the range, when it matches and is
/// not the region
fn enclosing_match(
    selection: &Selection<'_>,
    start: &Position,
    end: &Position,
    matches: &impl Fn(&Tag) -> bool,
) -> Option<NodeId> {
    let tree = selection.tree();
    let ancestor = range::common_ancestor(tree, start.node, end.node)?;
    let element = range::container_element(tree, &Position::new(ancestor, 0))?;
    (element != selection.region() && tree.tag(element).is_some_and(matches)).then_some(element)
}

/// The selection is exactly one matching element
fn selected_is_single_match(selection: &mut Selection<'_>, matches: &impl Fn(&Tag) -> bool) -> bool {
    let Some(copy) = selection.clone_contents() else {
        return false;
    };
    let tree = selection.tree_mut();
    let single = match tree.children(copy) {
        [only] => tree.tag(*only).is_some_and(matches),
        _ => false,
    };
    tree.remove(copy);
    single
}

/// Pull the selected content out, strip one level of matching wrappers and
/// put it back, splitting an enclosing match around it
fn lift_out(selection: &mut Selection<'_>, enclosing: Option<NodeId>, matches: &impl Fn(&Tag) -> bool) -> bool {
    let Some(fragment) = selection.extract() else {
        return false;
    };
    let caret = selection.anchor();
    let tree = selection.tree_mut();

    for child in tree.children(fragment).to_vec() {
        if tree.tag(child).is_some_and(matches) {
            tree.unwrap(child);
        }
    }

    let inserted = match (enclosing, caret) {
        (Some(outer), Some(at)) if tree.contains(outer) && tree.is_inclusive_ancestor(outer, at.node) => {
            split_around(tree, outer, at, fragment, matches)
        }
        (_, Some(at)) => range::insert_node(tree, at, fragment),
        (_, None) => {
            tree.remove(fragment);
            Vec::new()
        }
    };

    tracing::debug!("[Format] lifted {} node(s) out of their wrapper", inserted.len());
    if let Some(&last) = inserted.last() {
        selection.collapse_after(last);
    }
    true
}

fn split_around(
    tree: &mut Tree,
    outer: NodeId,
    at: Position,
    fragment: NodeId,
    matches: &impl Fn(&Tag) -> bool,
) -> Vec<NodeId> {
    let Some(parent) = tree.parent(outer) else {
        return range::insert_node(tree, at, fragment);
    };
    let before = tree.children(parent).to_vec();
    let Some(index) = range::split_to(tree, parent, at) else {
        return range::insert_node(tree, at, fragment);
    };

    let tail = tree
        .children(parent)
        .get(index)
        .copied()
        .filter(|node| !before.contains(node));
    let inserted = tree.insert_nodes(parent, index, &[fragment]);

    for half in std::iter::once(outer).chain(tail) {
        if tree.tag(half).is_some_and(matches) && is_vacant(tree, half) {
            tree.remove(half);
        }
    }
    inserted
}

fn is_vacant(tree: &Tree, node: NodeId) -> bool {
    tree.text_content(node).is_empty()
        && !tree
            .descendants(node)
            .into_iter()
            .any(|id| tree.tag(id).is_some_and(|tag| tag.is_void() || *tag == Tag::Iframe))
}

#[cfg(test)]
mod tests {
    use crate::{Document, EditSession};
    use richedit_markup::Tag;

    fn session(markup: &str) -> EditSession {
        EditSession::new(Document::from_markup(markup))
    }

    #[test]
    fn test_toggle_wraps_then_unwraps() {
        let mut session = session("<p>Hello world</p>");
        session.select_text(6, 11).unwrap();
        session.toggle_inline_format(Tag::B);
        assert_eq!(session.markup(), "<p>Hello <b>world</b></p>");

        session.select_text(6, 11).unwrap();
        session.toggle_inline_format(Tag::B);
        assert_eq!(session.markup(), "<p>Hello world</p>");
    }

    #[test]
    fn test_partial_unwrap_splits_wrapper() {
        let mut session = session("<p><b>world</b></p>");
        session.select_text(1, 3).unwrap();
        session.toggle_inline_format(Tag::B);
        assert_eq!(session.markup(), "<p><b>w</b>or<b>ld</b></p>");
    }

    #[test]
    fn test_collapsed_selection_is_noop() {
        let mut session = session("<p>Hello</p>");
        session.select_text(2, 2).unwrap();
        session.toggle_inline_format(Tag::I);
        assert_eq!(session.markup(), "<p>Hello</p>");
        assert_eq!(session.document.version, 0);
    }

    #[test]
    fn test_format_group_unwraps_strong() {
        let mut session = session("<p><strong>x</strong>y</p>");
        session.select_text(0, 1).unwrap();
        session.toggle_format(crate::InlineFormat::Bold);
        assert_eq!(session.markup(), "<p>xy</p>");
    }

    #[test]
    fn test_styled_span_around_selection() {
        let mut session = session("<p>Hello world</p>");
        session.select_text(0, 5).unwrap();
        session.text_color("red");
        assert_eq!(session.markup(), r#"<p><span style="color: red;">Hello</span> world</p>"#);

        let mut session = self::session("<p><b>ab</b>cd</p>");
        session.select_text(1, 3).unwrap();
        session.font_size(18);
        assert_eq!(
            session.markup(),
            r#"<p><b>a</b><span style="font-size: 18px;"><b>b</b>c</span>d</p>"#
        );
    }
}
