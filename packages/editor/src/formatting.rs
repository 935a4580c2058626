//! Inline formats and toolbar state.
//!
//! Whether a format is active is read straight off the tree: a format is on
//! when an equivalent element sits between the selection anchor and the
//! editable region.

use richedit_markup::{NodeId, Tag, Tree};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InlineFormat {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Superscript,
    Subscript,
}

impl InlineFormat {
    /// Tag used when applying the format
    pub fn tag(self) -> Tag {
        match self {
            InlineFormat::Bold => Tag::B,
            InlineFormat::Italic => Tag::I,
            InlineFormat::Underline => Tag::U,
            InlineFormat::Strikethrough => Tag::S,
            InlineFormat::Superscript => Tag::Sup,
            InlineFormat::Subscript => Tag::Sub,
        }
    }

    /// Whether `tag` expresses this format
    pub fn matches(self, tag: &Tag) -> bool {
        match self {
            InlineFormat::Bold => matches!(tag, Tag::B | Tag::Strong),
            InlineFormat::Italic => matches!(tag, Tag::I | Tag::Em),
            InlineFormat::Underline => matches!(tag, Tag::U),
            InlineFormat::Strikethrough => matches!(tag, Tag::S | Tag::Strike | Tag::Del),
            InlineFormat::Superscript => matches!(tag, Tag::Sup),
            InlineFormat::Subscript => matches!(tag, Tag::Sub),
        }
    }
}

/// Which formats are active at the selection anchor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattingState {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub superscript: bool,
    pub subscript: bool,
}

impl FormattingState {
    /// Inspect the ancestor chain of `anchor`, stopping at `region`
    pub fn at(tree: &Tree, region: NodeId, anchor: NodeId) -> Self {
        let mut state = Self::default();
        let chain = std::iter::once(anchor)
            .chain(tree.ancestors(anchor))
            .take_while(|&id| id != region);

        for id in chain {
            if let Some(tag) = tree.tag(id) {
                state.bold |= InlineFormat::Bold.matches(tag);
                state.italic |= InlineFormat::Italic.matches(tag);
                state.underline |= InlineFormat::Underline.matches(tag);
                state.strikethrough |= InlineFormat::Strikethrough.matches(tag);
                state.superscript |= InlineFormat::Superscript.matches(tag);
                state.subscript |= InlineFormat::Subscript.matches(tag);
            }
        }
        state
    }

    pub fn is_active(&self, format: InlineFormat) -> bool {
        match format {
            InlineFormat::Bold => self.bold,
            InlineFormat::Italic => self.italic,
            InlineFormat::Underline => self.underline,
            InlineFormat::Strikethrough => self.strikethrough,
            InlineFormat::Superscript => self.superscript,
            InlineFormat::Subscript => self.subscript,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use richedit_markup::parse;

    #[test]
    fn test_state_from_ancestor_chain() {
        let tree = parse(Tag::Div, "<p><strong><em>x</em></strong> y</p>");
        let root = tree.root();
        let x = tree
            .descendants(root)
            .into_iter()
            .find(|&id| tree.text(id) == Some("x"))
            .unwrap();

        let state = FormattingState::at(&tree, root, x);
        assert!(state.bold);
        assert!(state.italic);
        assert!(!state.underline);
        assert!(state.is_active(InlineFormat::Italic));
    }

    #[test]
    fn test_region_itself_is_not_inspected() {
        let tree = parse(Tag::B, "plain");
        let text = tree.children(tree.root())[0];
        assert_eq!(FormattingState::at(&tree, tree.root(), text), FormattingState::default());
    }

    #[test]
    fn test_equivalent_tags() {
        assert!(InlineFormat::Strikethrough.matches(&Tag::Del));
        assert!(InlineFormat::Bold.matches(&Tag::Strong));
        assert!(!InlineFormat::Bold.matches(&Tag::Em));
    }
}
