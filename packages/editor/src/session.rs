//! # Edit Session
//!
//! One user's editing state: the document, the ambient selection and the
//! configuration every command reads.
//!
//! The selection is a plain value owned by the session. Tests and scripts
//! construct arbitrary selection states with [`EditSession::select`] or the
//! text-offset helpers; commands read it through a [`Selection`] and leave
//! a new range behind.

use crate::formatting::{FormattingState, InlineFormat};
use crate::range::{self, Position, SelectionRange};
use crate::sanitizer::{CleanupPipeline, Sanitizer};
use crate::selection::{locate_text_offset, Selection};
use crate::{Document, EditorConfig, EditorError};
use richedit_markup::NodeId;

pub struct EditSession {
    /// Document being edited
    pub document: Document,

    /// Current selection, if any
    pub selection: Option<SelectionRange>,

    pub config: EditorConfig,

    pub(crate) sanitizer: Sanitizer,
    pub(crate) pipeline: CleanupPipeline,
}

impl EditSession {
    pub fn new(document: Document) -> Self {
        Self::with_config(document, EditorConfig::default())
    }

    pub fn with_config(document: Document, config: EditorConfig) -> Self {
        let sanitizer = Sanitizer::new(&config.document_origin);
        Self {
            document,
            selection: None,
            config,
            sanitizer,
            pipeline: CleanupPipeline::new(),
        }
    }

    /// Selection view over this session's tree and range
    pub fn selection(&mut self) -> Selection<'_> {
        let region = self.document.region();
        Selection::new(self.document.tree_mut(), region, &mut self.selection)
    }

    pub fn sanitizer(&self) -> &Sanitizer {
        &self.sanitizer
    }

    /// Normalized current range, `None` when absent or stale
    pub fn current_range(&self) -> Option<SelectionRange> {
        let stored = self.selection?;
        range::normalize(self.document.tree(), self.document.region(), &stored)
    }

    pub fn select(&mut self, range: SelectionRange) {
        self.selection = Some(range);
    }

    pub fn collapse(&mut self, at: Position) {
        self.selection = Some(SelectionRange::collapsed(at));
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Select by character offsets over the region's text
    pub fn select_text(&mut self, start: usize, end: usize) -> Result<(), EditorError> {
        let tree = self.document.tree();
        let region = self.document.region();
        let (from, to) = (start.min(end), start.max(end));

        let out_of_bounds = || EditorError::SelectionOutOfBounds {
            start,
            end,
            length: tree.text_content(region).chars().count(),
        };
        let start_position = locate_text_offset(tree, region, from, to > from).ok_or_else(out_of_bounds)?;
        let end_position = locate_text_offset(tree, region, to, false).ok_or_else(out_of_bounds)?;

        self.selection = Some(SelectionRange::new(start_position, end_position));
        Ok(())
    }

    /// Select everything in the region
    pub fn select_all(&mut self) {
        let tree = self.document.tree();
        let region = self.document.region();
        let length = tree.text_content(region).chars().count();

        let range = match (
            locate_text_offset(tree, region, 0, true),
            locate_text_offset(tree, region, length, false),
        ) {
            (Some(start), Some(end)) if length > 0 => SelectionRange::new(start, end),
            _ => SelectionRange::node_contents(tree, region),
        };
        self.selection = Some(range);
    }

    pub fn select_node_contents(&mut self, node: NodeId) {
        let tree = self.document.tree();
        if tree.contains(node) {
            self.selection = Some(SelectionRange::node_contents(tree, node));
        } else {
            self.selection = None;
        }
    }

    /// Text under the current selection
    pub fn selected_text(&mut self) -> String {
        self.selection().text()
    }

    /// Toolbar state at the selection anchor
    pub fn formatting_state(&self) -> FormattingState {
        match self.current_range() {
            Some(current) => FormattingState::at(
                self.document.tree(),
                self.document.region(),
                current.start.node,
            ),
            None => FormattingState::default(),
        }
    }

    pub fn is_active(&self, format: InlineFormat) -> bool {
        self.formatting_state().is_active(format)
    }

    /// Serialized region content
    pub fn markup(&self) -> String {
        self.document.markup()
    }

    pub(crate) fn notify(&mut self) {
        self.document.notify_changed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = EditSession::new(Document::from_markup("<p>Hi</p>"));
        assert!(session.selection.is_none());
        assert!(session.current_range().is_none());
        assert_eq!(session.config.indent_step_px, 20);
    }

    #[test]
    fn test_select_text_spans_nodes() {
        let mut session = EditSession::new(Document::from_markup("<p>Hello <em>big</em> world</p>"));
        session.select_text(4, 12).unwrap();
        assert_eq!(session.selected_text(), "o big wo");

        session.select_text(12, 4).unwrap();
        assert_eq!(session.selected_text(), "o big wo");
    }

    #[test]
    fn test_select_text_out_of_bounds() {
        let mut session = EditSession::new(Document::from_markup("<p>abc</p>"));
        let err = session.select_text(1, 10).unwrap_err();
        assert!(matches!(err, EditorError::SelectionOutOfBounds { length: 3, .. }));
    }

    #[test]
    fn test_select_all_and_empty_region() {
        let mut session = EditSession::new(Document::from_markup("<p>one</p><p>two</p>"));
        session.select_all();
        assert_eq!(session.selected_text(), "onetwo");

        let mut empty = EditSession::new(Document::new());
        empty.select_all();
        assert!(empty.current_range().is_some());
        assert_eq!(empty.selected_text(), "");
    }

    #[test]
    fn test_formatting_state_follows_anchor() {
        let mut session = EditSession::new(Document::from_markup("<p><b>bold</b> plain</p>"));
        session.select_text(1, 2).unwrap();
        assert!(session.is_active(InlineFormat::Bold));

        session.select_text(6, 7).unwrap();
        assert!(!session.is_active(InlineFormat::Bold));
    }
}
