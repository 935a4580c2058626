//! # Document Handle
//!
//! A Document owns the editable region and the tree it lives in, and is the
//! only place that talks to the persistence collaborator.
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Edit → notify_changed → ContentSink
//!  ↓       ↓          ↓               ↓
//! markup  Tree    version + 1    serialized region (or None)
//! ```

use richedit_markup::{parse, serialize_inner, NodeId, NodeKind, Tag, Tree};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Receiver for serialized content after each structural change
///
/// Delivery is fire-and-forget: the document never waits on or retries a
/// sink, so failure handling belongs to the implementation.
pub trait ContentSink {
    /// `None` means the region is empty (or holds only a lone `<br>`)
    fn content_changed(&mut self, content: Option<&str>);
}

/// Sink that drops every notification
#[derive(Debug, Default)]
pub struct NullSink;

impl ContentSink for NullSink {
    fn content_changed(&mut self, _content: Option<&str>) {}
}

/// Sink that keeps every snapshot it receives
///
/// Clones share the same buffer, so a test can hand one clone to the
/// document and inspect the other.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    snapshots: Rc<RefCell<Vec<Option<String>>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<Option<String>> {
        self.snapshots.borrow().clone()
    }

    pub fn last(&self) -> Option<Option<String>> {
        self.snapshots.borrow().last().cloned()
    }

    pub fn count(&self) -> usize {
        self.snapshots.borrow().len()
    }
}

impl ContentSink for RecordingSink {
    fn content_changed(&mut self, content: Option<&str>) {
        self.snapshots.borrow_mut().push(content.map(str::to_string));
    }
}

/// Editable rich-text document
pub struct Document {
    tree: Tree,

    /// Current version number (increments on each notified change)
    pub version: u64,

    dirty: bool,
    sink: Box<dyn ContentSink>,
}

impl Document {
    /// Empty document whose region is a bare `<div>`
    pub fn new() -> Self {
        Self::from_tree(Tree::new(Tag::Div))
    }

    /// Load initial content into a fresh region
    pub fn from_markup(markup: &str) -> Self {
        Self::from_tree(parse(Tag::Div, markup))
    }

    fn from_tree(tree: Tree) -> Self {
        Self {
            tree,
            version: 0,
            dirty: false,
            sink: Box::new(NullSink),
        }
    }

    pub fn with_sink(mut self, sink: impl ContentSink + 'static) -> Self {
        self.set_sink(sink);
        self
    }

    pub fn set_sink(&mut self, sink: impl ContentSink + 'static) {
        self.sink = Box::new(sink);
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// The editable region: root of the tree, never removed or replaced
    pub fn region(&self) -> NodeId {
        self.tree.root()
    }

    /// Serialized region content
    pub fn markup(&self) -> String {
        serialize_inner(&self.tree, self.region())
    }

    /// Plain text of the region
    pub fn text(&self) -> String {
        self.tree.text_content(self.region())
    }

    /// Whether there are changes since the last `mark_saved`
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Signal the persistence collaborator that content changed
    pub fn notify_changed(&mut self) {
        self.version += 1;
        self.dirty = true;

        let content = if self.is_blank() {
            None
        } else {
            Some(self.markup())
        };
        tracing::trace!("[Document] content changed (version {})", self.version);
        self.sink.content_changed(content.as_deref());
    }

    fn is_blank(&self) -> bool {
        match self.tree.children(self.region()) {
            [] => true,
            [only] => matches!(
                self.tree.kind(*only),
                Some(NodeKind::Element(el)) if el.tag == Tag::Br
            ),
            _ => false,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("version", &self.version)
            .field("dirty", &self.dirty)
            .field("markup", &self.markup())
            .finish()
    }
}
