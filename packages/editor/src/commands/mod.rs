//! # Commands
//!
//! Every editing operation the surface can invoke, as methods on
//! [`EditSession`] plus a serializable [`Command`] that names them.
//!
//! ## Failure semantics
//!
//! - A missing or collapsed selection makes range-dependent commands a
//!   silent no-op
//! - Content-changed is signalled after a structural change, never before
//!   and never for a no-op
//! - The only reported failure is an invalid video source, raised before
//!   anything is mutated

mod block;
mod case;
mod indent;
mod inline;
mod insert;
mod list;

pub use block::Alignment;
pub use case::TextCase;
pub use insert::{ImageAlignment, ImageFloat, ImagePayload, LinkPayload, VideoPayload};
pub use list::ListStyle;

use crate::formatting::InlineFormat;
use crate::sanitizer;
use crate::{EditSession, EditorError};
use richedit_markup::{NodeId, Tag, Tree};
use serde::{Deserialize, Serialize};

/// A named, parameterized editing operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Command {
    /// Select by character offsets over the region's text
    SelectText { start: usize, end: usize },
    SelectAll,

    ToggleInlineFormat { tag: String },
    ToggleFormat { format: InlineFormat },
    TransformText { mode: TextCase },

    WrapBlock { tag: String },
    Paragraph,
    Heading { level: u8 },
    Align { alignment: Alignment },

    ToggleList { tag: String, style: ListStyle },
    ChangeIndent { increase: bool },

    FontSize { px: u32 },
    TextColor { color: String },
    BackgroundColor { color: String },

    InsertHtml { markup: String },
    PasteHtml { markup: String },
    PasteText { text: String },
    InsertTable { rows: usize, cols: usize },
    InsertLink(LinkPayload),
    InsertImage(ImagePayload),
    InsertFileLink { url: String, title: Option<String> },
    InsertVideo(VideoPayload),

    /// Run the cleanup pipeline over the selection
    Clean,
}

impl EditSession {
    /// Dispatch a command
    pub fn apply(&mut self, command: Command) -> Result<(), EditorError> {
        tracing::debug!("[Command] {:?}", command);

        match command {
            Command::SelectText { start, end } => self.select_text(start, end)?,
            Command::SelectAll => self.select_all(),
            Command::ToggleInlineFormat { tag } => self.toggle_inline_format(Tag::from_name(&tag)),
            Command::ToggleFormat { format } => self.toggle_format(format),
            Command::TransformText { mode } => self.transform_text(mode),
            Command::WrapBlock { tag } => self.wrap_block(Tag::from_name(&tag)),
            Command::Paragraph => self.paragraph(),
            Command::Heading { level } => self.heading(level),
            Command::Align { alignment } => self.align(alignment),
            Command::ToggleList { tag, style } => self.toggle_list(Tag::from_name(&tag), style),
            Command::ChangeIndent { increase } => self.change_indent(increase),
            Command::FontSize { px } => self.font_size(px),
            Command::TextColor { color } => self.text_color(&color),
            Command::BackgroundColor { color } => self.background_color(&color),
            Command::InsertHtml { markup } => self.insert_html(&markup),
            Command::PasteHtml { markup } => self.paste_html(&markup),
            Command::PasteText { text } => self.paste_text(&text),
            Command::InsertTable { rows, cols } => self.insert_table(rows, cols),
            Command::InsertLink(payload) => self.insert_link(&payload),
            Command::InsertImage(payload) => {
                self.insert_image(&payload);
            }
            Command::InsertFileLink { url, title } => self.insert_file_link(&url, title.as_deref()),
            Command::InsertVideo(payload) => {
                self.insert_video(&payload)?;
            }
            Command::Clean => {
                self.clean_selection();
            }
        }
        Ok(())
    }

    /// Run strip → flatten → remove-formatting over the selection's scope.
    /// Returns the cleaned markup.
    pub fn clean_selection(&mut self) -> Option<String> {
        let pipeline = std::mem::take(&mut self.pipeline);
        let cleaned = sanitizer::run(&mut self.selection(), &pipeline);
        self.pipeline = pipeline;

        if cleaned.is_some() {
            self.notify();
        }
        cleaned
    }
}

/// A group of top-level nodes that becomes one block when rewrapping
#[derive(Debug)]
pub(crate) enum BlockUnit {
    /// An existing block element; its children move into the new wrapper
    Block(NodeId),
    /// A run of inline content between line breaks
    Inline(Vec<NodeId>),
}

impl BlockUnit {
    pub(crate) fn move_into(self, tree: &mut Tree, wrapper: NodeId) {
        match self {
            BlockUnit::Block(block) => tree.move_children(block, wrapper),
            BlockUnit::Inline(nodes) => {
                for node in nodes {
                    tree.append_child(wrapper, node);
                }
            }
        }
    }
}

/// Split the top-level children of `fragment` into block units: block
/// children stand alone, inline runs break at `<br>` and at newlines in
/// text, and runs without visible content are dropped.
pub(crate) fn partition_units(tree: &mut Tree, fragment: NodeId, is_block: fn(&Tag) -> bool) -> Vec<BlockUnit> {
    let mut units = Vec::new();
    let mut run = Vec::new();

    for child in tree.children(fragment).to_vec() {
        match tree.tag(child) {
            Some(tag) if is_block(tag) => {
                flush_run(tree, &mut run, &mut units);
                units.push(BlockUnit::Block(child));
            }
            Some(Tag::Br) => flush_run(tree, &mut run, &mut units),
            Some(_) => run.push(child),
            None => {
                let text = tree.text(child).unwrap_or_default().to_string();
                let mut lines = text.split('\n');
                if let Some(first) = lines.next() {
                    tree.set_text(child, first);
                    run.push(child);
                }
                for line in lines {
                    flush_run(tree, &mut run, &mut units);
                    run.push(tree.create_text(line));
                }
            }
        }
    }
    flush_run(tree, &mut run, &mut units);

    units
}

fn flush_run(tree: &mut Tree, run: &mut Vec<NodeId>, units: &mut Vec<BlockUnit>) {
    let nodes = std::mem::take(run);
    if nodes.iter().any(|&node| has_visible_content(tree, node)) {
        units.push(BlockUnit::Inline(nodes));
    } else {
        for node in nodes {
            if tree.parent(node).is_none() {
                tree.remove(node);
            }
        }
    }
}

/// Non-blank text, or media that shows without text
pub(crate) fn has_visible_content(tree: &Tree, node: NodeId) -> bool {
    let is_media = |id: NodeId| matches!(tree.tag(id), Some(Tag::Img | Tag::Iframe));
    !tree.text_content(node).trim().is_empty()
        || is_media(node)
        || tree.descendants(node).into_iter().any(is_media)
}

/// Free block units that were not consumed
pub(crate) fn discard_units(tree: &mut Tree, units: Vec<BlockUnit>) {
    for unit in units {
        if let BlockUnit::Inline(nodes) = unit {
            for node in nodes {
                if tree.parent(node).is_none() {
                    tree.remove(node);
                }
            }
        }
    }
}
