//! # Richedit Editor
//!
//! Selection-aware mutation engine for an editable rich-text region.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ markup: text ↔ arena Tree                   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Document + Selection + Commands     │
//! │  - Ranges anchored by stable node ids       │
//! │  - Inline, block, list and indent commands  │
//! │  - Allow-list sanitizer + cleanup pipeline  │
//! │  - Content-changed signal to a sink         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ ContentSink: serialized region markup       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Tree is the source of truth**: formatting state is read off the
//!    ancestor chain, never cached
//! 2. **Selection is a value**: the session owns it and every command
//!    leaves a well-defined range behind
//! 3. **Degrade, don't fail**: a missing selection or unusable range is a
//!    no-op; only an invalid video source is reported
//! 4. **Region is inviolable**: commands change descendants only
//!
//! ## Usage
//!
//! ```rust
//! use richedit_editor::{Command, Document, EditSession, RecordingSink};
//!
//! let sink = RecordingSink::new();
//! let document = Document::from_markup("<p>Hello world</p>").with_sink(sink.clone());
//! let mut session = EditSession::new(document);
//!
//! session.apply(Command::SelectText { start: 6, end: 11 }).unwrap();
//! session.apply(Command::ToggleInlineFormat { tag: "b".into() }).unwrap();
//!
//! assert_eq!(session.markup(), "<p>Hello <b>world</b></p>");
//! assert_eq!(sink.count(), 1);
//! ```

mod commands;
mod config;
mod document;
mod errors;
mod formatting;
mod session;

pub mod range;
pub mod sanitizer;
pub mod selection;
pub mod style;

pub use commands::{
    Alignment, Command, ImageAlignment, ImageFloat, ImagePayload, LinkPayload, ListStyle, TextCase, VideoPayload,
};
pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use document::{ContentSink, Document, NullSink, RecordingSink};
pub use errors::EditorError;
pub use formatting::{FormattingState, InlineFormat};
pub use range::{Position, SelectionRange};
pub use sanitizer::{CleanupPass, CleanupPipeline, SanitizationPolicy, Sanitizer};
pub use selection::{Replacement, Selection};
pub use session::EditSession;

// Re-export tree types for convenience
pub use richedit_markup::{NodeId, Tag, Tree};
