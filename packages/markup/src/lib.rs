//! # Richedit Markup
//!
//! The content tree every editing operation reads and mutates, plus the
//! markup tokenizer, parser and serializer used at the persistence and
//! paste boundaries.
//!
//! ```rust
//! use richedit_markup::{parse, serialize_inner, Tag};
//!
//! let tree = parse(Tag::Div, "<p>Hello <em>World</em></p>");
//! assert_eq!(tree.text_content(tree.root()), "Hello World");
//! assert_eq!(serialize_inner(&tree, tree.root()), "<p>Hello <em>World</em></p>");
//! ```

pub mod escape;
pub mod parser;
pub mod serializer;
pub mod tag;
pub mod tokenizer;
pub mod tree;

pub use parser::{parse, parse_fragment, Parser};
pub use serializer::{serialize_inner, serialize_outer, Serializer};
pub use tag::Tag;
pub use tokenizer::{tokenize, Token};
pub use tree::{Element, NodeId, NodeKind, Tree};
