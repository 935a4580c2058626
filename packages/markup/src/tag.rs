//! Closed set of element tags the editor understands.
//!
//! Anything else that shows up in pasted markup is kept as
//! [`Tag::Unknown`] until the sanitizer unwraps it.

use std::fmt;
use std::str::FromStr;

/// Element tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    P,
    Br,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Div,
    Span,
    Blockquote,
    Pre,
    Code,
    Strong,
    B,
    Em,
    I,
    U,
    S,
    Strike,
    Del,
    Sub,
    Sup,
    A,
    Ul,
    Ol,
    Li,
    Table,
    Thead,
    Tbody,
    Tfoot,
    Tr,
    Th,
    Td,
    Img,
    Iframe,
    /// Any tag outside the supported set (lowercased)
    Unknown(String),
}

impl Tag {
    /// Resolve a tag name, case-insensitively
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "p" => Tag::P,
            "br" => Tag::Br,
            "h1" => Tag::H1,
            "h2" => Tag::H2,
            "h3" => Tag::H3,
            "h4" => Tag::H4,
            "h5" => Tag::H5,
            "h6" => Tag::H6,
            "div" => Tag::Div,
            "span" => Tag::Span,
            "blockquote" => Tag::Blockquote,
            "pre" => Tag::Pre,
            "code" => Tag::Code,
            "strong" => Tag::Strong,
            "b" => Tag::B,
            "em" => Tag::Em,
            "i" => Tag::I,
            "u" => Tag::U,
            "s" => Tag::S,
            "strike" => Tag::Strike,
            "del" => Tag::Del,
            "sub" => Tag::Sub,
            "sup" => Tag::Sup,
            "a" => Tag::A,
            "ul" => Tag::Ul,
            "ol" => Tag::Ol,
            "li" => Tag::Li,
            "table" => Tag::Table,
            "thead" => Tag::Thead,
            "tbody" => Tag::Tbody,
            "tfoot" => Tag::Tfoot,
            "tr" => Tag::Tr,
            "th" => Tag::Th,
            "td" => Tag::Td,
            "img" => Tag::Img,
            "iframe" => Tag::Iframe,
            other => Tag::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Tag::P => "p",
            Tag::Br => "br",
            Tag::H1 => "h1",
            Tag::H2 => "h2",
            Tag::H3 => "h3",
            Tag::H4 => "h4",
            Tag::H5 => "h5",
            Tag::H6 => "h6",
            Tag::Div => "div",
            Tag::Span => "span",
            Tag::Blockquote => "blockquote",
            Tag::Pre => "pre",
            Tag::Code => "code",
            Tag::Strong => "strong",
            Tag::B => "b",
            Tag::Em => "em",
            Tag::I => "i",
            Tag::U => "u",
            Tag::S => "s",
            Tag::Strike => "strike",
            Tag::Del => "del",
            Tag::Sub => "sub",
            Tag::Sup => "sup",
            Tag::A => "a",
            Tag::Ul => "ul",
            Tag::Ol => "ol",
            Tag::Li => "li",
            Tag::Table => "table",
            Tag::Thead => "thead",
            Tag::Tbody => "tbody",
            Tag::Tfoot => "tfoot",
            Tag::Tr => "tr",
            Tag::Th => "th",
            Tag::Td => "td",
            Tag::Img => "img",
            Tag::Iframe => "iframe",
            Tag::Unknown(name) => name,
        }
    }

    /// Heading tag for a level; levels outside 1..=6 yield `None`
    pub fn heading(level: u8) -> Option<Self> {
        match level {
            1 => Some(Tag::H1),
            2 => Some(Tag::H2),
            3 => Some(Tag::H3),
            4 => Some(Tag::H4),
            5 => Some(Tag::H5),
            6 => Some(Tag::H6),
            _ => None,
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(self, Tag::H1 | Tag::H2 | Tag::H3 | Tag::H4 | Tag::H5 | Tag::H6)
    }

    /// Elements that never have children
    pub fn is_void(&self) -> bool {
        matches!(self, Tag::Br | Tag::Img)
            || matches!(self, Tag::Unknown(name) if matches!(name.as_str(), "hr" | "input" | "meta" | "link" | "wbr" | "source" | "col" | "area" | "base" | "embed" | "param" | "track"))
    }

    /// Block-level tags that a block rewrap may target or replace
    pub fn is_rewrappable_block(&self) -> bool {
        self.is_heading() || matches!(self, Tag::P | Tag::Div | Tag::Blockquote)
    }

    /// Block tags used when indenting
    pub fn is_indentable_block(&self) -> bool {
        self.is_heading() || matches!(self, Tag::P | Tag::Div | Tag::Li | Tag::Blockquote | Tag::Pre)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Tag::Ul | Tag::Ol)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Tag::from_name(s))
    }
}
