use crate::escape::unescape;
use crate::tag::Tag;
use crate::tokenizer::{tokenize, Token};
use crate::tree::{NodeId, Tree};
use std::ops::Range;

/// Lenient markup parser
///
/// Never fails: stray `<` becomes text, unmatched end tags are ignored and
/// elements still open at the end of input are closed implicitly. Pasted
/// markup is frequently malformed and must still land in the tree.
pub struct Parser<'src> {
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            tokens: tokenize(source),
            pos: 0,
        }
    }

    /// Parse all tokens into a new detached fragment of `tree`
    pub fn parse_into(&mut self, tree: &mut Tree) -> NodeId {
        let fragment = tree.create_fragment();
        let mut open = vec![fragment];

        while let Some(token) = self.advance() {
            let current = *open.last().unwrap_or(&fragment);
            match token {
                Token::Declaration => {}
                Token::Text(text) => append_text(tree, current, &unescape(text)),
                Token::Lt => append_text(tree, current, "<"),
                Token::StartTag(raw) => {
                    let start = parse_start_tag(raw);
                    let element = tree.create_element(start.tag.clone());
                    for (name, value) in start.attributes {
                        if tree.attribute(element, &name).is_none() {
                            tree.set_attribute(element, name, value);
                        }
                    }
                    tree.append_child(current, element);
                    if !start.self_closing && !start.tag.is_void() {
                        open.push(element);
                    }
                }
                Token::EndTag(name) => {
                    let tag = Tag::from_name(name);
                    let matching = open
                        .iter()
                        .skip(1)
                        .rposition(|&id| tree.tag(id) == Some(&tag));
                    if let Some(index) = matching {
                        open.truncate(index + 1);
                    }
                }
            }
        }

        fragment
    }

    fn advance(&mut self) -> Option<Token<'src>> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }
}

fn append_text(tree: &mut Tree, parent: NodeId, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(&last) = tree.children(parent).last() {
        if let Some(existing) = tree.text(last) {
            let merged = format!("{}{}", existing, text);
            tree.set_text(last, merged);
            return;
        }
    }
    let node = tree.create_text(text);
    tree.append_child(parent, node);
}

struct StartTag {
    tag: Tag,
    attributes: Vec<(String, String)>,
    self_closing: bool,
}

fn parse_start_tag(raw: &str) -> StartTag {
    let inner = raw
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(raw);
    let self_closing = inner.ends_with('/');
    let inner = inner.strip_suffix('/').unwrap_or(inner);

    let name_end = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == ':' || c == '-'))
        .unwrap_or(inner.len());

    StartTag {
        tag: Tag::from_name(&inner[..name_end]),
        attributes: parse_attributes(&inner[name_end..]),
        self_closing,
    }
}

fn parse_attributes(source: &str) -> Vec<(String, String)> {
    let mut attributes = Vec::new();
    let mut rest = source;

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '/');
        if rest.is_empty() {
            break;
        }

        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
            .unwrap_or(rest.len());
        let name = rest[..name_end].to_ascii_lowercase();
        rest = rest[name_end..].trim_start();

        let mut value = String::new();
        if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            match after_eq.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &after_eq[1..];
                    let end = body.find(quote).unwrap_or(body.len());
                    value = unescape(&body[..end]);
                    rest = body.get(end + 1..).unwrap_or("");
                }
                _ => {
                    let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
                    value = unescape(&after_eq[..end]);
                    rest = &after_eq[end..];
                }
            }
        }

        if !name.is_empty() {
            attributes.push((name, value));
        }
    }

    attributes
}

/// Parse markup into a detached fragment owned by `tree`
pub fn parse_fragment(tree: &mut Tree, source: &str) -> NodeId {
    Parser::new(source).parse_into(tree)
}

/// Parse markup into a fresh tree rooted at an element of `root_tag`
pub fn parse(root_tag: Tag, source: &str) -> Tree {
    let mut tree = Tree::new(root_tag);
    let fragment = parse_fragment(&mut tree, source);
    let root = tree.root();
    tree.insert_nodes(root, 0, &[fragment]);
    tree
}
