//! # Sanitizer
//!
//! Allow-list sanitization for markup that enters the document from outside,
//! plus the cleanup pipeline behind the "clean selection" command.
//!
//! ## Design
//!
//! - Disallowed elements are unwrapped: their children take their place and
//!   are sanitized as ordinary siblings
//! - Allowed elements keep only the attributes the policy lists for their
//!   tag; event hooks and script-capable URLs never survive
//! - Frames are kept only when their resolved source is on a trusted host,
//!   and then always carry a sandbox and lose any children; anything else
//!   is removed outright
//! - Traversal uses an explicit `(parent, index)` work stack, so nesting
//!   depth in hostile input does not matter

pub mod cleanup;
pub mod passes;
pub mod policy;

pub use cleanup::run;
pub use passes::{CleanupPass, CleanupPipeline, FlattenEmpty, RemoveFormatting, StripAttributes};
pub use policy::{SanitizationPolicy, EMBED_SANDBOX, TRUSTED_EMBED_HOSTS};

use richedit_markup::{parse_fragment, serialize_inner, NodeId, Tag, Tree};
use url::Url;

/// Outcome of checking one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Keep,
    /// Replace the element with its children
    Unwrap,
    /// Drop the element and everything under it
    Remove,
}

#[derive(Debug, Clone)]
pub struct Sanitizer {
    origin: Option<Url>,
}

impl Sanitizer {
    /// `origin` resolves relative frame sources; when it does not parse,
    /// only absolute sources can be trusted
    pub fn new(origin: &str) -> Self {
        let origin = Url::parse(origin).ok();
        if origin.is_none() {
            tracing::warn!("[Sanitizer] document origin is not a valid URL; relative embeds will be rejected");
        }
        Self { origin }
    }

    /// Sanitize every descendant of `root` in place. `root` itself is a
    /// container and is left as is.
    pub fn sanitize(&self, tree: &mut Tree, root: NodeId) {
        let mut stack = vec![(root, 0usize)];

        while let Some((parent, index)) = stack.pop() {
            let Some(&child) = tree.children(parent).get(index) else {
                continue;
            };

            match self.verdict(tree, child) {
                Verdict::Keep => {
                    stack.push((parent, index + 1));
                    stack.push((child, 0));
                }
                Verdict::Unwrap => {
                    tree.unwrap(child);
                    stack.push((parent, index));
                }
                Verdict::Remove => {
                    tree.remove(child);
                    stack.push((parent, index));
                }
            }
        }
    }

    /// Parse and sanitize external markup, returning a detached fragment
    pub fn sanitize_fragment(&self, tree: &mut Tree, markup: &str) -> NodeId {
        let fragment = parse_fragment(tree, markup);
        self.sanitize(tree, fragment);
        fragment
    }

    /// Sanitize a markup string
    pub fn sanitize_markup(&self, markup: &str) -> String {
        let mut tree = Tree::new(Tag::Div);
        let root = tree.root();
        let fragment = self.sanitize_fragment(&mut tree, markup);
        tree.insert_nodes(root, 0, &[fragment]);
        serialize_inner(&tree, root)
    }

    fn verdict(&self, tree: &mut Tree, id: NodeId) -> Verdict {
        let Some(tag) = tree.tag(id).cloned() else {
            return Verdict::Keep;
        };

        if !SanitizationPolicy::is_allowed_tag(&tag) {
            tracing::debug!("[Sanitizer] unwrapping disallowed <{}>", tag);
            return Verdict::Unwrap;
        }

        let allowed = SanitizationPolicy::allowed_attributes(&tag);
        let rejected: Vec<String> = tree
            .element(id)
            .map(|el| {
                el.attributes
                    .iter()
                    .filter(|(name, value)| {
                        policy::is_event_handler(name)
                            || !allowed.contains(&name.as_str())
                            || (policy::is_url_attribute(name) && policy::is_dangerous_url(value))
                    })
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default();

        for name in rejected {
            tracing::trace!("[Sanitizer] stripping {} from <{}>", name, tag);
            tree.remove_attribute(id, &name);
        }

        if tag == Tag::Iframe {
            let src = tree.attribute(id, "src").unwrap_or_default().to_string();
            match policy::trusted_embed(&src, self.origin.as_ref()) {
                Some(_) => {
                    for child in tree.children(id).to_vec() {
                        tree.remove(child);
                    }
                    tree.set_attribute(id, "sandbox", EMBED_SANDBOX);
                }
                None => {
                    tracing::debug!("[Sanitizer] rejecting untrusted embed {:?}", src);
                    return Verdict::Remove;
                }
            }
        }

        Verdict::Keep
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new("http://localhost")
    }
}
