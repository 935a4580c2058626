//! Cleanup passes and the pipeline that runs them.
//!
//! Each pass treats the node it is given as a container: the container
//! itself is never stripped, removed or unwrapped, only its descendants.

use richedit_markup::{NodeId, Tag, Tree};

/// A composable cleanup step over a subtree
pub trait CleanupPass {
    /// Unique identifier for this pass
    fn name(&self) -> &'static str;

    fn apply(&self, tree: &mut Tree, root: NodeId);
}

/// Removes every attribute from every element
#[derive(Debug, Default)]
pub struct StripAttributes;

impl CleanupPass for StripAttributes {
    fn name(&self) -> &'static str {
        "strip-attributes"
    }

    fn apply(&self, tree: &mut Tree, root: NodeId) {
        for id in tree.descendants(root) {
            tree.clear_attributes(id);
        }
    }
}

/// Removes elements left without children and without visible text,
/// bottom-up so emptied parents go too. Images and frames carry content
/// without children and are kept.
#[derive(Debug, Default)]
pub struct FlattenEmpty;

impl CleanupPass for FlattenEmpty {
    fn name(&self) -> &'static str {
        "flatten-empty"
    }

    fn apply(&self, tree: &mut Tree, root: NodeId) {
        for id in tree.descendants(root).into_iter().rev() {
            let empty = match tree.tag(id) {
                Some(Tag::Img | Tag::Iframe) | None => false,
                Some(_) => tree.children(id).is_empty(),
            };
            if empty {
                tree.remove(id);
            }
        }
    }
}

/// Unwraps purely presentational inline tags
#[derive(Debug, Default)]
pub struct RemoveFormatting;

impl RemoveFormatting {
    fn is_formatting(tag: &Tag) -> bool {
        matches!(tag, Tag::B | Tag::I | Tag::U | Tag::Strong | Tag::Em | Tag::Span)
    }
}

impl CleanupPass for RemoveFormatting {
    fn name(&self) -> &'static str {
        "remove-formatting"
    }

    fn apply(&self, tree: &mut Tree, root: NodeId) {
        for id in tree.descendants(root).into_iter().rev() {
            if tree.tag(id).is_some_and(Self::is_formatting) {
                tree.unwrap(id);
            }
        }
    }
}

/// Ordered list of passes
pub struct CleanupPipeline {
    passes: Vec<Box<dyn CleanupPass>>,
}

impl CleanupPipeline {
    /// strip → flatten → remove formatting
    pub fn new() -> Self {
        Self {
            passes: vec![
                Box::new(StripAttributes),
                Box::new(FlattenEmpty),
                Box::new(RemoveFormatting),
            ],
        }
    }

    pub fn empty() -> Self {
        Self { passes: Vec::new() }
    }

    pub fn add_pass(&mut self, pass: Box<dyn CleanupPass>) {
        self.passes.push(pass);
    }

    pub fn passes(&self) -> &[Box<dyn CleanupPass>] {
        &self.passes
    }

    pub fn run(&self, tree: &mut Tree, root: NodeId) {
        for pass in &self.passes {
            tracing::trace!("[Cleanup] running {}", pass.name());
            pass.apply(tree, root);
        }
    }
}

impl Default for CleanupPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CleanupPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupPipeline")
            .field(
                "passes",
                &self.passes.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use richedit_markup::{parse, serialize_inner};

    fn run(pass: &dyn CleanupPass, source: &str) -> String {
        let mut tree = parse(Tag::Div, source);
        let root = tree.root();
        pass.apply(&mut tree, root);
        serialize_inner(&tree, root)
    }

    #[test]
    fn test_strip_attributes() {
        assert_eq!(
            run(&StripAttributes, r#"<p class="a" style="color:red"><a href="x">y</a></p>"#),
            "<p><a>y</a></p>"
        );
    }

    #[test]
    fn test_flatten_removes_nested_empties() {
        assert_eq!(run(&FlattenEmpty, "<p><b><i></i></b></p><p>x</p>"), "<p>x</p>");
    }

    #[test]
    fn test_flatten_keeps_whitespace_text_and_media() {
        assert_eq!(
            run(&FlattenEmpty, r#"<p> </p><span><img src="a.png"></span>"#),
            r#"<p> </p><span><img src="a.png"></span>"#
        );
    }

    #[test]
    fn test_flatten_never_removes_root() {
        let mut tree = parse(Tag::Div, "<br>");
        let root = tree.root();
        FlattenEmpty.apply(&mut tree, root);
        assert!(tree.contains(root));
        assert!(tree.children(root).is_empty());
    }

    #[test]
    fn test_remove_formatting() {
        assert_eq!(
            run(&RemoveFormatting, "<p><b>bold <i>both</i></b> <span>x</span><code>c</code></p>"),
            "<p>bold both x<code>c</code></p>"
        );
    }

    #[test]
    fn test_pipeline_order() {
        let pipeline = CleanupPipeline::new();
        let names: Vec<_> = pipeline.passes().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["strip-attributes", "flatten-empty", "remove-formatting"]);

        let mut tree = parse(Tag::Div, r#"<p style="x"><span class="y"><b></b>text</span></p>"#);
        let root = tree.root();
        pipeline.run(&mut tree, root);
        assert_eq!(serialize_inner(&tree, root), "<p>text</p>");
    }
}
