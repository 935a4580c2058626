use crate::escape::{escape_attribute, escape_text};
use crate::tree::{NodeId, NodeKind, Tree};

/// Serializer converts a tree (or part of it) back to markup
///
/// Output is canonical: lowercase tags, double-quoted attributes in their
/// stored order, void elements without end tags. Adjacent text nodes are
/// indistinguishable from a single merged node in the output.
pub struct Serializer<'a> {
    tree: &'a Tree,
}

enum Step {
    Open(NodeId),
    Close(NodeId),
}

impl<'a> Serializer<'a> {
    pub fn new(tree: &'a Tree) -> Self {
        Self { tree }
    }

    /// Markup of the node itself, including its own tag
    pub fn outer(&self, id: NodeId) -> String {
        let mut output = String::new();
        self.write(&[id], &mut output);
        output
    }

    /// Markup of the node's children only
    pub fn inner(&self, id: NodeId) -> String {
        let mut output = String::new();
        self.write(self.tree.children(id), &mut output);
        output
    }

    fn write(&self, nodes: &[NodeId], output: &mut String) {
        let mut stack: Vec<Step> = nodes.iter().rev().map(|&id| Step::Open(id)).collect();

        while let Some(step) = stack.pop() {
            match step {
                Step::Open(id) => match self.tree.kind(id) {
                    Some(NodeKind::Text(text)) => escape_text(text, output),
                    Some(NodeKind::Element(element)) => {
                        output.push('<');
                        output.push_str(element.tag.as_str());
                        for (name, value) in &element.attributes {
                            output.push(' ');
                            output.push_str(name);
                            output.push_str("=\"");
                            escape_attribute(value, output);
                            output.push('"');
                        }
                        output.push('>');

                        if !element.tag.is_void() {
                            stack.push(Step::Close(id));
                            stack.extend(self.tree.children(id).iter().rev().map(|&c| Step::Open(c)));
                        }
                    }
                    Some(NodeKind::Fragment) => {
                        stack.extend(self.tree.children(id).iter().rev().map(|&c| Step::Open(c)));
                    }
                    None => {}
                },
                Step::Close(id) => {
                    if let Some(tag) = self.tree.tag(id) {
                        output.push_str("</");
                        output.push_str(tag.as_str());
                        output.push('>');
                    }
                }
            }
        }
    }
}

/// Serialize the children of `id`
pub fn serialize_inner(tree: &Tree, id: NodeId) -> String {
    Serializer::new(tree).inner(id)
}

/// Serialize `id` including its own tag
pub fn serialize_outer(tree: &Tree, id: NodeId) -> String {
    Serializer::new(tree).outer(id)
}
