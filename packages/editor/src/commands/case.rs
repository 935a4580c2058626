//! Case transforms over the selected text.

use crate::selection::Replacement;
use crate::EditSession;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextCase {
    Uppercase,
    Lowercase,
    /// First letter of every word uppercased, the rest untouched
    Titlecase,
}

impl TextCase {
    pub fn apply(self, text: &str) -> String {
        match self {
            TextCase::Uppercase => text.to_uppercase(),
            TextCase::Lowercase => text.to_lowercase(),
            TextCase::Titlecase => text
                .split_word_bounds()
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) if first.is_alphabetic() => first.to_uppercase().chain(chars).collect(),
                        _ => word.to_string(),
                    }
                })
                .collect(),
        }
    }
}

impl EditSession {
    /// Rewrite the case of every text node in the selection. Element
    /// structure is preserved.
    pub fn transform_text(&mut self, mode: TextCase) {
        let mut selection = self.selection();
        if selection.is_collapsed() {
            return;
        }

        let replaced = selection.replace(|tree, fragment| {
            for id in tree.descendants(fragment) {
                if let Some(text) = tree.text(id) {
                    let mapped = mode.apply(text);
                    tree.set_text(id, mapped);
                }
            }
            Replacement::Fragment(fragment)
        });

        if replaced.is_some() {
            self.notify();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    #[test]
    fn test_case_mapping() {
        assert_eq!(TextCase::Uppercase.apply("straße"), "STRASSE");
        assert_eq!(TextCase::Lowercase.apply("HeLLo"), "hello");
        assert_eq!(TextCase::Titlecase.apply("hello wORLD, it's 9am"), "Hello WORLD, It's 9am");
    }

    #[test]
    fn test_uppercase_keeps_structure() {
        let mut session = EditSession::new(Document::from_markup("<p><em>Hello</em> World</p>"));
        session.select_all();
        session.transform_text(TextCase::Uppercase);
        assert_eq!(session.markup(), "<p><em>HELLO</em> WORLD</p>");
        assert_eq!(session.document.version, 1);
    }

    #[test]
    fn test_partial_lowercase() {
        let mut session = EditSession::new(Document::from_markup("<p>ABC DEF</p>"));
        session.select_text(4, 7).unwrap();
        session.transform_text(TextCase::Lowercase);
        assert_eq!(session.markup(), "<p>ABC def</p>");
    }
}
