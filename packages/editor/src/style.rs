//! Inline `style` attribute helpers.

use indexmap::IndexMap;
use richedit_markup::{NodeId, Tree};

/// Parse a declaration list into property → value, in source order.
/// Property names are lowercased; a repeated property keeps its last value.
pub fn parse_declarations(style: &str) -> IndexMap<String, String> {
    let mut declarations = IndexMap::new();
    for declaration in style.split(';') {
        if let Some((property, value)) = declaration.split_once(':') {
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim();
            if !property.is_empty() && !value.is_empty() {
                declarations.insert(property, value.to_string());
            }
        }
    }
    declarations
}

pub fn format_declarations(declarations: &IndexMap<String, String>) -> String {
    declarations
        .iter()
        .map(|(property, value)| format!("{}: {};", property, value))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn get_style(tree: &Tree, id: NodeId, property: &str) -> Option<String> {
    let style = tree.attribute(id, "style")?;
    parse_declarations(style).get(property).cloned()
}

/// Set one property, keeping the others in place
pub fn set_style(tree: &mut Tree, id: NodeId, property: &str, value: &str) {
    let mut declarations = tree
        .attribute(id, "style")
        .map(parse_declarations)
        .unwrap_or_default();
    declarations.insert(property.to_string(), value.to_string());
    tree.set_attribute(id, "style", format_declarations(&declarations));
}

/// Whole pixels of a `px` length such as `20px` or `12.5px`, or a bare `0`.
/// Other units are `None`.
pub fn pixels(value: &str) -> Option<i64> {
    let value = value.trim();
    if value == "0" {
        return Some(0);
    }
    let number = value.strip_suffix("px")?.trim_end();
    number.parse::<i64>().ok().or_else(|| {
        number
            .parse::<f64>()
            .ok()
            .filter(|px| px.is_finite())
            .map(|px| px.trunc() as i64)
    })
}
