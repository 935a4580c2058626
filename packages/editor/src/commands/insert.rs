//! Insertion commands: markup, pasted content, tables, links and media.
//!
//! Dialog-driven operations receive fully-formed payloads. Only the video
//! source is validated here, because it is the one input that can be
//! rejected outright.

use crate::range::Position;
use crate::sanitizer::{policy, EMBED_SANDBOX};
use crate::{style, EditSession, EditorError};
use indexmap::IndexMap;
use regex::Regex;
use richedit_markup::{parse_fragment, NodeId, Tag, Tree};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use url::Url;

const VIDEO_ALLOW: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture; web-share";
const VIDEO_REFERRER_POLICY: &str = "strict-origin-when-cross-origin";

fn embed_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"youtube\.com/embed/([a-zA-Z0-9_-]+)").expect("embed url regex"))
}

fn watch_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/)([a-zA-Z0-9_-]+)").expect("watch url regex")
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPayload {
    pub url: String,

    /// Link text; the URL is used when empty
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default = "default_link_target")]
    pub target: String,
}

fn default_link_target() -> String {
    "_self".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageFloat {
    #[default]
    None,
    Left,
    Right,
}

impl ImageFloat {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFloat::None => "none",
            ImageFloat::Left => "left",
            ImageFloat::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageAlignment {
    Left,
    Center,
    Right,
}

/// Image source plus presentation, as collected by the image dialog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default = "default_image_width")]
    pub width: u32,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub float: ImageFloat,
    #[serde(default)]
    pub border_width: u32,
    #[serde(default = "default_border_color")]
    pub border_color: String,
    #[serde(default)]
    pub border_radius: u32,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_image_width() -> u32 {
    200
}

fn default_border_color() -> String {
    "#000".to_string()
}

fn default_opacity() -> f64 {
    1.0
}

impl ImagePayload {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: String::new(),
            width: default_image_width(),
            height: None,
            float: ImageFloat::None,
            border_width: 0,
            border_color: default_border_color(),
            border_radius: 0,
            opacity: default_opacity(),
        }
    }

    /// Style declarations in application order
    fn declarations(&self) -> IndexMap<&'static str, String> {
        let mut declarations = IndexMap::new();
        declarations.insert("width", format!("{}px", self.width));
        if let Some(height) = self.height {
            declarations.insert("height", format!("{}px", height));
        }
        declarations.insert("float", self.float.as_str().to_string());
        if self.border_width > 0 {
            declarations.insert("border", format!("{}px solid {}", self.border_width, self.border_color));
        }
        if self.border_radius > 0 {
            declarations.insert("border-radius", format!("{}px", self.border_radius));
        }
        if self.opacity > 0.0 {
            declarations.insert("opacity", self.opacity.to_string());
        }
        declarations.insert("display", "inline-block".to_string());
        declarations
    }

    fn apply(&self, tree: &mut Tree, image: NodeId) {
        tree.set_attribute(image, "src", self.src.as_str());
        tree.set_attribute(image, "alt", self.alt.as_str());
        for (property, value) in self.declarations() {
            style::set_style(tree, image, property, &value);
        }
    }
}

/// Embed source and presentation, as collected by the video dialog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoPayload {
    /// Embed URL, watch URL, short link or pasted `<iframe>` markup
    pub source: String,
    pub title: String,
    pub classes: String,
    pub styles: String,
    pub full_width: bool,
    pub responsive: bool,
}

impl VideoPayload {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    fn class_list(&self) -> String {
        let mut classes = self.classes.trim().to_string();
        for (enabled, class) in [(self.full_width, "w-full"), (self.responsive, "aspect-video")] {
            if enabled {
                if !classes.is_empty() {
                    classes.push(' ');
                }
                classes.push_str(class);
            }
        }
        classes
    }
}

impl EditSession {
    /// Replace the selection with trusted markup
    pub fn insert_html(&mut self, markup: &str) {
        if self.selection().insert(markup).is_some() {
            self.notify();
        }
    }

    /// Replace the selection with external markup after the allow-list pass
    pub fn paste_html(&mut self, markup: &str) {
        let sanitizer = self.sanitizer.clone();
        let mut selection = self.selection();
        let fragment = sanitizer.sanitize_fragment(selection.tree_mut(), markup);

        if selection.insert_node(fragment).is_some() {
            self.notify();
        } else {
            self.document.tree_mut().remove(fragment);
        }
    }

    /// Replace the selection with plain text; line breaks become `<br>`
    pub fn paste_text(&mut self, text: &str) {
        let mut selection = self.selection();
        let tree = selection.tree_mut();
        let fragment = tree.create_fragment();
        for (index, line) in text.lines().enumerate() {
            if index > 0 {
                let br = tree.create_element(Tag::Br);
                tree.append_child(fragment, br);
            }
            let node = tree.create_text(line);
            tree.append_child(fragment, node);
        }

        if selection.insert_node(fragment).is_some() {
            self.notify();
        } else {
            self.document.tree_mut().remove(fragment);
        }
    }

    /// Insert a table with a header row and `rows` body rows
    pub fn insert_table(&mut self, rows: usize, cols: usize) {
        let table_classes = self.config.table_classes.clone();
        let cell_classes = self.config.table_cell_classes.clone();

        let mut selection = self.selection();
        if selection.current_range().is_none() {
            return;
        }
        let tree = selection.tree_mut();

        let table = tree.create_element(Tag::Table);
        tree.set_attribute(table, "class", table_classes);

        let head = tree.create_element(Tag::Thead);
        let header_row = tree.create_element(Tag::Tr);
        for c in 0..cols {
            let cell = table_cell(tree, Tag::Th, &cell_classes, format!("Header {}", c + 1));
            tree.append_child(header_row, cell);
        }
        tree.append_child(head, header_row);
        tree.append_child(table, head);

        let body = tree.create_element(Tag::Tbody);
        for r in 0..rows {
            let row = tree.create_element(Tag::Tr);
            for c in 0..cols {
                let cell = table_cell(tree, Tag::Td, &cell_classes, format!("Row {}, Cell {}", r + 1, c + 1));
                tree.append_child(row, cell);
            }
            tree.append_child(body, row);
        }
        tree.append_child(table, body);

        tracing::debug!("[Insert] table {}x{}", rows, cols);
        if selection.insert_node(table).is_some() {
            self.notify();
        }
    }

    /// Insert a link over the selection, or update the link around the caret
    pub fn insert_link(&mut self, payload: &LinkPayload) {
        let url = payload.url.trim();
        if url.is_empty() {
            return;
        }
        let href = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("https://{}", url)
        };
        let text = payload
            .text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(href.as_str())
            .to_string();
        let link_style = self.config.link_style.clone();

        let mut selection = self.selection();
        let region = selection.region();
        let existing = selection.anchor().and_then(|anchor| {
            selection
                .tree()
                .closest(anchor.node, |tree, id| id == region || tree.tag(id) == Some(&Tag::A))
                .filter(|&link| link != region)
        });

        let tree = selection.tree_mut();
        match existing {
            Some(link) => {
                tracing::debug!("[Insert] updating existing link");
                fill_link(tree, link, &href, &payload.target, &text, &link_style);
                selection.collapse_after(link);
            }
            None => {
                let link = tree.create_element(Tag::A);
                fill_link(tree, link, &href, &payload.target, &text, &link_style);
                if selection.insert_node(link).is_none() {
                    self.document.tree_mut().remove(link);
                    return;
                }
            }
        }
        self.notify();
    }

    /// Insert an image at the start of the selection
    pub fn insert_image(&mut self, payload: &ImagePayload) -> Option<NodeId> {
        let mut selection = self.selection();
        selection.current_range()?;

        let image = selection.tree_mut().create_element(Tag::Img);
        payload.apply(selection.tree_mut(), image);
        selection.insert_at_start(image)?;

        self.notify();
        Some(image)
    }

    /// Re-apply a payload to an image already in the document
    pub fn update_image(&mut self, image: NodeId, payload: &ImagePayload) -> bool {
        if !self.is_region_image(image) {
            return false;
        }
        payload.apply(self.document.tree_mut(), image);
        self.notify();
        true
    }

    pub fn align_image(&mut self, image: NodeId, alignment: ImageAlignment) -> bool {
        if !self.is_region_image(image) {
            return false;
        }
        let (margin, float) = match alignment {
            ImageAlignment::Left => ("0", "left"),
            ImageAlignment::Center => ("0 auto", "none"),
            ImageAlignment::Right => ("0", "right"),
        };
        let tree = self.document.tree_mut();
        style::set_style(tree, image, "display", "inline");
        style::set_style(tree, image, "margin", margin);
        style::set_style(tree, image, "float", float);
        self.notify();
        true
    }

    pub fn remove_image(&mut self, image: NodeId) -> bool {
        if !self.is_region_image(image) {
            return false;
        }
        let caret = Position::before(self.document.tree(), image);
        self.document.tree_mut().remove(image);
        if self.current_range().is_none() {
            self.selection = caret.map(crate::range::SelectionRange::collapsed);
        }
        self.notify();
        true
    }

    /// Insert a download link opening in a new tab. Script-capable URLs
    /// are refused.
    pub fn insert_file_link(&mut self, url: &str, title: Option<&str>) {
        let url = url.trim();
        if url.is_empty() {
            return;
        }
        if policy::is_dangerous_url(url) {
            tracing::debug!("[Insert] refusing file link {:?}", url);
            return;
        }
        let text = title.map(str::trim).filter(|title| !title.is_empty()).unwrap_or(url).to_string();
        let link_style = self.config.link_style.clone();

        let mut selection = self.selection();
        if selection.current_range().is_none() {
            return;
        }
        let tree = selection.tree_mut();
        let link = tree.create_element(Tag::A);
        fill_link(tree, link, url, "_blank", &text, &link_style);

        if selection.insert_at_start(link).is_some() {
            self.notify();
        }
    }

    /// Embed a video frame at the start of the selection.
    ///
    /// The source is validated before anything is touched; an unusable
    /// source is the one error this engine reports.
    pub fn insert_video(&mut self, payload: &VideoPayload) -> Result<Option<NodeId>, EditorError> {
        let source = payload.source.trim();
        if source.is_empty() {
            return Ok(None);
        }
        let attributes = self.frame_attributes(source)?;

        let mut selection = self.selection();
        if selection.current_range().is_none() {
            return Ok(None);
        }
        let tree = selection.tree_mut();
        let frame = tree.create_element(Tag::Iframe);
        for (name, value) in attributes {
            tree.set_attribute(frame, name, value);
        }
        let classes = payload.class_list();
        if !classes.is_empty() {
            tree.set_attribute(frame, "class", classes);
        }
        if !payload.styles.trim().is_empty() {
            tree.set_attribute(frame, "style", payload.styles.trim());
        }
        tree.set_attribute(frame, "title", payload.title.as_str());

        if selection.insert_at_start(frame).is_none() {
            self.document.tree_mut().remove(frame);
            return Ok(None);
        }
        tracing::debug!("[Insert] embedded video frame");
        self.notify();
        Ok(Some(frame))
    }

    fn is_region_image(&self, image: NodeId) -> bool {
        let tree = self.document.tree();
        tree.tag(image) == Some(&Tag::Img) && tree.is_inclusive_ancestor(self.document.region(), image)
    }

    /// Attributes for a frame built from `source`, or the reason it is
    /// unusable
    fn frame_attributes(&self, source: &str) -> Result<Vec<(String, String)>, EditorError> {
        let invalid = || EditorError::InvalidVideoSource(source.to_string());

        let mut scratch = Tree::new(Tag::Div);
        let fragment = parse_fragment(&mut scratch, source);
        let pasted_frame = scratch
            .descendants(fragment)
            .into_iter()
            .any(|id| scratch.tag(id) == Some(&Tag::Iframe));

        if pasted_frame {
            self.sanitizer.sanitize(&mut scratch, fragment);
            let frame = scratch
                .descendants(fragment)
                .into_iter()
                .find(|&id| scratch.tag(id) == Some(&Tag::Iframe))
                .ok_or_else(invalid)?;
            let attributes = scratch
                .element(frame)
                .map(|element| {
                    element
                        .attributes
                        .iter()
                        .map(|(name, value)| (name.clone(), value.clone()))
                        .collect()
                })
                .unwrap_or_default();
            return Ok(attributes);
        }

        let src = if embed_pattern().is_match(source) {
            let origin = Url::parse(&self.config.document_origin).ok();
            policy::trusted_embed(source, origin.as_ref()).ok_or_else(invalid)?;
            source.to_string()
        } else if let Some(captures) = watch_pattern().captures(source) {
            format!("https://www.youtube.com/embed/{}", &captures[1])
        } else {
            return Err(invalid());
        };

        Ok(vec![
            ("src".to_string(), src),
            ("frameborder".to_string(), "0".to_string()),
            ("allow".to_string(), VIDEO_ALLOW.to_string()),
            ("allowfullscreen".to_string(), String::new()),
            ("referrerpolicy".to_string(), VIDEO_REFERRER_POLICY.to_string()),
            ("sandbox".to_string(), EMBED_SANDBOX.to_string()),
        ])
    }
}

fn table_cell(tree: &mut Tree, tag: Tag, classes: &str, label: String) -> NodeId {
    let cell = tree.create_element(tag);
    tree.set_attribute(cell, "class", classes);
    let text = tree.create_text(label);
    tree.append_child(cell, text);
    cell
}

fn fill_link(tree: &mut Tree, link: NodeId, href: &str, target: &str, text: &str, link_style: &str) {
    tree.set_attribute(link, "href", href);
    tree.set_attribute(link, "target", target);
    tree.set_attribute(link, "style", link_style);
    for child in tree.children(link).to_vec() {
        tree.remove(child);
    }
    let label = tree.create_text(text);
    tree.append_child(link, label);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    fn session(markup: &str) -> EditSession {
        EditSession::new(Document::from_markup(markup))
    }

    #[test]
    fn test_paste_html_is_sanitized() {
        let mut session = session("<p>ab</p>");
        session.select_text(1, 1).unwrap();
        session.paste_html(r#"<span onclick="x()">hi</span><script>bad()</script>"#);
        assert_eq!(session.markup(), "<p>a<span>hi</span>bad()b</p>");
    }

    #[test]
    fn test_paste_text_lines() {
        let mut session = session("<p>x</p>");
        session.select_all();
        session.paste_text("one\ntwo");
        assert_eq!(session.markup(), "<p>one<br>two</p>");
    }

    #[test]
    fn test_insert_table() {
        let mut session = session("");
        session.select_all();
        session.insert_table(1, 2);
        assert_eq!(
            session.markup(),
            concat!(
                r#"<table class="table-auto border-collapse w-full"><thead><tr>"#,
                r#"<th class="border px-2 py-1">Header 1</th><th class="border px-2 py-1">Header 2</th>"#,
                r#"</tr></thead><tbody><tr>"#,
                r#"<td class="border px-2 py-1">Row 1, Cell 1</td><td class="border px-2 py-1">Row 1, Cell 2</td>"#,
                r#"</tr></tbody></table>"#
            )
        );
    }

    #[test]
    fn test_insert_link_prefixes_scheme() {
        let mut session = session("<p>see docs</p>");
        session.select_text(4, 8).unwrap();
        session.insert_link(&LinkPayload {
            url: " example.com ".to_string(),
            text: None,
            target: "_blank".to_string(),
        });
        let markup = session.markup();
        assert!(markup.starts_with(r#"<p>see <a href="https://example.com" target="_blank" style="#));
        assert!(markup.ends_with(">https://example.com</a></p>"));
    }

    #[test]
    fn test_insert_link_updates_existing() {
        let mut session = session(r#"<p><a href="http://old.test">old</a></p>"#);
        session.select_text(1, 1).unwrap();
        session.insert_link(&LinkPayload {
            url: "http://new.test".to_string(),
            text: Some("new".to_string()),
            target: "_self".to_string(),
        });
        let markup = session.markup();
        assert!(markup.contains(r#"href="http://new.test""#));
        assert!(markup.contains(">new</a>"));
        assert_eq!(markup.matches("<a ").count(), 1);
    }

    #[test]
    fn test_empty_link_url_is_noop() {
        let mut session = session("<p>x</p>");
        session.select_all();
        session.insert_link(&LinkPayload {
            url: "   ".to_string(),
            text: None,
            target: "_self".to_string(),
        });
        assert_eq!(session.document.version, 0);
    }

    #[test]
    fn test_file_link_refuses_script_urls() {
        let mut session = session("<p>x</p>");
        session.select_text(0, 0).unwrap();
        session.insert_file_link("  javascript:alert(1)", Some("Report"));
        session
            .apply(crate::Command::InsertFileLink {
                url: "JavaScript:alert(1)".to_string(),
                title: None,
            })
            .unwrap();
        assert_eq!(session.markup(), "<p>x</p>");
        assert_eq!(session.document.version, 0);

        session.insert_file_link("files/report.pdf", Some("Report"));
        let markup = session.markup();
        assert!(markup.contains(r#"href="files/report.pdf" target="_blank""#), "{}", markup);
        assert!(markup.ends_with(">Report</a>x</p>"), "{}", markup);
    }

    #[test]
    fn test_image_lifecycle() {
        let mut session = session("<p>ab</p>");
        session.select_text(1, 1).unwrap();
        let mut payload = ImagePayload::new("cat.png");
        payload.border_width = 2;
        let image = session.insert_image(&payload).unwrap();
        assert_eq!(
            session.markup(),
            r#"<p>a<img src="cat.png" alt="" style="width: 200px; float: none; border: 2px solid #000; opacity: 1; display: inline-block;">b</p>"#
        );

        assert!(session.align_image(image, ImageAlignment::Center));
        let style = session.document.tree().attribute(image, "style").unwrap().to_string();
        assert!(style.contains("display: inline;"));
        assert!(style.contains("margin: 0 auto;"));

        assert!(session.remove_image(image));
        assert_eq!(session.markup(), "<p>ab</p>");
        assert!(!session.remove_image(image));
        assert!(!session.update_image(image, &payload));
    }

    #[test]
    fn test_video_watch_url() {
        let mut session = session("<p>x</p>");
        session.select_text(0, 0).unwrap();
        let mut payload = VideoPayload::new("https://youtu.be/abc_123");
        payload.full_width = true;
        let frame = session.insert_video(&payload).unwrap().unwrap();
        let tree = session.document.tree();
        assert_eq!(tree.attribute(frame, "src"), Some("https://www.youtube.com/embed/abc_123"));
        assert_eq!(tree.attribute(frame, "sandbox"), Some(EMBED_SANDBOX));
        assert_eq!(tree.attribute(frame, "class"), Some("w-full"));
    }

    #[test]
    fn test_invalid_video_leaves_document_untouched() {
        let mut session = session("<p>x</p>");
        session.select_all();
        let err = session.insert_video(&VideoPayload::new("https://example.com/clip")).unwrap_err();
        assert!(matches!(err, EditorError::InvalidVideoSource(_)));

        let err = session
            .insert_video(&VideoPayload::new(r#"<iframe src="https://evil.example/embed/x"></iframe>"#))
            .unwrap_err();
        assert!(matches!(err, EditorError::InvalidVideoSource(_)));
        assert_eq!(session.markup(), "<p>x</p>");
        assert_eq!(session.document.version, 0);
    }

    #[test]
    fn test_pasted_trusted_frame() {
        let mut session = session("<p>x</p>");
        session.select_all();
        let frame = session
            .insert_video(&VideoPayload::new(
                r#"<iframe src="https://www.youtube.com/embed/abc" onload="x()"></iframe>"#,
            ))
            .unwrap()
            .unwrap();
        let tree = session.document.tree();
        assert_eq!(tree.attribute(frame, "onload"), None);
        assert_eq!(tree.attribute(frame, "src"), Some("https://www.youtube.com/embed/abc"));
    }
}
