//! Sanitizer and cleanup pipeline behaviour through the public API

use richedit_editor::sanitizer::{self, CleanupPass, CleanupPipeline, StripAttributes, EMBED_SANDBOX};
use richedit_editor::{Document, EditSession, SanitizationPolicy, Sanitizer, Tag};
use richedit_markup::{parse, serialize_inner};

#[test]
fn test_frame_from_untrusted_host_is_removed() {
    let sanitizer = Sanitizer::default();
    let output = sanitizer.sanitize_markup(r#"<p>before<iframe src="https://evil.example.com/embed/1"></iframe>after</p>"#);
    assert_eq!(output, "<p>beforeafter</p>");
}

#[test]
fn test_frame_from_trusted_host_is_sandboxed() {
    let sanitizer = Sanitizer::default();
    let output = sanitizer.sanitize_markup(
        r#"<iframe src="https://www.youtube.com/embed/xyz" allow="autoplay" loading="lazy"></iframe>"#,
    );
    assert_eq!(
        output,
        format!(
            r#"<iframe src="https://www.youtube.com/embed/xyz" allow="autoplay" loading="lazy" sandbox="{}"></iframe>"#,
            EMBED_SANDBOX
        )
    );
}

#[test]
fn test_trusted_frame_content_cannot_break_out() {
    let sanitizer = Sanitizer::default();
    let output = sanitizer.sanitize_markup(
        r#"<iframe src="https://www.youtube.com/embed/x"><img alt="</iframe><img src=x onerror=alert(1)>"></iframe>"#,
    );
    assert!(!output.contains("<img"), "{}", output);
    assert!(!output.contains("onerror"), "{}", output);
    assert_eq!(
        output,
        format!(
            r#"<iframe src="https://www.youtube.com/embed/x" sandbox="{}"></iframe>"#,
            EMBED_SANDBOX
        )
    );
}

#[test]
fn test_attribute_values_cannot_open_tags() {
    let sanitizer = Sanitizer::default();
    let output = sanitizer.sanitize_markup(r#"<img src="x.png" alt="</p><img src=x onerror=alert(1)>">"#);
    assert_eq!(
        output,
        r#"<img src="x.png" alt="&lt;/p&gt;&lt;img src=x onerror=alert(1)&gt;">"#
    );
    assert_eq!(output.matches('<').count(), 1);
}

#[test]
fn test_lookalike_host_is_not_trusted() {
    let sanitizer = Sanitizer::default();
    let output = sanitizer.sanitize_markup(r#"<iframe src="https://notyoutube.com/embed/x"></iframe>"#);
    assert_eq!(output, "");
}

#[test]
fn test_disallowed_elements_keep_their_text() {
    let sanitizer = Sanitizer::default();
    let output = sanitizer.sanitize_markup("<article><header>Title</header><p>Body <mark>text</mark></p></article>");
    assert_eq!(output, "Title<p>Body text</p>");
}

#[test]
fn test_policy_tables() {
    assert!(SanitizationPolicy::is_allowed_tag(&Tag::P));
    assert!(SanitizationPolicy::is_allowed_tag(&Tag::Iframe));
    assert!(!SanitizationPolicy::is_allowed_tag(&Tag::from_name("script")));
    assert_eq!(SanitizationPolicy::allowed_attributes(&Tag::A), &["href"]);
    assert!(SanitizationPolicy::allowed_attributes(&Tag::P).is_empty());
}

#[test]
fn test_paste_runs_allow_list() {
    let mut session = EditSession::new(Document::new());
    session.select_all();
    session.paste_html(r#"<p style="color:red" onclick="go()">safe</p><iframe src="https://evil.example.com"></iframe>"#);
    assert_eq!(session.markup(), "<p>safe</p>");
}

#[test]
fn test_clean_whole_region() {
    let mut session = EditSession::new(Document::from_markup(
        r#"<p class="a"><span style="font-size: 20px;">big</span> <b></b>words</p>"#,
    ));
    session.select_all();
    let cleaned = session.clean_selection().unwrap();
    assert_eq!(cleaned, "<p>big words</p>");
    assert_eq!(session.markup(), "<p>big words</p>");
}

#[test]
fn test_clean_anchor_element_only() {
    let mut session = EditSession::new(Document::from_markup(r#"<p><b>one</b></p><p><i style="x">two</i></p>"#));
    session.select_text(4, 5).unwrap();
    let cleaned = session.clean_selection().unwrap();
    assert_eq!(cleaned, "two");
    assert_eq!(session.markup(), "<p><b>one</b></p><p>two</p>");
}

#[test]
fn test_clean_selected_content_only() {
    let mut session = EditSession::new(Document::from_markup("<p>ab<b>cd</b></p>"));
    session.select_text(0, 3).unwrap();
    let cleaned = session.clean_selection().unwrap();
    assert_eq!(cleaned, "abc");
    assert_eq!(session.markup(), "<p>abc<b>d</b></p>");
}

#[test]
fn test_clean_without_selection_is_noop() {
    let mut session = EditSession::new(Document::from_markup("<p><b>x</b></p>"));
    assert!(session.clean_selection().is_none());
    assert_eq!(session.document.version, 0);
}

#[test]
fn test_clean_is_idempotent() {
    let mut session = EditSession::new(Document::from_markup(
        r#"<div id="d"><p><em> </em><strong>a</strong></p><br><ul><li><u>b</u></li></ul></div>"#,
    ));
    session.select_all();
    session.clean_selection();
    let once = session.markup();

    session.select_all();
    session.clean_selection();
    assert_eq!(session.markup(), once);
}

#[test]
fn test_custom_pipeline() {
    #[derive(Debug)]
    struct DropImages;

    impl CleanupPass for DropImages {
        fn name(&self) -> &'static str {
            "drop-images"
        }

        fn apply(&self, tree: &mut richedit_editor::Tree, root: richedit_editor::NodeId) {
            for id in tree.descendants(root) {
                if tree.tag(id) == Some(&Tag::Img) {
                    tree.remove(id);
                }
            }
        }
    }

    let mut pipeline = CleanupPipeline::empty();
    pipeline.add_pass(Box::new(StripAttributes));
    pipeline.add_pass(Box::new(DropImages));

    let mut tree = parse(Tag::Div, r#"<p class="x">a<img src="i.png">b</p>"#);
    let root = tree.root();
    pipeline.run(&mut tree, root);
    assert_eq!(serialize_inner(&tree, root), "<p>ab</p>");
    assert_eq!(sanitizer::cleanup::normalize_whitespace(" a  b "), "a b");
}
