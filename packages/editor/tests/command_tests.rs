//! End-to-end checks of the command engine's documented properties

use richedit_editor::{
    Command, Document, EditSession, InlineFormat, ListStyle, RecordingSink, Tag, TextCase,
};

fn session(markup: &str) -> EditSession {
    EditSession::new(Document::from_markup(markup))
}

#[test]
fn test_toggle_twice_restores_text_and_removes_wrapper() {
    let cases = [
        ("<p>alpha beta gamma</p>", 6, 10),
        ("<p>one</p><p>two</p>", 1, 5),
        ("<p>a <em>b c</em> d</p>", 0, 7),
    ];

    for (source, start, end) in cases {
        let mut session = session(source);
        let original_text = session.document.text();

        session.select_text(start, end).unwrap();
        session.toggle_inline_format(Tag::U);
        assert!(session.markup().contains("<u>"), "{} was not wrapped", source);

        session.select_text(start, end).unwrap();
        session.toggle_inline_format(Tag::U);

        assert_eq!(session.document.text(), original_text);
        assert!(!session.markup().contains("<u>"), "{} kept a wrapper: {}", source, session.markup());
    }
}

#[test]
fn test_toggle_round_trip_restores_markup() {
    let mut session = session("<p>Hello world</p>");
    session.select_text(0, 5).unwrap();
    session.toggle_format(InlineFormat::Bold);

    session.select_text(0, 5).unwrap();
    assert!(session.is_active(InlineFormat::Bold));
    session.toggle_format(InlineFormat::Bold);
    assert_eq!(session.markup(), "<p>Hello world</p>");
}

#[test]
fn test_list_of_n_paragraphs_round_trips() {
    for n in 1..=4 {
        let source: String = (1..=n).map(|i| format!("<p>item {}</p>", i)).collect();
        let mut session = session(&source);

        session.select_all();
        session.toggle_list(Tag::Ol, ListStyle::Decimal);
        let markup = session.markup();
        assert_eq!(markup.matches("<ol").count(), 1);
        assert_eq!(markup.matches("<li>").count(), n);
        for i in 1..=n {
            assert!(markup.contains(&format!("<li>item {}</li>", i)));
        }

        session.select_all();
        session.toggle_list(Tag::Ol, ListStyle::Decimal);
        assert_eq!(session.markup(), source);
    }
}

#[test]
fn test_wrap_block_drops_identity_attribute() {
    let mut session = session(r#"<p class="x" id="y">text</p>"#);
    session.select_text(0, 4).unwrap();
    session.wrap_block(Tag::Blockquote);
    assert_eq!(session.markup(), r#"<blockquote class="x">text</blockquote>"#);
}

#[test]
fn test_uppercase_per_text_node() {
    let mut session = session("<p><em>Hello</em> World</p>");
    session.select_text(0, 11).unwrap();
    session.transform_text(TextCase::Uppercase);
    assert_eq!(session.markup(), "<p><em>HELLO</em> WORLD</p>");
}

#[test]
fn test_indent_steps_and_never_goes_negative() {
    let mut session = session("<p>x</p>");
    session.select_text(0, 0).unwrap();

    session.change_indent(true);
    assert_eq!(session.markup(), r#"<p style="margin-left: 20px;">x</p>"#);
    session.change_indent(true);
    assert_eq!(session.markup(), r#"<p style="margin-left: 40px;">x</p>"#);

    let mut flat = self::session("<p>x</p>");
    flat.select_text(0, 0).unwrap();
    flat.change_indent(false);
    assert_eq!(flat.markup(), r#"<p style="margin-left: 0px;">x</p>"#);
}

#[test]
fn test_caret_restored_after_indent() {
    let mut session = session("<p>abc</p>");
    session.select_text(2, 2).unwrap();
    session.change_indent(true);
    session.insert_html("X");
    assert_eq!(session.document.text(), "abXc");
}

#[test]
fn test_block_commands_notify_once_each() {
    let sink = RecordingSink::new();
    let mut session = EditSession::new(Document::from_markup("<p>a</p><p>b</p>").with_sink(sink.clone()));

    let script = vec![
        Command::SelectAll,
        Command::ToggleList {
            tag: "ul".into(),
            style: ListStyle::Disc,
        },
        Command::SelectAll,
        Command::ToggleList {
            tag: "ol".into(),
            style: ListStyle::LowerAlpha,
        },
        Command::SelectAll,
        Command::ToggleList {
            tag: "ol".into(),
            style: ListStyle::LowerAlpha,
        },
    ];
    for command in script {
        session.apply(command).unwrap();
    }

    assert_eq!(sink.count(), 3);
    assert_eq!(session.markup(), "<p>a</p><p>b</p>");
}

#[test]
fn test_multi_line_heading() {
    let mut session = session("first\nsecond");
    session.select_all();
    session.heading(3);
    assert_eq!(session.markup(), "<h3>first</h3><h3>second</h3>");
}

#[test]
fn test_table_and_clean_selection() {
    let mut session = session(r#"<p><b style="color: red;">styled</b> text</p>"#);
    session.select_all();
    let cleaned = session.clean_selection().unwrap();
    assert_eq!(cleaned, "<p>styled text</p>");
    assert_eq!(session.markup(), "<p>styled text</p>");

    session.apply(Command::InsertTable { rows: 2, cols: 1 }).unwrap();
    assert_eq!(session.markup().matches("<tr>").count(), 3);
}
