use criterion::{black_box, criterion_group, criterion_main, Criterion};
use richedit_markup::{parse, serialize_inner, Tag};

fn parse_simple_paragraphs(c: &mut Criterion) {
    let source = r#"
        <p>Hello <strong>World</strong></p>
        <p class="lead" style="margin-left: 20px">Second <em>paragraph</em></p>
        <ul class="list-disc list-inside"><li>one</li><li>two</li></ul>
    "#;

    c.bench_function("parse_simple_paragraphs", |b| {
        b.iter(|| parse(Tag::Div, black_box(source)))
    });
}

fn parse_pasted_document(c: &mut Criterion) {
    let row = r#"<tr><td class="border px-2 py-1"><span style="color:red">cell &amp; text</span></td></tr>"#;
    let source = format!(
        "<!-- pasted --><table><tbody>{}</tbody></table><p>tail <font face=x>legacy</font></p>",
        row.repeat(200)
    );

    c.bench_function("parse_pasted_document", |b| {
        b.iter(|| parse(Tag::Div, black_box(&source)))
    });
}

fn serialize_document(c: &mut Criterion) {
    let source = "<p>Lorem <b>ipsum</b> dolor <a href=\"https://example.com\">sit</a> amet</p>".repeat(500);
    let tree = parse(Tag::Div, &source);

    c.bench_function("serialize_document", |b| {
        b.iter(|| serialize_inner(black_box(&tree), tree.root()))
    });
}

criterion_group!(
    benches,
    parse_simple_paragraphs,
    parse_pasted_document,
    serialize_document
);
criterion_main!(benches);
