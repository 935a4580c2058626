use logos::{Lexer, Logos};
use std::fmt;
use std::ops::Range;

/// Markup tokens
///
/// Start tags are lexed whole (attributes included) and split apart by the
/// parser; everything that is not a tag is text.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token<'src> {
    /// Comments, doctypes and processing instructions
    #[token("<!", skip_declaration)]
    #[token("<?", skip_declaration)]
    Declaration,

    #[regex(r"</[a-zA-Z][a-zA-Z0-9:-]*[^>]*>", end_tag_name)]
    EndTag(&'src str),

    #[regex(r#"<[a-zA-Z][a-zA-Z0-9:-]*([^<>"']|"[^"]*"|'[^']*')*>"#, |lex| lex.slice())]
    StartTag(&'src str),

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),

    /// A `<` that does not open a tag
    #[token("<")]
    Lt,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Declaration => write!(f, "<!...>"),
            Token::EndTag(name) => write!(f, "</{}>", name),
            Token::StartTag(raw) => write!(f, "{}", raw),
            Token::Text(text) => write!(f, "{}", text),
            Token::Lt => write!(f, "<"),
        }
    }
}

fn skip_declaration<'src>(lex: &mut Lexer<'src, Token<'src>>) -> bool {
    let rest = lex.remainder();
    let consumed = if let Some(comment) = rest.strip_prefix("--") {
        comment
            .find("-->")
            .map(|end| 2 + end + 3)
            .unwrap_or(rest.len())
    } else {
        rest.find('>').map(|end| end + 1).unwrap_or(rest.len())
    };
    lex.bump(consumed);
    true
}

fn end_tag_name<'src>(lex: &mut Lexer<'src, Token<'src>>) -> &'src str {
    let inner = &lex.slice()[2..];
    let end = inner
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == ':' || c == '-'))
        .unwrap_or(inner.len());
    &inner[..end]
}

/// Tokenize markup into tokens with byte spans
pub fn tokenize(source: &str) -> Vec<(Token<'_>, Range<usize>)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((token, span)),
            // Anything the lexer rejects is carried through as text
            Err(_) => tokens.push((Token::Text(&source[span.clone()]), span)),
        }
    }

    tokens
}
