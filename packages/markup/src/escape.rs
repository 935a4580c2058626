//! Character reference decoding and markup escaping.

/// Decode the character references the editor produces or commonly sees
/// in pasted markup. Unknown references are left untouched.
pub fn unescape(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let decoded = rest[1..]
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_reference(&rest[1..1 + end]).map(|c| (c, end + 2)));

        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Escape text content
pub fn escape_text(input: &str, output: &mut String) {
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

/// Escape a double-quoted attribute value
pub fn escape_attribute(input: &str, output: &mut String) {
    for c in input.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            _ => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_named_and_numeric() {
        assert_eq!(unescape("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(unescape("&#65;&#x42;"), "AB");
        assert_eq!(unescape("x&nbsp;y"), "x\u{a0}y");
    }

    #[test]
    fn test_unknown_reference_is_kept() {
        assert_eq!(unescape("AT&T; &bogus; &"), "AT&T; &bogus; &");
    }

    #[test]
    fn test_escape_text_and_attribute() {
        let mut text = String::new();
        escape_text("<b> & \u{a0}", &mut text);
        assert_eq!(text, "&lt;b&gt; &amp; &nbsp;");

        let mut attr = String::new();
        escape_attribute("say \"hi\"", &mut attr);
        assert_eq!(attr, "say &quot;hi&quot;");

        let mut markup = String::new();
        escape_attribute("</iframe><img>", &mut markup);
        assert_eq!(markup, "&lt;/iframe&gt;&lt;img&gt;");
    }
}
