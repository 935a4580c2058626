//! Static sanitization policy: allowed tags, per-tag attributes and
//! trusted embed hosts.

use richedit_markup::Tag;
use url::Url;

/// Hosts whose frames may stay in the document (exact or subdomain match)
pub const TRUSTED_EMBED_HOSTS: &[&str] = &["youtube.com", "youtu.be", "player.vimeo.com"];

/// Restriction applied to every retained frame
pub const EMBED_SANDBOX: &str = "allow-scripts allow-same-origin allow-presentation allow-popups";

const IMG_ATTRIBUTES: &[&str] = &["src", "alt"];
const A_ATTRIBUTES: &[&str] = &["href"];
const IFRAME_ATTRIBUTES: &[&str] = &["src", "allow", "allowfullscreen", "loading"];

/// The allow-list tables
#[derive(Debug, Clone, Copy, Default)]
pub struct SanitizationPolicy;

impl SanitizationPolicy {
    pub fn is_allowed_tag(tag: &Tag) -> bool {
        matches!(
            tag,
            Tag::P
                | Tag::Br
                | Tag::H1
                | Tag::H2
                | Tag::H3
                | Tag::H4
                | Tag::H5
                | Tag::H6
                | Tag::Blockquote
                | Tag::Strong
                | Tag::B
                | Tag::I
                | Tag::Em
                | Tag::U
                | Tag::S
                | Tag::Sub
                | Tag::Sup
                | Tag::Code
                | Tag::Pre
                | Tag::A
                | Tag::Div
                | Tag::Span
                | Tag::Ul
                | Tag::Ol
                | Tag::Li
                | Tag::Table
                | Tag::Thead
                | Tag::Tbody
                | Tag::Tfoot
                | Tag::Tr
                | Tag::Th
                | Tag::Td
                | Tag::Img
                | Tag::Iframe
        )
    }

    pub fn allowed_attributes(tag: &Tag) -> &'static [&'static str] {
        match tag {
            Tag::Img => IMG_ATTRIBUTES,
            Tag::A => A_ATTRIBUTES,
            Tag::Iframe => IFRAME_ATTRIBUTES,
            _ => &[],
        }
    }
}

/// Inline event hooks (`onclick`, `onload`, ...) are never kept
pub fn is_event_handler(name: &str) -> bool {
    name.len() > 2 && name.get(..2).is_some_and(|prefix| prefix.eq_ignore_ascii_case("on"))
}

pub fn is_url_attribute(name: &str) -> bool {
    matches!(name, "href" | "src")
}

/// Script-capable URL schemes. Image data URLs stay allowed.
pub fn is_dangerous_url(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();

    compact.starts_with("javascript:")
        || compact.starts_with("vbscript:")
        || (compact.starts_with("data:") && !compact.starts_with("data:image/"))
}

pub fn is_trusted_host(host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    TRUSTED_EMBED_HOSTS.iter().any(|trusted| {
        host == *trusted
            || host
                .strip_suffix(trusted)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// Resolve a frame source against `origin`; `Some` only for an http(s)
/// URL on a trusted host
pub fn trusted_embed(src: &str, origin: Option<&Url>) -> Option<Url> {
    let src = src.trim();
    let url = match origin {
        Some(base) => base.join(src).ok()?,
        None => Url::parse(src).ok()?,
    };
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?;
    is_trusted_host(host).then_some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trusted_hosts_match_exact_or_subdomain() {
        assert!(is_trusted_host("youtube.com"));
        assert!(is_trusted_host("www.youtube.com"));
        assert!(is_trusted_host("player.vimeo.com"));
        assert!(!is_trusted_host("evilyoutube.com"));
        assert!(!is_trusted_host("youtube.com.evil.example"));
        assert!(!is_trusted_host("vimeo.com"));
    }

    #[test]
    fn test_trusted_embed_resolution() {
        let origin = Url::parse("http://localhost").ok();
        assert!(trusted_embed("https://www.youtube.com/embed/abc", origin.as_ref()).is_some());
        assert!(trusted_embed("//player.vimeo.com/video/1", origin.as_ref()).is_some());
        assert!(trusted_embed("/embed/local", origin.as_ref()).is_none());
        assert!(trusted_embed("javascript:alert(1)", origin.as_ref()).is_none());
        assert!(trusted_embed("/relative", None).is_none());
    }

    #[test]
    fn test_dangerous_urls() {
        assert!(is_dangerous_url("javascript:alert(1)"));
        assert!(is_dangerous_url("  JavaScript :alert(1)"));
        assert!(is_dangerous_url("java\tscript:alert(1)"));
        assert!(is_dangerous_url("data:text/html;base64,xyz"));
        assert!(!is_dangerous_url("data:image/png;base64,xyz"));
        assert!(!is_dangerous_url("https://example.com"));
    }

    #[test]
    fn test_event_handlers() {
        assert!(is_event_handler("onclick"));
        assert!(is_event_handler("ONLOAD"));
        assert!(!is_event_handler("on"));
        assert!(!is_event_handler("src"));
    }
}
