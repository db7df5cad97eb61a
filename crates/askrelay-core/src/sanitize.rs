//! Allow-list output sanitizer.
//!
//! Everything is HTML-escaped first. Afterwards only the escaped *bare*
//! forms of allow-listed tags (`<p>`, `</p>`, `<br/>` ...) are turned back
//! into live markup. A tag carrying attributes, or any whitespace inside the
//! brackets, never matches and stays escaped, so attributes cannot survive.
//!
//! Limitations:
//! - No DOM awareness. Unbalanced or mis-nested allowed tags are restored
//!   as-is; the browser repairs the tree.
//! - Not idempotent. Sanitizing twice escapes `&` again, so
//!   `sanitize(sanitize(s))` differs from `sanitize(s)` whenever the first
//!   pass produced an entity.

use askrelay_types::config::SanitizerSettings;

/// Tags restored to live markup when they appear bare.
pub const ALLOWED_TAGS: &[&str] = &[
    "p",
    "br",
    "hr",
    "em",
    "i",
    "strong",
    "b",
    "ul",
    "ol",
    "li",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "code",
    "pre",
    "blockquote",
];

/// Allowed tags that may also appear self-closed as `<br/>`.
const VOID_TAGS: &[&str] = &["br", "hr"];

const LT: &str = "&lt;";
const GT: &str = "&gt;";

/// Optional passes on top of the allow-list. Both off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeOptions {
    /// If the text is a whole HTML document, keep only the inside of
    /// `<body>` (or `<html>` when there is no body).
    pub unwrap_document: bool,
    /// Turn line breaks into live `<br>` tags.
    pub preserve_newlines: bool,
}

impl From<&SanitizerSettings> for SanitizeOptions {
    fn from(settings: &SanitizerSettings) -> Self {
        Self {
            unwrap_document: settings.unwrap_document,
            preserve_newlines: settings.preserve_newlines,
        }
    }
}

/// Sanitize with default options.
pub fn sanitize(input: &str) -> String {
    sanitize_with(input, SanitizeOptions::default())
}

pub fn sanitize_with(input: &str, options: SanitizeOptions) -> String {
    let escaped = escape_html(input);
    let scoped = if options.unwrap_document {
        document_inner(&escaped)
    } else {
        escaped.as_str()
    };

    let restored = restore_allowed_tags(scoped);
    if options.preserve_newlines {
        restored
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .replace('\n', "<br>")
    } else {
        restored
    }
}

/// Escape the five HTML-significant characters.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + input.len() / 8);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str(LT),
            '>' => out.push_str(GT),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn restore_allowed_tags(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut rest = escaped;

    while let Some(pos) = rest.find(LT) {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos + LT.len()..];
        match bare_tag(candidate) {
            Some((tag, consumed)) => {
                out.push_str(&tag);
                rest = &candidate[consumed..];
            }
            None => {
                out.push_str(LT);
                rest = candidate;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Match `name&gt;`, `/name&gt;` or (void tags) `name/&gt;` at the start of
/// `s`. Returns the live tag and the number of bytes consumed.
fn bare_tag(s: &str) -> Option<(String, usize)> {
    let (closing, body) = match s.strip_prefix('/') {
        Some(body) => (true, body),
        None => (false, s),
    };
    let prefix_len = s.len() - body.len();

    let name_len = body
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(body.len());
    if name_len == 0 {
        return None;
    }
    let name = body[..name_len].to_ascii_lowercase();
    let tag = ALLOWED_TAGS.iter().copied().find(|t| *t == name)?;
    let after = &body[name_len..];

    if after.starts_with(GT) {
        let live = if closing {
            format!("</{tag}>")
        } else {
            format!("<{tag}>")
        };
        return Some((live, prefix_len + name_len + GT.len()));
    }

    if !closing && VOID_TAGS.contains(&tag) && after.starts_with("/&gt;") {
        return Some((format!("<{tag}/>"), name_len + 1 + GT.len()));
    }

    None
}

fn document_inner(escaped: &str) -> &str {
    element_inner(escaped, "body")
        .or_else(|| element_inner(escaped, "html"))
        .unwrap_or(escaped)
}

/// Text between the first escaped `<tag ...>` and the following `</tag>`.
fn element_inner<'a>(escaped: &'a str, tag: &str) -> Option<&'a str> {
    // ASCII lowercasing keeps byte offsets identical.
    let lower = escaped.to_ascii_lowercase();
    let open = format!("{LT}{tag}");
    let close = format!("{LT}/{tag}{GT}");

    let mut from = 0;
    let start = loop {
        let at = lower[from..].find(&open)? + from;
        let after = at + open.len();
        match lower[after..].chars().next() {
            Some(c) if c == '&' || c.is_whitespace() => {
                let end_of_open = lower[after..].find(GT)? + after;
                break end_of_open + GT.len();
            }
            _ => from = after,
        }
    };

    let end = lower[start..].find(&close)? + start;
    Some(&escaped[start..end])
}
