//! Best-effort HTML filtering for rich-text fields.
//!
//! These filters are NOT a security boundary. They strip the obvious vectors
//! (script-like elements, event-handler and `style` attributes) from content
//! written by trusted editors; anything rendering user HTML to untrusted
//! readers still needs a dedicated sanitizer or server-side enforcement.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Injected HTML filter used by `normalize` on HTML-bearing fields.
pub trait Sanitizer: Send + Sync {
    /// Must be idempotent: `sanitize(sanitize(x)) == sanitize(x)`.
    fn sanitize(&self, html: &str) -> String;
}

/// Elements removed together with their content. `embed` is a void element and
/// is dropped by the tag pass like any other tag outside the allow-list.
const DANGEROUS_ELEMENTS: [&str; 4] = ["script", "iframe", "style", "object"];

/// Formatting tags kept by [`AllowListSanitizer`].
pub const ALLOWED_TAGS: [&str; 9] = ["b", "strong", "i", "em", "u", "p", "br", "span", "div"];

/// Each pass can expose new markup (e.g. `<scr<script></script>ipt>`), so
/// filters repeat until the output stops changing. Input still changing after
/// this many passes has its remaining `<`/`>` escaped.
const MAX_PASSES: usize = 16;

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?(?:-->|\z)").expect("Invalid comment regex"));

static DANGEROUS_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DANGEROUS_ELEMENTS
        .iter()
        .map(|tag| {
            Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?(?:</{tag}\s*>|\z)"))
                .expect("Invalid element regex")
        })
        .collect()
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<(/?)([A-Za-z][A-Za-z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#).expect("Invalid tag regex")
});

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s=/"'<>]+)(?:\s*=\s*("[^"]*"|'[^']*'|[^\s"'=<>`]+))?"#).expect("Invalid attribute regex")
});

/// Keeps a small set of formatting tags, drops every other tag (keeping its
/// text), and strips `on*` / `style` attributes from the tags it keeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowListSanitizer;

impl Sanitizer for AllowListSanitizer {
    fn sanitize(&self, html: &str) -> String {
        to_fixpoint(html, |s| {
            let s = strip_dangerous(s);
            TAG_RE.replace_all(&s, rewrite_tag).into_owned()
        })
    }
}

/// Removes every tag, leaving plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripAllSanitizer;

impl Sanitizer for StripAllSanitizer {
    fn sanitize(&self, html: &str) -> String {
        to_fixpoint(html, |s| {
            let s = strip_dangerous(s);
            TAG_RE.replace_all(&s, "").into_owned()
        })
    }
}

fn to_fixpoint(input: &str, pass: impl Fn(&str) -> String) -> String {
    let mut current = input.to_string();
    for _ in 0..MAX_PASSES {
        let next = pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }

    // Still changing after the cap: give up on markup and escape what is left.
    tracing::warn!(passes = MAX_PASSES, "sanitizer did not settle; escaping remaining markup");
    escape_markup(&current)
}

/// Entity-escapes `<` and `>`. The result contains no tags, so every later
/// pass leaves it unchanged.
fn escape_markup(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

fn strip_dangerous(html: &str) -> String {
    let mut out = COMMENT_RE.replace_all(html, "").into_owned();
    for re in DANGEROUS_RES.iter() {
        out = re.replace_all(&out, "").into_owned();
    }
    out
}

fn rewrite_tag(caps: &Captures<'_>) -> String {
    let name = caps[2].to_ascii_lowercase();
    if !ALLOWED_TAGS.contains(&name.as_str()) {
        return String::new();
    }
    if !caps[1].is_empty() {
        return format!("</{name}>");
    }

    let raw_attrs = &caps[3];
    let mut out = format!("<{name}");
    for attr in ATTR_RE.captures_iter(raw_attrs) {
        let attr_name = attr[1].to_ascii_lowercase();
        if attr_name.starts_with("on") || attr_name == "style" {
            continue;
        }
        out.push(' ');
        out.push_str(&attr[0]);
    }
    if raw_attrs.trim_end().ends_with('/') {
        out.push_str(" /");
    }
    out.push('>');
    out
}
