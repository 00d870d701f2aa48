//! Text helpers: tag stripping, entity handling, sentence splitting.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches comments, declarations and start/end tags.
///
/// Group 1 is the closing slash, group 2 the tag name, group 3 the raw
/// attribute text (ends with `/` for self-closing tags). Comments and
/// declarations have no group 2.
pub(crate) static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)<!--.*?-->|<![^>]*>|<\?[^>]*>|<(/?)([a-zA-Z][a-zA-Z0-9:-]*)((?:[^>"']|"[^"]*"|'[^']*')*)>"#,
    )
    .unwrap()
});

/// Tags whose content is never markup.
pub(crate) const RAW_TEXT_TAGS: &[&str] = &["script", "style", "textarea"];

/// Tags that separate words when stripped.
pub(crate) const BREAKING_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "ol", "p", "pre", "section", "table", "tbody", "td", "tfoot", "th", "thead", "tr",
    "ul",
];

/// Strip tags, drop script/style bodies, decode entities and collapse whitespace.
pub fn visible_text(markup: &str) -> String {
    let lower = markup.to_ascii_lowercase();
    let mut out = String::with_capacity(markup.len());
    let mut pos = 0;

    while let Some(caps) = TAG_RE.captures_at(markup, pos) {
        let Some(whole) = caps.get(0) else { break };
        out.push_str(&markup[pos..whole.start()]);
        pos = whole.end();

        let Some(name) = caps.get(2) else { continue };
        let name = name.as_str().to_ascii_lowercase();
        let closing = caps.get(1).is_some_and(|c| !c.as_str().is_empty());

        if BREAKING_TAGS.contains(&name.as_str()) {
            out.push(' ');
        }
        if !closing && RAW_TEXT_TAGS.contains(&name.as_str()) {
            pos = skip_raw_text(&lower, &name, pos).1;
        }
    }
    out.push_str(&markup[pos..]);

    collapse_whitespace(&decode_entities(&out))
}

/// Find the end of a raw-text element body starting at `from`.
///
/// Returns `(content_end, resume_at)`: where the body stops and where
/// scanning continues after the closing tag.
pub(crate) fn skip_raw_text(lower: &str, tag: &str, from: usize) -> (usize, usize) {
    let needle = format!("</{}", tag);
    match lower[from..].find(&needle) {
        Some(rel) => {
            let start = from + rel;
            let resume = lower[start..]
                .find('>')
                .map(|gt| start + gt + 1)
                .unwrap_or(lower.len());
            (start, resume)
        }
        None => (lower.len(), lower.len()),
    }
}

/// Decode the handful of entities rendered content commonly carries.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Escape text for inclusion in markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split text into sentence-like chunks on a terminator followed by whitespace.
///
/// Chunks are trimmed and keep their terminator; empty chunks are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if (b == b'.' || b == b'!' || b == b'?')
            && i + 1 < bytes.len()
            && bytes[i + 1].is_ascii_whitespace()
        {
            let s = text[start..=i].trim();
            if !s.is_empty() {
                sentences.push(s);
            }
            start = i + 1;
        }
    }
    let s = text[start..].trim();
    if !s.is_empty() {
        sentences.push(s);
    }
    sentences
}

/// Byte offsets just past each sentence terminator in `markup` where the
/// markup may be cut.
///
/// A terminator qualifies when it is followed by whitespace, lies in text
/// rather than inside a tag, and is not nested in an element named in
/// `protected`. Raw-text bodies are never cut.
pub fn sentence_breaks(markup: &str, protected: &[&str]) -> Vec<usize> {
    let lower = markup.to_ascii_lowercase();
    let mut breaks = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut pos = 0;

    loop {
        let next = TAG_RE.captures_at(markup, pos);
        let text_end = next
            .as_ref()
            .and_then(|caps| caps.get(0))
            .map_or(markup.len(), |m| m.start());
        if open.is_empty() {
            push_text_breaks(markup.as_bytes(), pos..text_end, &mut breaks);
        }

        let Some(caps) = next else { break };
        let Some(whole) = caps.get(0) else { break };
        pos = whole.end();

        let Some(name) = caps.get(2) else { continue };
        let tag = name.as_str().to_ascii_lowercase();
        if caps.get(1).is_some_and(|c| !c.as_str().is_empty()) {
            if let Some(depth) = open.iter().rposition(|t| *t == tag) {
                open.truncate(depth);
            }
            continue;
        }
        if RAW_TEXT_TAGS.contains(&tag.as_str()) {
            pos = skip_raw_text(&lower, &tag, pos).1;
            continue;
        }
        let self_closing = caps
            .get(3)
            .is_some_and(|attrs| attrs.as_str().trim_end().ends_with('/'));
        if !self_closing && protected.contains(&tag.as_str()) {
            open.push(tag);
        }
    }
    breaks
}

fn push_text_breaks(bytes: &[u8], span: std::ops::Range<usize>, breaks: &mut Vec<usize>) {
    for i in span {
        if matches!(bytes[i], b'.' | b'!' | b'?')
            && bytes.get(i + 1).is_some_and(|b| b.is_ascii_whitespace())
        {
            breaks.push(i + 1);
        }
    }
}

/// Number of sentence-ending punctuation marks.
pub fn count_terminators(text: &str) -> usize {
    text.chars().filter(|c| matches!(c, '.' | '!' | '?')).count()
}
