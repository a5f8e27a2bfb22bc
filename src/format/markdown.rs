//! Markdown transforms applied between code block extraction and restore
//!
//! Each pass takes the output of the previous one. Input is already
//! HTML-escaped, so any `<` seen here was produced by an earlier pass.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::format::code_block::starts_with_placeholder;

static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold regex"));

// `[^\S\r\n]` is whitespace that does not cross into the next line. The
// header text stops before a CRLF or LF line ending.
static H3_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^###[^\S\r\n]+([^\r\n]*)").expect("valid h3 regex"));
static H2_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^##[^\S\r\n]+([^\r\n]*)").expect("valid h2 regex"));
static H1_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#[^\S\r\n]+([^\r\n]*)").expect("valid h1 regex"));

static LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)simple words me:").expect("valid label regex"));

static INLINE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+)`").expect("valid inline code regex"));

static PARAGRAPH_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\n+").expect("valid paragraph regex"));

/// `**text**` → `<strong>text</strong>`. Does not span lines.
pub fn apply_bold(text: &str) -> String {
    BOLD_RE
        .replace_all(text, "<strong>${1}</strong>")
        .into_owned()
}

/// Line-leading `#`, `##`, `###` → `<h1>`, `<h2>`, `<h3>`.
///
/// Longest prefix first, so `###` is never read as `#` followed by `##`.
/// Four or more hashes are left alone.
pub fn apply_headers(text: &str) -> String {
    let text = H3_RE.replace_all(text, "<h3>${1}</h3>");
    let text = H2_RE.replace_all(&text, "<h2>${1}</h2>");
    let text = H1_RE.replace_all(&text, "<h1>${1}</h1>");
    text.into_owned()
}

/// Item text of an unordered list line (`* x` or `- x`).
fn unordered_item(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(&['*', '-'][..])?;
    strip_marker_gap(rest)
}

/// Item text of an ordered list line (`12. x`).
fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    strip_marker_gap(rest)
}

/// The whitespace between a list marker and its text is mandatory.
fn strip_marker_gap(rest: &str) -> Option<&str> {
    let item = rest.trim_start();
    if item.len() == rest.len() {
        None
    } else {
        Some(item)
    }
}

/// Split a line produced by `split_inclusive('\n')` into body and ending.
fn split_line_ending(line: &str) -> (&str, &str) {
    let body_len = line
        .strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .map_or(line.len(), str::len);
    line.split_at(body_len)
}

/// Group every maximal run of lines accepted by `item` into one list.
fn group_list_runs(text: &str, tag: &str, item: fn(&str) -> Option<&str>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut items: Vec<&str> = Vec::new();
    let mut run_ending = "";

    for line in text.split_inclusive('\n') {
        let (body, ending) = split_line_ending(line);
        if let Some(entry) = item(body) {
            items.push(entry);
            run_ending = ending;
            continue;
        }
        flush_list(&mut out, &mut items, tag, run_ending);
        out.push_str(line);
    }
    flush_list(&mut out, &mut items, tag, run_ending);

    out
}

fn flush_list(out: &mut String, items: &mut Vec<&str>, tag: &str, ending: &str) {
    if items.is_empty() {
        return;
    }
    out.push('<');
    out.push_str(tag);
    out.push('>');
    for entry in items.drain(..) {
        out.push_str("<li>");
        out.push_str(entry);
        out.push_str("</li>");
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
    out.push_str(ending);
}

/// Runs of `*`/`-` lines → `<ul>`.
pub fn apply_unordered_lists(text: &str) -> String {
    group_list_runs(text, "ul", unordered_item)
}

/// Runs of `N.` lines → `<ol>`.
pub fn apply_ordered_lists(text: &str) -> String {
    group_list_runs(text, "ol", ordered_item)
}

/// Wrap every `Simple words me:` (any casing) in the label container.
pub fn apply_labels(text: &str) -> String {
    LABEL_RE
        .replace_all(text, r#"<div class="simple-words-label">${0}</div>"#)
        .into_owned()
}

/// `` `code` `` → `<code class="inline-code">code</code>`.
pub fn apply_inline_code(text: &str) -> String {
    INLINE_CODE_RE
        .replace_all(text, r#"<code class="inline-code">${1}</code>"#)
        .into_owned()
}

/// Wrap plain blocks in `<p>`, converting single newlines to `<br>`.
///
/// Blocks that already start with markup or a code block placeholder are
/// passed through so headers, lists and code are not wrapped twice.
pub fn wrap_paragraphs(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for block in PARAGRAPH_BREAK_RE.split(text) {
        let trimmed = block.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('<') || starts_with_placeholder(trimmed) {
            out.push_str(block);
        } else {
            out.push_str("<p>");
            out.push_str(&block.replace('\n', "<br>"));
            out.push_str("</p>");
        }
    }
    out
}
