//! Fenced code block extraction and widget rendering
//!
//! Fenced blocks are lifted out of the text before any markdown transform
//! runs and replaced by opaque placeholder tokens. After the transforms the
//! tokens are expanded into the code-block widget (language dropdown, copy
//! button and the highlighted `<pre><code>` body).

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use uuid::Uuid;

use crate::format::escape::escape_attribute;
use crate::format::language::{language_label, language_options};

/// First character of every placeholder token (Unicode private use area).
pub const PLACEHOLDER_OPEN: char = '\u{E000}';
/// Last character of every placeholder token.
pub const PLACEHOLDER_CLOSE: char = '\u{E001}';

const PLACEHOLDER_TAG: &str = "CODEBLOCK_";

/// Language recorded for fences without a tag.
pub const DEFAULT_LANGUAGE: &str = "plaintext";

static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(\w*)\s*(.*?)```").expect("valid fence regex"));

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\x{E000}CODEBLOCK_([0-9a-f]{32})\x{E001}").expect("valid placeholder regex")
});

const COPY_ICON: &str = concat!(
    r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor">"#,
    r#"<rect x="9" y="9" width="13" height="13" rx="2" ry="2" stroke-width="2"></rect>"#,
    r#"<path d="M5 15H4a2 2 0 0 1-2-2V4a2 2 0 0 1 2-2h9a2 2 0 0 1 2 2v1" stroke-width="2"></path>"#,
    r#"</svg>"#
);

/// A fenced block lifted out of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Identity of the block within one formatting call
    pub id: Uuid,
    /// Lowercase fence tag, or `plaintext`
    pub language: String,
    /// Block body, already HTML-escaped
    pub source: String,
}

impl CodeBlock {
    fn new(language: &str, source: &str) -> Self {
        let language = if language.is_empty() {
            DEFAULT_LANGUAGE.to_string()
        } else {
            language.to_lowercase()
        };
        Self {
            id: Uuid::new_v4(),
            language,
            source: source.to_string(),
        }
    }

    /// The token standing in for this block in the residual text.
    pub fn placeholder(&self) -> String {
        format!(
            "{PLACEHOLDER_OPEN}{PLACEHOLDER_TAG}{}{PLACEHOLDER_CLOSE}",
            self.id.simple()
        )
    }

    /// The `id` attribute of the rendered `<code>` element.
    ///
    /// Action hooks reference the block through this value.
    pub fn element_id(&self) -> String {
        format!("code-{}", self.id.simple())
    }

    /// Display label for the language dropdown.
    pub fn label(&self) -> String {
        language_label(&self.language)
    }

    /// Render the interactive widget for this block.
    pub fn render(&self) -> String {
        let element_id = escape_attribute(&self.element_id());
        let language_class = escape_attribute(&self.language);
        let options = language_options(&self.label());
        let body = self.source.trim();

        let mut html = String::with_capacity(body.len() + 1024);
        html.push_str(&format!(
            r#"<div class="code-block-container" data-code-id="{element_id}">"#
        ));
        html.push_str(r#"<div class="code-block-header">"#);
        html.push_str(r#"<div class="language-select-wrapper">"#);
        html.push_str(&format!(
            r#"<select class="code-language-select" data-action="{}" data-code-id="{element_id}">{options}</select>"#,
            CodeAction::Translate.as_attr()
        ));
        html.push_str("</div>");
        html.push_str(&format!(
            r#"<button class="code-copy-btn" data-action="{}" data-code-id="{element_id}" title="Copy code">{COPY_ICON}<span class="copy-text">Copy code</span></button>"#,
            CodeAction::Copy.as_attr()
        ));
        html.push_str("</div>");
        html.push_str(&format!(
            r#"<pre><code id="{element_id}" class="language-{language_class}">{body}</code></pre>"#
        ));
        html.push_str("</div>");
        html
    }
}

/// Residual text plus the blocks lifted out of it, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub residual: String,
    pub blocks: Vec<CodeBlock>,
}

/// Replace every terminated fence in `escaped` with a placeholder token.
///
/// An opening fence without a closing one is not a block and stays in the
/// residual text untouched.
pub fn extract_code_blocks(escaped: &str) -> Extraction {
    let mut blocks = Vec::new();
    let residual = FENCE_RE
        .replace_all(escaped, |caps: &Captures| {
            let block = CodeBlock::new(&caps[1], &caps[2]);
            let placeholder = block.placeholder();
            blocks.push(block);
            placeholder
        })
        .into_owned();

    Extraction { residual, blocks }
}

/// Whether `text` begins with a placeholder token.
pub fn starts_with_placeholder(text: &str) -> bool {
    text.starts_with(PLACEHOLDER_OPEN)
}

/// Expand every placeholder token in `text` into its rendered widget.
///
/// A token without a matching block is left as-is.
pub fn restore_code_blocks(text: &str, blocks: &[CodeBlock]) -> String {
    if blocks.is_empty() && !text.contains(PLACEHOLDER_OPEN) {
        return text.to_string();
    }

    let by_id: HashMap<String, &CodeBlock> = blocks
        .iter()
        .map(|block| (block.id.simple().to_string(), block))
        .collect();

    PLACEHOLDER_RE
        .replace_all(text, |caps: &Captures| match by_id.get(&caps[1]) {
            Some(block) => block.render(),
            None => {
                tracing::warn!("Unresolved code block placeholder {}", &caps[1]);
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Interactive hooks embedded in a rendered code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeAction {
    /// Copy the block body to the clipboard
    Copy,
    /// Translate the block body into the language picked in the dropdown
    Translate,
}

impl CodeAction {
    /// Value of the `data-action` attribute.
    pub fn as_attr(self) -> &'static str {
        match self {
            CodeAction::Copy => "copy-code",
            CodeAction::Translate => "translate-code",
        }
    }

    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "copy-code" => Some(CodeAction::Copy),
            "translate-code" => Some(CodeAction::Translate),
            _ => None,
        }
    }
}

impl std::fmt::Display for CodeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_attr())
    }
}
