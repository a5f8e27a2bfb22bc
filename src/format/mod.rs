//! Message formatting
//!
//! Turns raw chat text (a small markdown subset) into an HTML fragment that
//! is safe to insert into the transcript. Fenced code blocks are extracted
//! before any other transform runs and come back as interactive widgets.
//!
//! Recognized syntax, nothing else is interpreted:
//! fenced code blocks with an optional language tag, `**bold**`,
//! `#`/`##`/`###` headers, `*`/`-` list lines, `N.` list lines,
//! `` `inline code` ``, the `Simple words me:` label and blank-line
//! separated paragraphs.

pub mod code_block;
pub mod escape;
pub mod language;
pub mod markdown;

pub use code_block::{CodeAction, CodeBlock, Extraction};
pub use escape::escape_html;
pub use language::language_label;

use code_block::{extract_code_blocks, restore_code_blocks};

/// Format a raw message into HTML.
///
/// Never fails: every input string produces some fragment. The stage order
/// matters. Escaping runs first and exactly once, so no later stage can
/// turn user text into markup.
pub fn format_message(raw: &str) -> String {
    let escaped = escape_html(raw);
    let Extraction { residual, blocks } = extract_code_blocks(&escaped);

    let text = markdown::apply_bold(&residual);
    let text = markdown::apply_headers(&text);
    let text = markdown::apply_unordered_lists(&text);
    let text = markdown::apply_ordered_lists(&text);
    let text = markdown::apply_labels(&text);
    let text = markdown::apply_inline_code(&text);
    let text = markdown::wrap_paragraphs(&text);

    let html = restore_code_blocks(&text, &blocks);
    tracing::debug!(
        input_len = raw.len(),
        code_blocks = blocks.len(),
        "Formatted message"
    );
    html
}

#[cfg(test)]
mod tests {
    use super::code_block::PLACEHOLDER_OPEN;
    use super::*;

    /// Strip every tag the formatter is allowed to emit; whatever `<` is
    /// left must have come from user input.
    fn strip_generated_markup(html: &str) -> String {
        let tag = regex::Regex::new(r"</?(p|br|strong|h[123]|ul|ol|li|div|code|pre|select|option|button|span|svg|rect|path)\b[^>]*>")
            .unwrap();
        tag.replace_all(html, "").into_owned()
    }

    #[test]
    fn test_html_in_input_is_escaped() {
        let html = format_message("<script>alert(1)</script> & <b>x</b>");
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; &lt;b&gt;x&lt;/b&gt;"));
        assert!(!strip_generated_markup(&html).contains('<'));
    }

    #[test]
    fn test_markup_inside_markdown_stays_escaped() {
        let html = format_message("# <img src=x onerror=y>\n- **<i>**\n`<b>`");
        assert!(!strip_generated_markup(&html).contains('<'));
        assert!(html.contains("<h1>&lt;img src=x onerror=y&gt;</h1>"));
    }

    #[test]
    fn test_code_block_round_trip() {
        let html = format_message("```python\nprint(1)\n```");
        assert!(html.contains(r#"class="language-python">print(1)</code>"#));
        assert!(!html.contains(PLACEHOLDER_OPEN));
    }

    #[test]
    fn test_escaping_happens_once() {
        let html = format_message("a &amp; b");
        assert_eq!(html, "<p>a &amp;amp; b</p>");

        let html = format_message("```html\n<div>&nbsp;</div>\n```");
        assert!(html.contains("&lt;div&gt;&amp;nbsp;&lt;/div&gt;</code>"));
        assert!(!html.contains("&amp;lt;"));
    }

    #[test]
    fn test_bold_text() {
        let html = format_message("**bold** text");
        assert_eq!(html, "<strong>bold</strong> text");
        assert!(!html.contains(PLACEHOLDER_OPEN));
    }

    #[test]
    fn test_markup_led_block_is_not_wrapped() {
        let html = format_message("**Note:** read this\n\nplain text");
        assert_eq!(html, "<strong>Note:</strong> read this<p>plain text</p>");
        assert!(!html.contains("<p><strong>"));
    }

    #[test]
    fn test_crlf_header() {
        assert_eq!(format_message("# Title\r\nnext"), "<h1>Title</h1>\r\nnext");
    }

    #[test]
    fn test_consecutive_list_lines_make_one_list() {
        let html = format_message("- a\n- b\n- c");
        assert_eq!(html, "<ul><li>a</li><li>b</li><li>c</li></ul>");
        assert_eq!(html.matches("<ul>").count(), 1);
        assert_eq!(html.matches("<li>").count(), 3);
    }

    #[test]
    fn test_javascript_block_selects_dropdown_entry() {
        let html = format_message("```js\nconsole.log(1)\n```");
        assert!(html.contains(r#"<option value="JavaScript" selected>JavaScript</option>"#));
        assert!(html.contains(r#"class="language-js">console.log(1)</code>"#));

        let html = format_message("```js\nif (a < b && c > d) {}\n```");
        assert!(html.contains("if (a &lt; b &amp;&amp; c &gt; d) {}</code>"));
    }

    #[test]
    fn test_two_paragraphs() {
        let html = format_message("line one\nline two\n\nsecond para\nmore");
        assert_eq!(
            html,
            "<p>line one<br>line two</p><p>second para<br>more</p>"
        );
    }

    #[test]
    fn test_unterminated_fence_stays_literal() {
        let html = format_message("```python\nprint(1)");
        assert_eq!(html, "<p>```python<br>print(1)</p>");
        assert!(!html.contains("code-block-container"));
    }

    #[test]
    fn test_code_block_is_immune_to_markdown() {
        let html = format_message("```md\n# not a header\n- not a list\n**not bold**\n```");
        assert!(!html.contains("<h1>"));
        assert!(!html.contains("<ul>"));
        assert!(!html.contains("<strong>"));
        assert!(html.contains("# not a header\n- not a list\n**not bold**</code>"));
    }

    #[test]
    fn test_code_block_between_paragraphs() {
        let html = format_message("Here:\n\n```rust\nfn main() {}\n```\n\nDone.");
        assert!(html.starts_with("<p>Here:</p>"));
        assert!(html.ends_with("<p>Done.</p>"));
        assert_eq!(html.matches("code-block-container").count(), 1);
        assert!(!html.contains("<p><div"));
    }

    #[test]
    fn test_full_response() {
        let raw = "### Overview\n\
                   **CPU** is the *brain*.\n\n\
                   Simple words me: it thinks.\n\n\
                   1. Fetch\n\
                   2. Decode\n\
                   3. Execute\n\n\
                   Use `top` to watch it.";
        let html = format_message(raw);

        assert!(html.contains("<h3>Overview</h3>"));
        assert!(html.contains("<strong>CPU</strong> is the *brain*."));
        assert!(html.contains(r#"<div class="simple-words-label">Simple words me:</div> it thinks."#));
        assert!(html.contains("<ol><li>Fetch</li><li>Decode</li><li>Execute</li></ol>"));
        assert!(html.contains(r#"<p>Use <code class="inline-code">top</code> to watch it.</p>"#));
    }

    #[test]
    fn test_user_text_resembling_placeholder_is_plain_text() {
        let html = format_message("CODEBLOCK_abc123");
        assert_eq!(html, "<p>CODEBLOCK_abc123</p>");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(format_message(""), "");
        assert_eq!(format_message("   \n\n  "), "");
    }
}
