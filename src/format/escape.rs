//! HTML escaping helpers

/// Escape the three characters that can open markup in text content.
///
/// Quotes are left alone: the formatter only ever places message text in
/// element content, never inside attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Escape a value for use inside a double- or single-quoted attribute.
pub fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_metacharacters() {
        assert_eq!(
            escape_html("<script>alert('x') && 1 > 0</script>"),
            "&lt;script&gt;alert('x') &amp;&amp; 1 &gt; 0&lt;/script&gt;"
        );
    }

    #[test]
    fn test_escape_html_escapes_existing_entities_again() {
        // A literal entity typed by the user must survive as visible text.
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_escape_attribute_quotes() {
        assert_eq!(escape_attribute(r#"a"b'c"#), "a&quot;b&#39;c");
    }

    #[test]
    fn test_escape_leaves_unicode_untouched() {
        assert_eq!(escape_html("héllo — 世界"), "héllo — 世界");
    }
}
