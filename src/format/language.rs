//! Language label table
//!
//! Maps short fence tags (`js`, `py`, `cpp`, ...) to the display names shown
//! in a code block's language dropdown.

use crate::format::escape::escape_attribute;

/// Languages always offered in the dropdown, in display order.
pub const COMMON_LANGUAGES: [&str; 12] = [
    "Python",
    "JavaScript",
    "Java",
    "C++",
    "Go",
    "Rust",
    "PHP",
    "HTML",
    "CSS",
    "SQL",
    "Bash",
    "JSON",
];

/// Label used for untagged blocks. Never added to the dropdown.
pub const PLAINTEXT_LABEL: &str = "Code";

/// Display name for a fence tag. Unknown tags are shown upper-cased.
pub fn language_label(tag: &str) -> String {
    let label = match tag.to_lowercase().as_str() {
        "python" | "py" => "Python",
        "javascript" | "js" => "JavaScript",
        "typescript" | "ts" => "TypeScript",
        "java" => "Java",
        "cpp" => "C++",
        "c" => "C",
        "csharp" | "cs" => "C#",
        "php" => "PHP",
        "ruby" => "Ruby",
        "go" => "Go",
        "rust" => "Rust",
        "swift" => "Swift",
        "kotlin" => "Kotlin",
        "html" => "HTML",
        "css" => "CSS",
        "sql" => "SQL",
        "bash" => "Bash",
        "shell" => "Shell",
        "json" => "JSON",
        "xml" => "XML",
        "yaml" => "YAML",
        "markdown" | "md" => "Markdown",
        "plaintext" => PLAINTEXT_LABEL,
        _ => return tag.to_uppercase(),
    };
    label.to_string()
}

/// Whether `label` is one of the always-offered dropdown entries.
pub fn is_common_language(label: &str) -> bool {
    COMMON_LANGUAGES
        .iter()
        .any(|common| common.eq_ignore_ascii_case(label))
}

/// Render the `<option>` list for a block whose detected label is `label`.
///
/// The matching common entry is pre-selected. A label outside the common
/// list is inserted first and selected, except for plain untagged code.
pub fn language_options(label: &str) -> String {
    let mut options = String::new();

    if !is_common_language(label) && label != PLAINTEXT_LABEL {
        let value = escape_attribute(label);
        options.push_str(&format!(
            r#"<option value="{value}" selected>{value}</option>"#
        ));
    }

    for common in COMMON_LANGUAGES {
        let value = escape_attribute(common);
        if common.eq_ignore_ascii_case(label) {
            options.push_str(&format!(
                r#"<option value="{value}" selected>{value}</option>"#
            ));
        } else {
            options.push_str(&format!(r#"<option value="{value}">{value}</option>"#));
        }
    }

    options
}
