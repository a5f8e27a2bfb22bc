//! Translation output cleanup

/// Strip markdown fences and stray backticks around translated code.
///
/// Models are asked for bare code but often wrap it in a fenced block
/// anyway. The opening fence line is always dropped; the closing one only
/// when it is the last line.
pub fn clean_translated_code(text: &str) -> String {
    let mut code = text.trim().to_string();

    if code.starts_with("```") {
        let lines: Vec<&str> = code.split('\n').collect();
        let last_is_fence = lines.last().is_some_and(|line| line.trim() == "```");
        let unwrapped = if lines.len() > 2 && last_is_fence {
            Some(lines[1..lines.len() - 1].join("\n"))
        } else if lines.len() > 1 {
            Some(lines[1..].join("\n"))
        } else {
            None
        };
        if let Some(unwrapped) = unwrapped {
            code = unwrapped;
        }
    }

    code.trim_matches('`').trim().to_string()
}
