//! Small string helpers shared by the command handlers.

/// Shorten `text` to at most `max` characters, ending in `...` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// First non-empty line of `text` (trimmed), or `text` itself when every line is blank.
pub fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or(text)
}

/// Split a comma-separated tag list, dropping blanks.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Render tags as `[a] [b]`.
pub fn format_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("[{t}]"))
        .collect::<Vec<_>>()
        .join(" ")
}
