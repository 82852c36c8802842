//! KDoc comment normalization

/// Collapse a raw `/** ... */` comment into a single line of text.
///
/// The comment delimiters are removed, every line loses its leading
/// whitespace and one leading `*`, blank lines are dropped and the rest
/// are joined with single spaces. Never fails; a comment with no text
/// yields an empty string.
pub fn process_doc(text: &str) -> String {
    let text = text.trim();
    let text = text.strip_prefix("/*").unwrap_or(text);
    let text = text.strip_suffix("*/").unwrap_or(text);

    text.lines()
        .map(|line| {
            let line = line.trim_start();
            line.strip_prefix('*').unwrap_or(line).trim()
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
