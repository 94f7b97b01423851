/// Trims a raw cell and strips invisible marks left behind by spreadsheet exports.
pub(crate) fn clean_text(value: &str) -> String {
    value
        .replace(['\u{feff}', '\u{200b}', '\u{200e}', '\u{200f}'], "")
        .trim()
        .to_string()
}

/// Case- and whitespace-insensitive form used for header and status comparisons.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = clean_text(value);
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}
