//! Label-anchored section extraction over free text.
//!
//! Labels are matched ASCII case-insensitively and always followed by a colon.
//! Nothing here fails: a missing label yields the empty value for its shape.

/// Leading bullet characters removed from list lines (at most one per line).
const LIST_MARKERS: &[char] = &['-', '*', '+', '•'];

/// Byte offset just past the first case-insensitive occurrence of `label:`
/// at or after `from`.
fn find_label_end(text: &str, label: &str, from: usize) -> Option<usize> {
    let needle = format!("{}:", label.to_ascii_lowercase());
    // ASCII lowercasing keeps byte offsets, so positions map back onto `text`.
    let haystack = text.get(from..)?.to_ascii_lowercase();
    haystack.find(&needle).map(|pos| from + pos + needle.len())
}

/// Integer following `label:` and optional whitespace.
///
/// Occurrences of the label with no digits after them are skipped in favour of
/// a later one. Only the first digit run counts; values above 100 are treated
/// as not found.
pub fn extract_score(text: &str, label: &str) -> Option<u8> {
    let mut from = 0;
    while let Some(end) = find_label_end(text, label, from) {
        let rest = text[end..].trim_start();
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .map_or(rest, |stop| &rest[..stop]);

        if !digits.is_empty() {
            return digits
                .parse::<u32>()
                .ok()
                .filter(|score| *score <= 100)
                .and_then(|score| u8::try_from(score).ok());
        }
        from = end;
    }
    None
}

/// Items listed under `label:` up to the next blank line or end of text.
///
/// The rest of the label's own line is discarded. Each remaining line loses one
/// leading marker and surrounding whitespace; lines left empty are dropped.
pub fn extract_section(text: &str, label: &str) -> Vec<String> {
    let Some(start) = find_label_end(text, label, 0) else {
        return Vec::new();
    };

    let content = &text[start..];
    let block = content
        .find("\n\n")
        .map_or(content, |blank| &content[..blank]);

    block
        .lines()
        .skip(1)
        .map(strip_marker)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Everything after `label:` to end of text, trimmed.
pub fn extract_tail(text: &str, label: &str) -> String {
    find_label_end(text, label, 0)
        .map(|start| text[start..].trim().to_string())
        .unwrap_or_default()
}

fn strip_marker(line: &str) -> &str {
    let line = line.trim();
    line.strip_prefix(LIST_MARKERS).unwrap_or(line).trim()
}
