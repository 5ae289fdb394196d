//! Best-effort CSV line splitting.
//!
//! This is deliberately not RFC 4180: a `"` simply toggles an "inside quotes"
//! flag, doubled quotes are not unescaped, and quote state never carries over
//! to the next line. Malformed quoting never errors; whatever was accumulated
//! becomes the field.

/// Split one line into trimmed fields.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    fields.push(current.trim().to_string());
    fields
}

/// Split raw text into lines, trimming each one (this also drops a trailing `\r`).
/// Blank lines are kept so callers can decide how to treat them.
pub fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(str::trim)
}
