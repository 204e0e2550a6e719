//! Shared utility functions.

/// Truncate a string to approximately `max_bytes` without splitting a UTF-8
/// character boundary.
///
/// Returns a sub-slice of the original string. If the string is shorter than
/// `max_bytes`, the entire string is returned unchanged.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Split a comma-separated list of mode ids/codes.
///
/// Entries are trimmed, empty entries are dropped and duplicates are removed
/// keeping the first occurrence.
pub fn split_comma_separated(input: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() || out.iter().any(|seen| seen == part) {
            continue;
        }
        out.push(part.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn truncate_multibyte_boundary() {
        let s = "あのね";
        assert_eq!(truncate_str(s, 4), "あ");
        assert_eq!(truncate_str(s, 6), "あの");
    }

    // ==================== split_comma_separated ====================

    #[test]
    fn split_basic() {
        assert_eq!(split_comma_separated("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn split_trims_whitespace() {
        assert_eq!(
            split_comma_separated("  one  ,\ttwo , three "),
            vec!["one", "two", "three"]
        );
    }

    #[test]
    fn split_drops_empty_tokens() {
        assert_eq!(split_comma_separated(",one,,two,"), vec!["one", "two"]);
        assert!(split_comma_separated(",,,").is_empty());
        assert!(split_comma_separated("   ").is_empty());
    }

    #[test]
    fn split_dedups_preserving_order() {
        assert_eq!(
            split_comma_separated("A1,deductive,A1,G1,deductive"),
            vec!["A1", "deductive", "G1"]
        );
    }
}
