//! Small case-insensitive string helpers shared by the dialects.
//!
//! These operate on raw SQL text, not on a parsed statement. A keyword inside
//! a string literal or comment is indistinguishable from a real one here.

/// Collapse tabs and line breaks into single spaces, then squeeze runs of spaces.
pub fn normalize_whitespace(sql: &str) -> String {
    let mut output = String::with_capacity(sql.len());
    let mut previous_space = false;
    for ch in sql.chars() {
        let ch = if matches!(ch, '\t' | '\r' | '\n') { ' ' } else { ch };
        if ch == ' ' {
            if previous_space {
                continue;
            }
            previous_space = true;
        } else {
            previous_space = false;
        }
        output.push(ch);
    }
    output
}

/// Byte offset of the first ASCII-case-insensitive occurrence of `needle`.
pub fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    // ASCII uppercasing keeps byte offsets stable.
    haystack
        .to_ascii_uppercase()
        .find(&needle.to_ascii_uppercase())
}

/// Split `source` at the first case-insensitive `separator`.
///
/// Returns the text before the separator (or all of it) and the text after
/// it (or the empty string when the separator is absent).
pub fn cut<'a>(source: &'a str, separator: &str) -> (&'a str, &'a str) {
    match find_ignore_case(source, separator) {
        Some(index) => (&source[..index], &source[index + separator.len()..]),
        None => (source, ""),
    }
}

/// Drop everything from the first `ORDER BY` on.
pub fn strip_order_by(sql: &str) -> &str {
    cut(sql, "ORDER BY").0.trim()
}

/// Strip a leading keyword (case-insensitive), returning the remainder.
pub fn strip_keyword<'a>(source: &'a str, keyword: &str) -> Option<&'a str> {
    let trimmed = source.trim_start();
    if trimmed.len() >= keyword.len()
        && trimmed.is_char_boundary(keyword.len())
        && trimmed[..keyword.len()].eq_ignore_ascii_case(keyword)
    {
        Some(&trimmed[keyword.len()..])
    } else {
        None
    }
}

/// Unicode-aware case-insensitive equality for identifiers.
pub fn same_name(left: &str, right: &str) -> bool {
    left == right || left.to_lowercase() == right.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            normalize_whitespace("SELECT a,\r\n\tb   FROM  t\nWHERE x = 1"),
            "SELECT a, b FROM t WHERE x = 1"
        );
    }

    #[test]
    fn test_cut_is_case_insensitive() {
        let (before, after) = cut("select a from t order by a desc", "ORDER BY");
        assert_eq!(before, "select a from t ");
        assert_eq!(after, " a desc");
    }

    #[test]
    fn test_cut_without_separator_keeps_everything() {
        assert_eq!(cut("SELECT 1", "ORDER BY"), ("SELECT 1", ""));
    }

    #[test]
    fn test_strip_keyword() {
        assert_eq!(strip_keyword("  select DISTINCT a", "SELECT"), Some(" DISTINCT a"));
        assert_eq!(strip_keyword("WITH x AS (SELECT 1)", "SELECT"), None);
        assert_eq!(strip_keyword("SEL", "SELECT"), None);
    }

    #[test]
    fn test_same_name_unicode() {
        assert!(same_name("ÄRGER", "ärger"));
        assert!(same_name("dbo", "DBO"));
        assert!(!same_name("users", "user"));
    }
}
