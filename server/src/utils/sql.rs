//! SQL utility functions

/// Escape SQL LIKE metacharacters (%, _, \) in user input
///
/// Use this when building LIKE patterns from user input to prevent
/// unintended pattern matching.
///
/// # Example
///
/// ```
/// use richelieu_server::utils::sql::escape_like_pattern;
///
/// let user_input = "100% match_test";
/// let pattern = format!("%{}%", escape_like_pattern(user_input));
/// assert_eq!(pattern, "%100\\% match\\_test%");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Reverse of [`escape_like_pattern`]
pub fn unescape_like_pattern(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Collapse whitespace runs to a single space, trim, and lower-case
pub fn simplify_text(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern_no_special_chars() {
        assert_eq!(escape_like_pattern("bourse"), "bourse");
    }

    #[test]
    fn test_escape_like_pattern_percent() {
        assert_eq!(escape_like_pattern("100%"), "100\\%");
    }

    #[test]
    fn test_escape_like_pattern_underscore() {
        assert_eq!(escape_like_pattern("rue_vivienne"), "rue\\_vivienne");
    }

    #[test]
    fn test_escape_like_pattern_multiple() {
        assert_eq!(escape_like_pattern("100%_\\test"), "100\\%\\_\\\\test");
    }

    #[test]
    fn test_unescape_like_pattern() {
        assert_eq!(unescape_like_pattern("100\\%\\_\\\\test"), "100%_\\test");
        assert_eq!(unescape_like_pattern("théâtre"), "théâtre");
        assert_eq!(unescape_like_pattern(""), "");
    }

    #[test]
    fn test_escape_unescape_inverse() {
        for s in ["a%b", "a_b", "a\\b", "\\%_", "galerie vivienne"] {
            assert_eq!(unescape_like_pattern(&escape_like_pattern(s)), s);
        }
    }

    #[test]
    fn test_simplify_text() {
        assert_eq!(simplify_text("  Le   Moniteur\tde la MODE "), "le moniteur de la mode");
        assert_eq!(simplify_text("Théâtre"), "théâtre");
        assert_eq!(simplify_text("   "), "");
    }
}
