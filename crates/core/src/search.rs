//! Device-search helpers.
//!
//! This module lives in `core` (zero internal deps) so the repository
//! layer and the lookup service share one definition of how search terms
//! are normalized and how cached copies are sanitized.

// ---------------------------------------------------------------------------
// Term handling
// ---------------------------------------------------------------------------

/// Normalize a raw search term: trims surrounding whitespace.
///
/// The trimmed term is both the cache key and the LIKE needle, so two
/// requests differing only in padding share a cache entry.
pub fn normalize_term(term: &str) -> &str {
    term.trim()
}

/// Escape LIKE wildcards in a user-supplied needle.
///
/// The result is meant for `LIKE '%' || ?1 || '%' ESCAPE '\'` patterns.
///
/// # Examples
///
/// ```
/// use tradein_core::search::escape_like;
/// assert_eq!(escape_like("100%"), "100\\%");
/// assert_eq!(escape_like("a_b"), "a\\_b");
/// ```
pub fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

// ---------------------------------------------------------------------------
// Sanitization
// ---------------------------------------------------------------------------

/// HTML-escape a catalog string for cached search results.
///
/// Cache entries hold already-escaped copies so every consumer renders
/// them verbatim; escaping happens once, at fill time.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- normalize_term --

    #[test]
    fn normalize_trims_padding() {
        assert_eq!(normalize_term("  galaxy "), "galaxy");
        assert_eq!(normalize_term(""), "");
        assert_eq!(normalize_term("   "), "");
    }

    // -- escape_like --

    #[test]
    fn escapes_wildcards_and_backslash() {
        assert_eq!(escape_like("50%_off\\x"), "50\\%\\_off\\\\x");
    }

    #[test]
    fn plain_needle_unchanged() {
        assert_eq!(escape_like("iPhone 12"), "iPhone 12");
    }

    // -- escape_html --

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html("<b>\"Pixel\" & 'Pro'</b>"),
            "&lt;b&gt;&quot;Pixel&quot; &amp; &#039;Pro&#039;&lt;/b&gt;"
        );
    }

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(escape_html("Galaxy S21"), "Galaxy S21");
    }
}
