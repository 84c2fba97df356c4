//! Small text helpers shared across the pipeline.

use once_cell::sync::Lazy;
use regex::Regex;

static NORMALIZE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    NORMALIZE.replace_all(text.trim(), " ").to_string()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Whether a string is an absolute http(s) URL.
pub fn is_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|u| u.scheme() == "http" || u.scheme() == "https")
        .unwrap_or(false)
}

/// Decode the handful of HTML entities that survive in meta-tag content
/// after parsing: the five named entities plus numeric references.
pub fn unescape_html_entities(text: &str) -> String {
    static NAMED: Lazy<Regex> = Lazy::new(|| Regex::new(r"&(quot|amp|apos|lt|gt);").unwrap());
    static NUMERIC: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"&#(?:x([0-9a-fA-F]{1,6})|([0-9]{1,6}));").unwrap());

    let pass = NAMED.replace_all(text, |caps: &regex::Captures| {
        match &caps[1] {
            "quot" => "\"",
            "amp" => "&",
            "apos" => "'",
            "lt" => "<",
            _ => ">",
        }
        .to_string()
    });

    NUMERIC
        .replace_all(&pass, |caps: &regex::Captures| {
            let code = caps
                .get(1)
                .and_then(|hex| u32::from_str_radix(hex.as_str(), 16).ok())
                .or_else(|| caps.get(2).and_then(|dec| dec.as_str().parse().ok()));
            match code.and_then(char::from_u32) {
                Some(ch) => ch.to_string(),
                None => caps[0].to_string(),
            }
        })
        .to_string()
}

/// Truncate to at most `max_chars`, preferring to break at a word boundary.
pub fn truncate_at_word_boundary(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let truncated: String = text.chars().take(max_chars).collect();
    match truncated.rfind(char::is_whitespace) {
        Some(pos) => truncated[..pos].trim_end().to_string(),
        None => truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \n\t b  "), "a b");
        assert_eq!(normalize_whitespace("plain"), "plain");
    }

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/a/"));
        assert!(is_url("http://example.com"));
        assert!(!is_url("not a url"));
        assert!(!is_url("ftp://example.com"));
    }

    #[test]
    fn test_unescape_named_entities() {
        assert_eq!(
            unescape_html_entities("Fish &amp; Chips &quot;to go&quot;"),
            "Fish & Chips \"to go\""
        );
    }

    #[test]
    fn test_unescape_numeric_entities() {
        assert_eq!(unescape_html_entities("caf&#233;"), "café");
        assert_eq!(unescape_html_entities("caf&#xe9;"), "café");
        assert_eq!(unescape_html_entities("&#xZZ;"), "&#xZZ;");
    }

    #[test]
    fn test_truncate_at_word_boundary() {
        assert_eq!(truncate_at_word_boundary("short text", 50), "short text");
        assert_eq!(truncate_at_word_boundary("one two three four", 9), "one two");
    }
}
