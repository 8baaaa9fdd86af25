//! Text normalization primitives shared by the chunker.

use std::sync::LazyLock;

use regex::Regex;

static RE_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());
static RE_MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\w+").unwrap());
static RE_ORDINAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.\s+").unwrap());

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove `http://` / `https://` URLs.
pub fn strip_urls(text: &str) -> String {
    RE_URL.replace_all(text, "").into_owned()
}

/// Remove `@handle` style mentions.
pub fn strip_mentions(text: &str) -> String {
    RE_MENTION.replace_all(text, "").into_owned()
}

/// Split numbered-list exports (`1. first\n2. second`) into their units.
///
/// Units are trimmed; empty units are dropped. Text without ordinal markers
/// comes back as a single unit.
pub fn split_numbered(text: &str) -> Vec<String> {
    RE_ORDINAL
        .split(text)
        .map(str::trim)
        .filter(|unit| !unit.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \t b\n\nc  "), "a b c");
        assert_eq!(normalize_whitespace(""), "");
        assert_eq!(normalize_whitespace("   \n  "), "");
    }

    #[test]
    fn test_strip_urls() {
        assert_eq!(
            strip_urls("check https://x.co/abc out"),
            "check  out"
        );
        assert_eq!(strip_urls("http://a.b/c?d=1"), "");
        assert_eq!(strip_urls("no links here"), "no links here");
    }

    #[test]
    fn test_strip_mentions() {
        assert_eq!(strip_mentions("cc @alice and @bob_99"), "cc  and ");
        assert_eq!(strip_mentions("mail me a@b.com"), "mail me a.com");
    }

    #[test]
    fn test_split_numbered() {
        let units = split_numbered("1. first tweet\n2. second tweet\n3. third");
        assert_eq!(units, vec!["first tweet", "second tweet", "third"]);
    }

    #[test]
    fn test_split_numbered_without_markers() {
        let units = split_numbered("just a plain paragraph");
        assert_eq!(units, vec!["just a plain paragraph"]);
    }

    #[test]
    fn test_split_numbered_drops_empty_units() {
        let units = split_numbered("1. \n2. kept");
        assert_eq!(units, vec!["kept"]);
    }
}
