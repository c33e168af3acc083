//! Filesystem-safe slugs.
//!
//! Slugs name the generated QR files, so they must be stable for the same
//! registrant and safe on every platform.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w\s-]").expect("Invalid regex pattern")
});

static SEPARATORS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-\s]+").expect("Invalid regex pattern")
});

/// Convert a string into a slug.
///
/// Unless `allow_unicode` is set, the value is NFKD-normalized and reduced to
/// ASCII. Characters other than word characters, whitespace, and hyphens are
/// removed, runs of whitespace or hyphens become a single `-`, and leading or
/// trailing `-`/`_` are stripped. The result is lowercase.
///
/// # Examples
///
/// ```
/// use checkin::slug::slugify;
///
/// assert_eq!(slugify("Ada_Lovelace_Analytical Engines", false), "ada_lovelace_analytical-engines");
/// assert_eq!(slugify("José  Núñez", false), "jose-nunez");
/// ```
#[must_use]
pub fn slugify(value: &str, allow_unicode: bool) -> String {
    let normalized: String = if allow_unicode {
        value.nfkc().collect()
    } else {
        value.nfkd().filter(char::is_ascii).collect()
    };

    let lowered = normalized.to_lowercase();
    let cleaned = DISALLOWED.replace_all(&lowered, "");
    let collapsed = SEPARATORS.replace_all(&cleaned, "-");
    collapsed.trim_matches(|c| c == '-' || c == '_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World", false), "hello-world");
    }

    #[test]
    fn test_slugify_keeps_underscores_inside() {
        assert_eq!(
            slugify("Grace_Hopper_US Navy", false),
            "grace_hopper_us-navy"
        );
    }

    #[test]
    fn test_slugify_strips_accents() {
        assert_eq!(slugify("José  Núñez", false), "jose-nunez");
        assert_eq!(slugify("Ærø", false), "r");
    }

    #[test]
    fn test_slugify_removes_punctuation() {
        assert_eq!(slugify("O'Brien & Sons, Inc.", false), "obrien-sons-inc");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("a - - b\t\nc", false), "a-b-c");
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("--Hello--", false), "hello");
        assert_eq!(slugify("__init__", false), "init");
        assert_eq!(slugify("  padded  ", false), "padded");
    }

    #[test]
    fn test_slugify_unicode_allowed() {
        assert_eq!(slugify("Zoë Straße", true), "zoë-straße");
    }

    #[test]
    fn test_slugify_compatibility_forms() {
        // NFKC folds the ligature even when unicode output is allowed.
        assert_eq!(slugify("ﬁle", true), "file");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify("", false), "");
        assert_eq!(slugify("!!!", false), "");
    }
}
