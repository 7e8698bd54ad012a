//! Named regex rules used to recognise hashtags and trailing metadata.
//!
//! Each rule is a standalone value so it can be unit tested on its own and so
//! additional trailing rules can be supplied from configuration.

use crate::utils::error::{EtlError, Result};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// One or more hashtag tokens at the very start of the text. A token is `#`,
/// a letter, word characters, then an optional run of decorative symbols
/// (emoji, variation selectors, punctuation) that are not another `#`.
pub const LEADING_TAGS: &str = r"^\s*(?:#\p{L}[\p{L}\p{N}_]*[^\s\p{L}\p{N}#]*\s*)+";

/// The word part of the first leading hashtag.
pub const FIRST_TAG: &str = r"^\s*#(\p{L}[\p{L}\p{N}_]*)";

/// Serial footer the channel bot appends, e.g. `#C00012345 | SMU Confess Channel`.
pub const CHANNEL_FOOTER: &str = r"\s*#[A-Z]\d{8}\s*\|\s*SMU Confess Channel.*$";

/// Short attribution tail such as `— via SMU Confess`, with no sentence
/// punctuation after it.
pub const ATTRIBUTION: &str = r"(?i)\s*(?:—|–|--)\s*via\s+[^\s.!?][^.!?]{0,60}$";

static LEADING_TAGS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(LEADING_TAGS).unwrap());
static FIRST_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(FIRST_TAG).unwrap());
static CHANNEL_FOOTER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(CHANNEL_FOOTER).unwrap());
static ATTRIBUTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(ATTRIBUTION).unwrap());

#[derive(Debug, Clone)]
pub struct PatternRule {
    name: String,
    regex: Regex,
}

impl PatternRule {
    /// Compiles a user supplied rule.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let name = name.into();
        let regex = Regex::new(pattern).map_err(|e| EtlError::ConfigValidationError {
            field: format!("cleaner.{}", name),
            message: format!("invalid pattern '{}': {}", pattern, e),
        })?;
        Ok(Self { name, regex })
    }

    pub fn leading_tags() -> Self {
        Self::builtin("leading_tags", &LEADING_TAGS_RE)
    }

    pub fn first_tag() -> Self {
        Self::builtin("first_tag", &FIRST_TAG_RE)
    }

    pub fn channel_footer() -> Self {
        Self::builtin("channel_footer", &CHANNEL_FOOTER_RE)
    }

    pub fn attribution() -> Self {
        Self::builtin("attribution", &ATTRIBUTION_RE)
    }

    fn builtin(name: &str, regex: &Regex) -> Self {
        Self {
            name: name.to_string(),
            regex: regex.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Text of the first capture group, if the rule matches.
    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Removes every match of the rule.
    pub fn strip<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.regex.replace_all(text, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_tags_with_emoji_suffix() {
        let rule = PatternRule::leading_tags();
        assert_eq!(rule.strip("#studies✍🏼 Y1S1 was fun"), "Y1S1 was fun");
        assert_eq!(rule.strip("#advice🗣️ help"), "help");
        assert_eq!(rule.strip("#love❤️ #rant🤬 two tags"), "two tags");
        assert_eq!(rule.strip("  #campus🏛   spaced"), "spaced");
    }

    #[test]
    fn test_leading_tags_only_at_start() {
        let rule = PatternRule::leading_tags();
        assert!(!rule.is_match("no tag #here"));
        assert!(!rule.is_match("#123 numeric"));
        assert!(!rule.is_match("# lonely hash"));
        assert_eq!(rule.strip("mid #tag stays"), "mid #tag stays");
    }

    #[test]
    fn test_first_tag_capture() {
        let rule = PatternRule::first_tag();
        assert_eq!(rule.capture("#studies✍🏼 text"), Some("studies"));
        assert_eq!(rule.capture(" #Rant🤬"), Some("Rant"));
        assert_eq!(rule.capture("#love#rant"), Some("love"));
        assert_eq!(rule.capture("plain text"), None);
    }

    #[test]
    fn test_channel_footer() {
        let rule = PatternRule::channel_footer();
        assert_eq!(
            rule.strip("Body text. #C00012345 | SMU Confess Channel @smuconfess"),
            "Body text."
        );
        assert!(!rule.is_match("Ticket #12345678 | not a serial"));
        assert_eq!(
            rule.strip("Found my wallet. Returned #B12345678 | thanks to whoever handed it in"),
            "Found my wallet. Returned #B12345678 | thanks to whoever handed it in"
        );
    }

    #[test]
    fn test_attribution() {
        let rule = PatternRule::attribution();
        assert_eq!(rule.strip("It was tough. — via SMU Confess"), "It was tough.");
        assert_eq!(rule.strip("Short -- VIA telegram"), "Short");
        assert!(!rule.is_match("sent - via email, then went home"));
        assert!(!rule.is_match("— via this route we walked for ages and ages, long after the sun had set over campus"));
    }

    #[test]
    fn test_attribution_keeps_following_sentences() {
        let rule = PatternRule::attribution();
        assert_eq!(
            rule.strip("I got to campus — via the MRT. It was packed!"),
            "I got to campus — via the MRT. It was packed!"
        );
        assert_eq!(
            rule.strip("We met — via a friend. Now we're dating."),
            "We met — via a friend. Now we're dating."
        );
    }

    #[test]
    fn test_invalid_custom_rule() {
        let err = PatternRule::new("custom_1", "(unclosed").unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));
    }
}
