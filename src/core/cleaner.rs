use crate::core::patterns::PatternRule;
use crate::utils::error::Result;

/// Collapses every whitespace run to a single space and trims both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes leading hashtags and trailing channel metadata from post text.
///
/// Unmapped hashtags are stripped as well: the leading rule only looks at the
/// shape of the token, never at the topic table.
#[derive(Debug, Clone)]
pub struct TextCleaner {
    leading: PatternRule,
    trailing: Vec<PatternRule>,
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self {
            leading: PatternRule::leading_tags(),
            trailing: vec![PatternRule::channel_footer(), PatternRule::attribution()],
        }
    }
}

impl TextCleaner {
    /// Built-in rules plus extra trailing patterns, applied after the built-ins.
    pub fn with_trailing_patterns(patterns: &[String]) -> Result<Self> {
        let mut cleaner = Self::default();
        for (index, pattern) in patterns.iter().enumerate() {
            cleaner
                .trailing
                .push(PatternRule::new(format!("trailing_patterns[{}]", index), pattern)?);
        }
        Ok(cleaner)
    }

    pub fn trailing_rules(&self) -> impl Iterator<Item = &str> {
        self.trailing.iter().map(PatternRule::name)
    }

    pub fn clean(&self, raw_text: &str) -> String {
        // Stripping one rule can expose another; stop at a fixed point.
        let mut current = self.clean_once(raw_text);
        loop {
            let next = self.clean_once(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn clean_once(&self, text: &str) -> String {
        let flat = collapse_whitespace(text);
        let mut body = self.leading.strip(&flat).into_owned();

        for rule in &self.trailing {
            if rule.is_match(&body) {
                tracing::trace!("cleaner rule {} matched", rule.name());
                body = rule.strip(&body).into_owned();
            }
        }

        collapse_whitespace(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_studies_post() {
        let cleaner = TextCleaner::default();
        let raw = "#studies✍🏼 Y1S1: CS1101S Programming Methodology was tough. — via SMU Confess";
        assert_eq!(
            cleaner.clean(raw),
            "Y1S1: CS1101S Programming Methodology was tough."
        );
    }

    #[test]
    fn test_clean_strips_unmapped_hashtag() {
        let cleaner = TextCleaner::default();
        assert_eq!(cleaner.clean("#misc Some random thought"), "Some random thought");
    }

    #[test]
    fn test_clean_channel_footer_and_whitespace() {
        let cleaner = TextCleaner::default();
        let raw = "#rant🤬  The   queue at\nthe canteen   is insane.  #C00098765 | SMU Confess Channel";
        assert_eq!(cleaner.clean(raw), "The queue at the canteen is insane.");
    }

    #[test]
    fn test_clean_keeps_body_text_that_looks_like_metadata() {
        let cleaner = TextCleaner::default();
        assert_eq!(
            cleaner.clean("#rant🤬 I got to campus — via the MRT. It was packed!"),
            "I got to campus — via the MRT. It was packed!"
        );
        assert_eq!(
            cleaner.clean("#random✨ Found my wallet. Returned #B12345678 | thanks to whoever handed it in"),
            "Found my wallet. Returned #B12345678 | thanks to whoever handed it in"
        );
    }

    #[test]
    fn test_clean_keeps_inner_hashtags() {
        let cleaner = TextCleaner::default();
        assert_eq!(
            cleaner.clean("#love❤️ to the girl in #SCIS1 lab"),
            "to the girl in #SCIS1 lab"
        );
    }

    #[test]
    fn test_clean_is_idempotent() {
        let cleaner = TextCleaner::default();
        let samples = [
            "#studies✍🏼 Y1S1: tough. — via SMU Confess",
            "#a #b — via X",
            "Body #C00012345 | SMU Confess Channel\nmore text",
            "   ",
            "#love❤️",
            "plain text with   gaps\tand tabs",
            "ends — via A — via B",
            "# not a tag",
        ];
        for sample in samples {
            let once = cleaner.clean(sample);
            assert_eq!(cleaner.clean(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_custom_trailing_pattern() {
        let cleaner = TextCleaner::with_trailing_patterns(&[r"\s*\[submitted by [^\]]*\]$".to_string()])
            .unwrap();
        assert_eq!(cleaner.trailing_rules().count(), 3);
        assert_eq!(
            cleaner.clean("#random✨ Why are lifts slow? [submitted by anon]"),
            "Why are lifts slow?"
        );
    }

    #[test]
    fn test_invalid_custom_pattern() {
        assert!(TextCleaner::with_trailing_patterns(&["[".to_string()]).is_err());
    }
}
