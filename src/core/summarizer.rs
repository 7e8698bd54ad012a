use crate::adapters::remote_summarizer::RemoteSummarizer;
use crate::config::toml_config::{SummarizerConfig, SummarizerMode};
use crate::domain::ports::Summarizer;
use crate::utils::error::Result;
use async_trait::async_trait;

pub const DEFAULT_MAX_CHARS: usize = 100;
pub const DEFAULT_MIN_SENTENCE_CHARS: usize = 10;

/// Deterministic extractive summary: the first sentence when it is a sensible
/// length, otherwise the longest whole-word prefix within `max_chars`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBasedSummarizer {
    max_chars: usize,
    min_sentence_chars: usize,
}

impl Default for RuleBasedSummarizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS, DEFAULT_MIN_SENTENCE_CHARS)
    }
}

impl RuleBasedSummarizer {
    pub fn new(max_chars: usize, min_sentence_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
            min_sentence_chars,
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn summarize_text(&self, cleaned_text: &str) -> String {
        let text = cleaned_text.trim();
        if text.is_empty() {
            return String::new();
        }

        if let Some(sentence) = first_sentence(text) {
            let len = sentence.chars().count();
            if len > self.min_sentence_chars && len <= self.max_chars {
                return sentence.to_string();
            }
        }

        truncate_at_word_boundary(text, self.max_chars).to_string()
    }
}

#[async_trait]
impl Summarizer for RuleBasedSummarizer {
    async fn summarize(&self, cleaned_text: &str) -> Result<String> {
        Ok(self.summarize_text(cleaned_text))
    }

    fn name(&self) -> &'static str {
        "rule_based"
    }
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Text up to and including the first terminator run that ends a sentence,
/// i.e. is followed by whitespace or the end of the text. `3.5` and `e.g.x`
/// do not end a sentence.
pub fn first_sentence(text: &str) -> Option<&str> {
    let mut chars = text.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        if !is_terminator(c) {
            continue;
        }
        while let Some(&(_, next)) = chars.peek() {
            if is_terminator(next) {
                chars.next();
            } else {
                break;
            }
        }
        match chars.peek() {
            None => return Some(text),
            Some(&(end, next)) if next.is_whitespace() => return Some(&text[..end]),
            Some(_) => {}
        }
    }
    None
}

/// Longest prefix of at most `max_chars` characters that does not end inside a
/// word. A single word longer than the bound is cut at the bound.
pub fn truncate_at_word_boundary(text: &str, max_chars: usize) -> &str {
    let cut = match text.char_indices().nth(max_chars) {
        Some((index, _)) => index,
        None => return text,
    };

    let head = &text[..cut];
    if text[cut..].starts_with(char::is_whitespace) {
        return head.trim_end();
    }

    match head.rfind(char::is_whitespace) {
        Some(space) if !head[..space].trim_end().is_empty() => head[..space].trim_end(),
        _ => head,
    }
}

/// Builds the summarizer variant chosen for this run.
pub fn build_summarizer(config: &SummarizerConfig) -> Result<Box<dyn Summarizer>> {
    match config.mode {
        SummarizerMode::Rule => Ok(Box::new(RuleBasedSummarizer::new(
            config.max_chars,
            config.min_sentence_chars,
        ))),
        SummarizerMode::Remote => Ok(Box::new(RemoteSummarizer::from_env(config.remote.clone())?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sentence() {
        assert_eq!(first_sentence("One. Two."), Some("One."));
        assert_eq!(first_sentence("Really?! Yes"), Some("Really?!"));
        assert_eq!(first_sentence("Pi is 3.14 today. ok"), Some("Pi is 3.14 today."));
        assert_eq!(first_sentence("Ends here."), Some("Ends here."));
        assert_eq!(first_sentence("no terminator"), None);
    }

    #[test]
    fn test_summary_uses_first_sentence() {
        let summarizer = RuleBasedSummarizer::default();
        assert_eq!(
            summarizer.summarize_text("Y1S1: CS1101S Programming Methodology was tough."),
            "Y1S1: CS1101S Programming Methodology was tough."
        );
        assert_eq!(
            summarizer.summarize_text("The library is freezing today. Bring a jacket!"),
            "The library is freezing today."
        );
    }

    #[test]
    fn test_short_first_sentence_falls_back_to_prefix() {
        let summarizer = RuleBasedSummarizer::new(20, 10);
        assert_eq!(
            summarizer.summarize_text("Hi. I need advice about my modules"),
            "Hi. I need advice"
        );
    }

    #[test]
    fn test_first_sentence_must_exceed_minimum() {
        let summarizer = RuleBasedSummarizer::new(100, 10);
        assert_eq!(
            summarizer.summarize_text("Ten chars. Then the rest of the post"),
            "Ten chars. Then the rest of the post"
        );
        assert_eq!(
            summarizer.summarize_text("Eleven chr. Then the rest"),
            "Eleven chr."
        );
    }

    #[test]
    fn test_long_text_truncated_at_word_boundary() {
        let summarizer = RuleBasedSummarizer::default();
        let text = "word ".repeat(40);
        let summary = summarizer.summarize_text(&text);
        assert!(summary.chars().count() <= 100);
        assert!(summary.ends_with("word"));
        assert!(!summary.ends_with(' '));
    }

    #[test]
    fn test_long_first_sentence_is_truncated() {
        let summarizer = RuleBasedSummarizer::new(30, 10);
        let summary = summarizer
            .summarize_text("This opening sentence is definitely longer than thirty characters. Next.");
        assert_eq!(summary, "This opening sentence is");
    }

    #[test]
    fn test_summary_never_splits_characters() {
        let texts = [
            "我今天很累 但是还要去上课 然后还要做作业 真的好累啊",
            "😭😭😭 why is everything due on the same week 😭😭😭",
            "naïve café crème brûlée déjà vu résumé",
            "supercalifragilisticexpialidocious",
        ];
        for max in 1..=40 {
            let summarizer = RuleBasedSummarizer::new(max, 10);
            for text in texts {
                let summary = summarizer.summarize_text(text);
                assert!(summary.chars().count() <= max, "{:?} over {}", summary, max);
                assert!(text.starts_with(&summary));
            }
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(RuleBasedSummarizer::default().summarize_text(""), "");
        assert_eq!(RuleBasedSummarizer::default().summarize_text("   "), "");
    }

    #[tokio::test]
    async fn test_trait_object_dispatch() {
        let summarizer: Box<dyn Summarizer> = Box::new(RuleBasedSummarizer::default());
        assert_eq!(summarizer.name(), "rule_based");
        assert_eq!(
            summarizer.summarize("Short and sweet post.").await.unwrap(),
            "Short and sweet post."
        );
    }
}
