use crate::core::cleaner::TextCleaner;
use crate::core::summarizer::RuleBasedSummarizer;
use crate::core::topic::TopicExtractor;
use crate::domain::model::{RawPost, TopicTag, TransformedPost};
use crate::domain::ports::Summarizer;
use crate::utils::error::{EtlError, Result, ServiceErrorKind};

/// Result of transforming one row. The post is always present; the other
/// fields say what had to be recovered along the way.
#[derive(Debug)]
pub struct RowOutcome {
    pub post: TransformedPost,
    pub fallback: Option<ServiceErrorKind>,
    pub failure: Option<EtlError>,
}

/// Rejects text that could not be decoded from the source file.
pub fn check_row(raw: &RawPost) -> Result<()> {
    if raw.text.contains('\u{FFFD}') {
        return Err(EtlError::MalformedRow {
            post_id: raw.post_id.clone(),
            reason: "text is not valid UTF-8".to_string(),
        });
    }
    if raw.text.contains('\0') {
        return Err(EtlError::MalformedRow {
            post_id: raw.post_id.clone(),
            reason: "text contains NUL bytes".to_string(),
        });
    }
    Ok(())
}

pub struct RowTransformer {
    extractor: TopicExtractor,
    cleaner: TextCleaner,
    summarizer: Box<dyn Summarizer>,
    fallback: RuleBasedSummarizer,
}

impl RowTransformer {
    pub fn new(
        extractor: TopicExtractor,
        cleaner: TextCleaner,
        summarizer: Box<dyn Summarizer>,
        fallback: RuleBasedSummarizer,
    ) -> Self {
        Self {
            extractor,
            cleaner,
            summarizer,
            fallback,
        }
    }

    /// Default extractor and cleaner with a rule-based summarizer.
    pub fn rule_based() -> Self {
        Self::new(
            TopicExtractor::default(),
            TextCleaner::default(),
            Box::new(RuleBasedSummarizer::default()),
            RuleBasedSummarizer::default(),
        )
    }

    pub fn summarizer_name(&self) -> &'static str {
        self.summarizer.name()
    }

    /// Extract, clean, then summarize. Never fails: service errors fall back
    /// to the rule-based summary and anything else yields an `unknown` row
    /// with an empty summary. Empty text is not sent to the summarizer.
    pub async fn transform(&self, raw: &RawPost) -> RowOutcome {
        if let Err(e) = check_row(raw) {
            tracing::warn!("⚠️ {}", e);
            let salvaged = raw.text.replace(['\u{FFFD}', '\0'], "");
            return self.failed(raw, self.cleaner.clean(&salvaged), e);
        }

        let topic = self.extractor.extract(&raw.text);
        let text = self.cleaner.clean(&raw.text);
        if text.is_empty() {
            return RowOutcome {
                post: self.assemble(raw, topic, String::new(), text),
                fallback: None,
                failure: None,
            };
        }

        match self.summarizer.summarize(&text).await {
            Ok(summary) => RowOutcome {
                post: self.assemble(raw, topic, summary, text),
                fallback: None,
                failure: None,
            },
            Err(e) => match e.service_kind() {
                Some(kind) => {
                    tracing::warn!(
                        "Summarizer {} failed for post {}: {}; using rule-based summary",
                        self.summarizer.name(),
                        raw.post_id,
                        e
                    );
                    let summary = self.fallback.summarize_text(&text);
                    RowOutcome {
                        post: self.assemble(raw, topic, summary, text),
                        fallback: Some(kind),
                        failure: None,
                    }
                }
                None => {
                    tracing::error!("❌ Row {} failed: {}", raw.post_id, e);
                    self.failed(raw, text, e)
                }
            },
        }
    }

    fn assemble(&self, raw: &RawPost, topic: TopicTag, summary: String, text: String) -> TransformedPost {
        TransformedPost {
            post_id: raw.post_id.clone(),
            timestamp: raw.timestamp.clone(),
            topic,
            summary,
            text,
        }
    }

    fn failed(&self, raw: &RawPost, text: String, error: EtlError) -> RowOutcome {
        RowOutcome {
            post: self.assemble(raw, TopicTag::Unknown, String::new(), text),
            fallback: None,
            failure: Some(error),
        }
    }
}
