use crate::utils::error::ServiceErrorKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// One row of the source export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPost {
    pub post_id: String,
    pub timestamp: String,
    pub text: String,
}

impl RawPost {
    pub fn new(
        post_id: impl Into<String>,
        timestamp: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            post_id: post_id.into(),
            timestamp: timestamp.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicTag {
    Studies,
    Advice,
    Random,
    Love,
    Campus,
    Rant,
    Unknown,
}

impl TopicTag {
    pub const ALL: [TopicTag; 7] = [
        TopicTag::Studies,
        TopicTag::Advice,
        TopicTag::Random,
        TopicTag::Love,
        TopicTag::Campus,
        TopicTag::Rant,
        TopicTag::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TopicTag::Studies => "studies",
            TopicTag::Advice => "advice",
            TopicTag::Random => "random",
            TopicTag::Love => "love",
            TopicTag::Campus => "campus",
            TopicTag::Rant => "rant",
            TopicTag::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TopicTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TopicTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        TopicTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == wanted)
            .ok_or_else(|| format!("unknown topic '{}'", s))
    }
}

/// Output row. Field order is the column order of every output format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformedPost {
    pub post_id: String,
    pub timestamp: String,
    pub topic: TopicTag,
    pub summary: String,
    pub text: String,
}

/// Per-run counters, surfaced in the final report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformationStats {
    pub counts: BTreeMap<TopicTag, usize>,
    pub total_rows: usize,
    pub summary_fallbacks: usize,
    pub fallback_reasons: BTreeMap<ServiceErrorKind, usize>,
    pub row_failures: usize,
}

impl TransformationStats {
    /// Accounts for one finished row.
    pub fn record_row(&mut self, topic: TopicTag, fallback: Option<ServiceErrorKind>, failed: bool) {
        self.total_rows += 1;
        *self.counts.entry(topic).or_insert(0) += 1;
        if let Some(kind) = fallback {
            self.summary_fallbacks += 1;
            *self.fallback_reasons.entry(kind).or_insert(0) += 1;
        }
        if failed {
            self.row_failures += 1;
        }
    }

    pub fn count(&self, topic: TopicTag) -> usize {
        self.counts.get(&topic).copied().unwrap_or(0)
    }

    /// Topics ordered by descending count, ties broken by topic order.
    pub fn distribution(&self) -> Vec<(TopicTag, usize)> {
        let mut entries: Vec<(TopicTag, usize)> =
            self.counts.iter().map(|(tag, n)| (*tag, *n)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
    }

    pub fn log_report(&self) {
        tracing::info!(
            "📊 Transformed {} rows ({} summary fallbacks, {} row failures)",
            self.total_rows,
            self.summary_fallbacks,
            self.row_failures
        );
        for (topic, count) in self.distribution() {
            tracing::info!("   {:<8} {}", topic, count);
        }
        for (kind, count) in &self.fallback_reasons {
            tracing::debug!("   fallback reason {}: {}", kind, count);
        }
    }
}

impl fmt::Display for TransformationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total rows: {}", self.total_rows)?;
        writeln!(f, "Topic distribution:")?;
        for (topic, count) in self.distribution() {
            writeln!(f, "  {:<8} {}", topic, count)?;
        }
        writeln!(f, "Summary fallbacks: {}", self.summary_fallbacks)?;
        for (kind, count) in &self.fallback_reasons {
            writeln!(f, "  {:<12} {}", kind, count)?;
        }
        write!(f, "Row failures: {}", self.row_failures)
    }
}

/// Transformed table plus the counters gathered while producing it.
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub posts: Vec<TransformedPost>,
    pub stats: TransformationStats,
}

/// Where the table ended up after a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    pub path: PathBuf,
    pub backup: Option<PathBuf>,
    pub used_fallback: bool,
    pub rows_written: usize,
}
