use crate::core::transformer::RowTransformer;
use crate::domain::model::{RawPost, TransformationStats, TransformedPost};

pub const DEFAULT_PROGRESS_INTERVAL: usize = 100;

/// Runs the row transformer over a whole table, in input order.
pub struct BatchPipeline {
    transformer: RowTransformer,
    progress_interval: usize,
}

impl BatchPipeline {
    pub fn new(transformer: RowTransformer) -> Self {
        Self {
            transformer,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    pub fn with_progress_interval(mut self, rows: usize) -> Self {
        self.progress_interval = rows.max(1);
        self
    }

    pub fn transformer(&self) -> &RowTransformer {
        &self.transformer
    }

    pub async fn run(&self, rows: &[RawPost]) -> (Vec<TransformedPost>, TransformationStats) {
        let total = rows.len();
        let mut posts = Vec::with_capacity(total);
        let mut stats = TransformationStats::default();

        tracing::info!(
            "🔄 Transforming {} rows with the {} summarizer",
            total,
            self.transformer.summarizer_name()
        );

        for (index, raw) in rows.iter().enumerate() {
            let outcome = self.transformer.transform(raw).await;
            stats.record_row(outcome.post.topic, outcome.fallback, outcome.failure.is_some());
            posts.push(outcome.post);

            let processed = index + 1;
            if processed % self.progress_interval == 0 {
                tracing::info!("Processed {}/{} rows", processed, total);
            }
        }

        (posts, stats)
    }
}
