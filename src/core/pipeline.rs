use crate::adapters::{CsvPostSource, OutputWriter};
use crate::config::RunConfig;
use crate::core::batch::BatchPipeline;
use crate::core::summarizer::{build_summarizer, RuleBasedSummarizer};
use crate::core::topic::TopicExtractor;
use crate::core::transformer::RowTransformer;
use crate::domain::model::{RawPost, TransformResult, WriteResult};
use crate::domain::ports::{Pipeline, PostSink, PostSource};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Reads posts from a source, runs them through the batch pipeline and hands
/// the table to a sink.
pub struct CsvPipeline<S: PostSource, W: PostSink> {
    source: S,
    batch: BatchPipeline,
    sink: W,
    output_path: PathBuf,
}

impl<S: PostSource, W: PostSink> CsvPipeline<S, W> {
    pub fn new(source: S, batch: BatchPipeline, sink: W, output_path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            batch,
            sink,
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn summarizer_name(&self) -> &'static str {
        self.batch.transformer().summarizer_name()
    }
}

impl CsvPipeline<CsvPostSource, OutputWriter> {
    /// Wires the file source, the configured summarizer and the output writer.
    pub fn from_config(config: &RunConfig) -> Result<Self> {
        let extractor = TopicExtractor::new(config.topic_mapping()?);
        let cleaner = config.text_cleaner()?;
        let summarizer = build_summarizer(&config.summarizer)?;
        let fallback = RuleBasedSummarizer::new(
            config.summarizer.max_chars,
            config.summarizer.min_sentence_chars,
        );

        let transformer = RowTransformer::new(extractor, cleaner, summarizer, fallback);
        let batch = BatchPipeline::new(transformer).with_progress_interval(config.progress_interval);

        Ok(Self::new(
            CsvPostSource::new(&config.input_path),
            batch,
            OutputWriter::new(),
            &config.output_path,
        ))
    }
}

#[async_trait::async_trait]
impl<S: PostSource, W: PostSink> Pipeline for CsvPipeline<S, W> {
    async fn extract(&self) -> Result<Vec<RawPost>> {
        let posts = self.source.read_posts()?;
        tracing::debug!("Extracted {} posts", posts.len());
        Ok(posts)
    }

    async fn transform(&self, posts: Vec<RawPost>) -> Result<TransformResult> {
        let (posts, stats) = self.batch.run(&posts).await;
        Ok(TransformResult { posts, stats })
    }

    async fn load(&self, result: &TransformResult) -> Result<WriteResult> {
        tracing::debug!(
            "Writing {} rows to {}",
            result.posts.len(),
            self.output_path.display()
        );
        self.sink.write(&result.posts, &self.output_path)
    }
}
