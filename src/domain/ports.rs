use crate::domain::model::{RawPost, TransformResult, TransformedPost, WriteResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Produces a short synopsis of already cleaned post text.
///
/// Implementations are selected once per run and shared by every row, so
/// they must not keep per-row state.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, cleaned_text: &str) -> Result<String>;

    fn name(&self) -> &'static str;
}

pub trait PostSource: Send + Sync {
    fn read_posts(&self) -> Result<Vec<RawPost>>;
}

pub trait PostSink: Send + Sync {
    fn write(&self, rows: &[TransformedPost], destination: &Path) -> Result<WriteResult>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawPost>>;
    async fn transform(&self, posts: Vec<RawPost>) -> Result<TransformResult>;
    async fn load(&self, result: &TransformResult) -> Result<WriteResult>;
}
