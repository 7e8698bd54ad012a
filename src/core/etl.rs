use crate::domain::model::{TransformResult, WriteResult};
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use std::time::{Duration, Instant};

/// What a run produced. A failed write does not discard the transformed
/// table; it is still in `result`.
#[derive(Debug)]
pub struct EtlOutcome {
    pub result: TransformResult,
    pub write: Result<WriteResult>,
    pub elapsed: Duration,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Extract, transform, load. Only a failure to read the input is returned
    /// as `Err`.
    pub async fn run(&self) -> Result<EtlOutcome> {
        let started = Instant::now();
        tracing::info!("🚀 Starting ETL process");

        let raw_posts = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} posts", raw_posts.len());

        let result = self.pipeline.transform(raw_posts).await?;
        result.stats.log_report();

        let write = self.pipeline.load(&result).await;
        let elapsed = started.elapsed();
        match &write {
            Ok(written) => tracing::info!(
                "✅ Wrote {} rows to {} in {:.2?}",
                written.rows_written,
                written.path.display(),
                elapsed
            ),
            Err(e) => tracing::error!("❌ Output could not be persisted: {}", e),
        }

        Ok(EtlOutcome {
            result,
            write,
            elapsed,
        })
    }
}
