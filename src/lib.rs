pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::RunConfig;

pub use adapters::{CsvPostSource, OutputWriter, RemoteSummarizer};
pub use core::{
    batch::BatchPipeline,
    cleaner::TextCleaner,
    etl::{EtlEngine, EtlOutcome},
    pipeline::CsvPipeline,
    summarizer::RuleBasedSummarizer,
    topic::{TopicExtractor, TopicMapping},
    transformer::RowTransformer,
};
pub use domain::model::{RawPost, TopicTag, TransformationStats, TransformedPost, WriteResult};
pub use utils::error::{EtlError, Result};
