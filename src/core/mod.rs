pub mod batch;
pub mod cleaner;
pub mod etl;
pub mod patterns;
pub mod pipeline;
pub mod preview;
pub mod summarizer;
pub mod topic;
pub mod transformer;

pub use crate::domain::model::{RawPost, TopicTag, TransformResult, TransformedPost};
pub use crate::domain::ports::{Pipeline, PostSink, PostSource, Summarizer};
pub use crate::utils::error::Result;
